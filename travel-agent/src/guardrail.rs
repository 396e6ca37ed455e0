//! Input validation that runs before any model call.

use async_trait::async_trait;
use travel_core::Content;

/// How serious a guardrail failure is. Informational for now; any failure
/// blocks the input regardless of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuardrailResult {
    Pass,
    Fail { reason: String, severity: Severity },
}

impl GuardrailResult {
    pub fn pass() -> Self {
        Self::Pass
    }

    pub fn fail(reason: impl Into<String>, severity: Severity) -> Self {
        Self::Fail { reason: reason.into(), severity }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

#[async_trait]
pub trait Guardrail: Send + Sync {
    fn name(&self) -> &str;
    async fn validate(&self, content: &Content) -> GuardrailResult;
}

/// Keyword filter over the text parts of a content.
pub struct ContentFilter {
    name: String,
    blocked_keywords: Vec<String>,
}

impl ContentFilter {
    /// Block content containing any of the given keywords. Matching is
    /// case-insensitive and on substrings, so "hack" also catches "hacking".
    pub fn blocked_keywords(keywords: Vec<String>) -> Self {
        Self {
            name: "content_filter".to_string(),
            blocked_keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

#[async_trait]
impl Guardrail for ContentFilter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn validate(&self, content: &Content) -> GuardrailResult {
        let text = content.text().to_lowercase();
        for keyword in &self.blocked_keywords {
            if text.contains(keyword) {
                return GuardrailResult::fail(
                    format!("input contains blocked keyword: {keyword}"),
                    Severity::High,
                );
            }
        }
        GuardrailResult::pass()
    }
}

/// An ordered set of guardrails.
#[derive(Default)]
pub struct GuardrailSet {
    guardrails: Vec<Box<dyn Guardrail>>,
}

impl GuardrailSet {
    pub fn new() -> Self {
        Self { guardrails: Vec::new() }
    }

    pub fn with(mut self, guardrail: impl Guardrail + 'static) -> Self {
        self.guardrails.push(Box::new(guardrail));
        self
    }

    pub fn len(&self) -> usize {
        self.guardrails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guardrails.is_empty()
    }

    /// Run every guardrail in insertion order, stopping at the first failure.
    pub async fn validate(&self, content: &Content) -> GuardrailResult {
        for guardrail in &self.guardrails {
            let result = guardrail.validate(content).await;
            if let GuardrailResult::Fail { ref reason, severity } = result {
                tracing::warn!(
                    guardrail = guardrail.name(),
                    reason = %reason,
                    ?severity,
                    "input blocked by guardrail"
                );
                return result;
            }
        }
        GuardrailResult::pass()
    }
}
