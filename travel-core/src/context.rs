use crate::Result;
use crate::types::Content;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Who the assistant is talking to. Constructed fresh for each invocation
/// and discarded when it completes; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub preferences: Vec<String>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, preferences: Vec<String>) -> Self {
        Self { name: name.into(), preferences }
    }

    /// Preferences joined for prompt text, e.g. "vegan, museums".
    pub fn preferences_summary(&self) -> String {
        self.preferences.join(", ")
    }
}

/// Per-invocation view handed to agents: identity of the run plus the
/// user's content and profile.
pub trait InvocationContext: Send + Sync {
    fn invocation_id(&self) -> &str;
    fn app_name(&self) -> &str;
    fn user_content(&self) -> &Content;
    fn profile(&self) -> &UserProfile;
}

// Dynamic instruction generation, e.g. tailoring the prompt to the profile.
pub type InstructionProvider = Box<
    dyn Fn(Arc<dyn InvocationContext>) -> Pin<Box<dyn Future<Output = Result<String>> + Send>>
        + Send
        + Sync,
>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_creation() {
        let profile =
            UserProfile::new("Web User", vec!["vegan".to_string(), "museums".to_string()]);
        assert_eq!(profile.name, "Web User");
        assert_eq!(profile.preferences.len(), 2);
    }

    #[test]
    fn test_preferences_summary() {
        let profile =
            UserProfile::new("Marjan Ahmed", vec!["vegan".to_string(), "museums".to_string()]);
        assert_eq!(profile.preferences_summary(), "vegan, museums");

        let empty = UserProfile::new("Web User", vec![]);
        assert_eq!(empty.preferences_summary(), "");
    }

    #[test]
    fn test_profile_serde() {
        let profile = UserProfile::new("Web User", vec!["vegan".to_string()]);
        let json = serde_json::to_string(&profile).unwrap();
        let back: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
