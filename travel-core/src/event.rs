use crate::model::LlmResponse;
use crate::types::Content;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event represents a single emission from an agent during an invocation:
/// a streamed text chunk, a completed model turn, or a tool result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub invocation_id: String,
    /// Name of the agent that produced this event.
    pub author: String,
    /// The model response carried by this event.
    /// Access content via `event.llm_response.content`.
    #[serde(flatten)]
    pub llm_response: LlmResponse,
    pub actions: EventActions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventActions {
    /// Set when the agent hands the invocation off to a named sub-agent.
    pub transfer_to_agent: Option<String>,
}

impl Event {
    pub fn new(invocation_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            invocation_id: invocation_id.into(),
            author: String::new(),
            llm_response: LlmResponse::default(),
            actions: EventActions::default(),
        }
    }

    /// Convenience method to access content directly.
    pub fn content(&self) -> Option<&Content> {
        self.llm_response.content.as_ref()
    }

    /// Convenience method to set content directly.
    pub fn set_content(&mut self, content: Content) {
        self.llm_response.content = Some(content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = Event::new("inv-123");
        assert_eq!(event.invocation_id, "inv-123");
        assert!(!event.id.is_empty());
        assert!(event.actions.transfer_to_agent.is_none());
    }

    #[test]
    fn test_event_content_accessors() {
        let mut event = Event::new("inv-123");
        assert!(event.content().is_none());

        event.set_content(Content::new("model").with_text("hello"));
        assert_eq!(event.content().unwrap().text(), "hello");
    }

    #[test]
    fn test_llm_response_is_flattened() {
        let mut event = Event::new("inv-1");
        event.author = "travel_agent".to_string();
        event.set_content(Content::new("model").with_text("hi"));

        let json = serde_json::to_value(&event).unwrap();
        // content sits at the top level, not under an "llm_response" key
        assert!(json.get("content").is_some());
        assert!(json.get("llm_response").is_none());
    }
}
