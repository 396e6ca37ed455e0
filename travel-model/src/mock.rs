//! Scriptable model for tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use travel_core::{AssistantError, Content, Llm, LlmRequest, LlmResponse, LlmResponseStream, Result};

enum ScriptedTurn {
    Responses(Vec<LlmResponse>),
    Failure(String),
}

/// Plays back queued turns and records every request it receives.
///
/// Each `generate_content` call consumes the next queued turn and replays it
/// as a stream, exactly as scripted. Calling with no turns left yields a
/// model error, which makes an under-scripted test fail loudly.
pub struct MockLlm {
    name: String,
    turns: Mutex<VecDeque<ScriptedTurn>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            turns: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a turn of responses, streamed in order on the next call.
    pub fn with_turn(self, responses: Vec<LlmResponse>) -> Self {
        self.turns.lock().unwrap().push_back(ScriptedTurn::Responses(responses));
        self
    }

    /// Queue a turn that completes in a single text response.
    pub fn with_text_turn(self, text: impl Into<String>) -> Self {
        self.with_turn(vec![LlmResponse::new(Content::new("model").with_text(text))])
    }

    /// Queue a turn whose stream fails with a model error.
    pub fn with_failing_turn(self, message: impl Into<String>) -> Self {
        self.turns.lock().unwrap().push_back(ScriptedTurn::Failure(message.into()));
        self
    }

    /// Requests seen so far, in call order.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_content(&self, req: LlmRequest, _stream: bool) -> Result<LlmResponseStream> {
        self.requests.lock().unwrap().push(req);
        let turn = self.turns.lock().unwrap().pop_front();

        let stream = async_stream::stream! {
            match turn {
                Some(ScriptedTurn::Responses(responses)) => {
                    for response in responses {
                        yield Ok(response);
                    }
                }
                Some(ScriptedTurn::Failure(message)) => {
                    yield Err(AssistantError::Model(message));
                }
                None => {
                    yield Err(AssistantError::Model(
                        "mock has no scripted turn for this call".to_string(),
                    ));
                }
            }
        };
        Ok(Box::pin(stream))
    }
}
