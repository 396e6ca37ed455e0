//! Client for OpenAI-compatible chat completion endpoints.
//!
//! The Smart Travel Assistant talks to Gemini through its OpenAI-compatible
//! API surface, so this one client covers both the real deployment and any
//! other provider that speaks the same protocol.

use crate::convert;
use async_openai::{
    Client, config::OpenAIConfig as AsyncOpenAIConfig, types::CreateChatCompletionRequest,
    types::CreateChatCompletionRequestArgs,
};
use async_stream::{stream, try_stream};
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use travel_core::{
    AssistantError, Content, Llm, LlmRequest, LlmResponse, LlmResponseStream, Part, Result,
};

/// Configuration for an OpenAI-compatible provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAICompatibleConfig {
    /// Provider display name used in error messages.
    pub provider_name: String,
    /// API key.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// Optional API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl OpenAICompatibleConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider_name: "openai-compatible".to_string(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    /// Set provider display name used in errors.
    pub fn with_provider_name(mut self, provider_name: impl Into<String>) -> Self {
        self.provider_name = provider_name.into();
        self
    }

    /// Set a custom API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// OpenAI-compatible chat client.
pub struct OpenAICompatible {
    client: Client<AsyncOpenAIConfig>,
    model: String,
    provider_name: String,
}

impl OpenAICompatible {
    pub fn new(config: OpenAICompatibleConfig) -> Result<Self> {
        let mut openai_config = AsyncOpenAIConfig::new().with_api_key(&config.api_key);

        if let Some(base_url) = &config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        Ok(Self {
            client: Client::with_config(openai_config),
            model: config.model,
            provider_name: config.provider_name,
        })
    }

    fn build_request(&self, request: &LlmRequest) -> Result<CreateChatCompletionRequest> {
        let messages: Vec<_> = request.contents.iter().map(convert::content_to_message).collect();

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(messages);

        if !request.tools.is_empty() {
            builder.tools(convert::convert_tools(&request.tools));
        }

        if let Some(config) = &request.config {
            if let Some(temperature) = config.temperature {
                builder.temperature(temperature);
            }
            if let Some(top_p) = config.top_p {
                builder.top_p(top_p);
            }
            if let Some(max_tokens) = config.max_output_tokens {
                builder.max_tokens(max_tokens as u32);
            }
        }

        builder
            .build()
            .map_err(|e| AssistantError::Model(format!("Failed to build request: {e}")))
    }
}

#[async_trait]
impl Llm for OpenAICompatible {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate_content(&self, request: LlmRequest, stream: bool) -> Result<LlmResponseStream> {
        let openai_request = self.build_request(&request)?;
        let provider_name = self.provider_name.clone();
        let client = self.client.clone();

        tracing::debug!(
            model = %self.model,
            messages = request.contents.len(),
            tools = request.tools.len(),
            stream,
            "sending chat completion request"
        );

        if !stream {
            let response = client
                .chat()
                .create(openai_request)
                .await
                .map_err(|e| AssistantError::Model(format!("{provider_name} API error: {e}")))?;
            let mapped = convert::from_response(&response);
            let single = stream! {
                yield Ok(mapped);
            };
            return Ok(Box::pin(single));
        }

        let stream_body = try_stream! {
            let mut chunks = client
                .chat()
                .create_stream(openai_request)
                .await
                .map_err(|e| AssistantError::Model(format!("{provider_name} API error: {e}")))?;

            // Providers stream tool call arguments incrementally; accumulate
            // per call index as (call_id, name, args_json) until the turn ends.
            let mut pending_calls: HashMap<u32, (String, String, String)> = HashMap::new();

            while let Some(result) = chunks.next().await {
                let chunk = result.map_err(|e| {
                    AssistantError::Model(format!("{provider_name} stream error: {e}"))
                })?;

                let Some(choice) = chunk.choices.first() else {
                    continue;
                };

                if let Some(tool_calls) = &choice.delta.tool_calls {
                    for tc in tool_calls {
                        let entry = pending_calls.entry(tc.index).or_insert_with(|| {
                            let call_id =
                                tc.id.clone().unwrap_or_else(|| format!("call_{}", tc.index));
                            (call_id, String::new(), String::new())
                        });

                        if let Some(id) = &tc.id {
                            entry.0 = id.clone();
                        }

                        if let Some(func) = &tc.function {
                            if let Some(name) = &func.name {
                                entry.1 = name.clone();
                            }
                            if let Some(args_chunk) = &func.arguments {
                                entry.2.push_str(args_chunk);
                            }
                        }
                    }
                }

                if choice.finish_reason.is_some() && !pending_calls.is_empty() {
                    let mut parts = Vec::new();

                    if let Some(text) = &choice.delta.content {
                        if !text.is_empty() {
                            parts.push(Part::Text { text: text.clone() });
                        }
                    }

                    let mut calls: Vec<(u32, (String, String, String))> =
                        pending_calls.drain().collect();
                    calls.sort_by_key(|(index, _)| *index);

                    for (_, (call_id, name, args_json)) in calls {
                        let args: serde_json::Value = serde_json::from_str(&args_json)
                            .unwrap_or_else(|_| serde_json::json!({}));
                        parts.push(Part::FunctionCall { name, args, id: Some(call_id) });
                    }

                    yield LlmResponse {
                        content: Some(Content { role: "model".to_string(), parts }),
                        usage_metadata: None,
                        finish_reason: choice.finish_reason.map(convert::map_finish_reason),
                        partial: false,
                        turn_complete: true,
                    };
                    continue;
                }

                if pending_calls.is_empty() {
                    yield convert::from_chunk(&chunk);
                } else if let Some(text) = &choice.delta.content {
                    // Text that arrives while calls are still accumulating.
                    if !text.is_empty() {
                        yield LlmResponse::partial(
                            Content::new("model").with_text(text.clone()),
                        );
                    }
                }
            }
        };

        Ok(Box::pin(stream_body))
    }
}
