//! Router assembly and the chat/status handlers.

use crate::config::ServerConfig;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method, StatusCode, header},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use travel_agent::Runner;
use travel_assistant::collect_response;
use travel_assistant::replies::{
    EMPTY_MESSAGE_REPLY, FAILURE_REPLY, GUARDRAIL_REPLY, NO_RESPONSE_REPLY,
};
use travel_core::{AssistantError, Content, UserProfile};

/// Shared state handed to every handler.
pub struct AppState {
    pub runner: Runner,
    pub agent_name: String,
    pub model_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Build CORS from the allowed origins; an empty list allows any origin.
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        cors.allow_origin(AllowOrigin::any())
    } else {
        let origins: Vec<HeaderValue> =
            allowed_origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}

pub fn create_app(state: Arc<AppState>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/", get(status))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    config.request_timeout,
                ))
                .layer(DefaultBodyLimit::max(config.max_body_size))
                .layer(build_cors_layer(&config.allowed_origins)),
        )
}

/// POST /chat. Always answers 200 with a response string; a guardrail trip
/// maps to the refusal reply and any other failure to the apology reply.
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    if req.message.trim().is_empty() {
        return Json(ChatResponse { response: EMPTY_MESSAGE_REPLY.to_string() });
    }

    let profile =
        UserProfile::new("Web User", vec!["vegan".to_string(), "museums".to_string()]);
    let user_content = Content::new("user").with_text(req.message);

    let result = match state.runner.run(profile, user_content).await {
        Ok(events) => collect_response(events).await,
        Err(e) => Err(e),
    };

    let response = match result {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                NO_RESPONSE_REPLY.to_string()
            } else {
                text.to_string()
            }
        }
        Err(AssistantError::GuardrailBlocked(reason)) => {
            tracing::info!(reason = %reason, "chat blocked by guardrail");
            GUARDRAIL_REPLY.to_string()
        }
        Err(e) => {
            tracing::error!(error = %e, "chat failed");
            FAILURE_REPLY.to_string()
        }
    };

    Json(ChatResponse { response })
}

/// GET /. Status payload for quick liveness checks.
async fn status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": "Smart Travel Assistant API is running!",
        "agent": &state.agent_name,
        "model": &state.model_name,
    }))
}
