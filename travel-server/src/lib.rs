//! HTTP backend for the Smart Travel Assistant: configuration, router, and
//! the chat/status handlers.

pub mod config;
pub mod routes;

pub use config::ServerConfig;
pub use routes::{create_app, AppState, ChatRequest, ChatResponse};
