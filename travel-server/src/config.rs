//! Environment-driven server configuration.

use std::str::FromStr;
use std::time::Duration;
use travel_assistant::{AgentMode, DEFAULT_BASE_URL, DEFAULT_MODEL};
use travel_core::{AssistantError, Result};

const DEFAULT_PORT: u16 = 8001;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub port: u16,
    /// CORS origins; an empty list allows any origin.
    pub allowed_origins: Vec<String>,
    pub agent_mode: AgentMode,
    pub request_timeout: Duration,
    pub max_body_size: usize,
}

impl ServerConfig {
    /// Read the configuration from the environment. Only `GEMINI_API_KEY`
    /// is required; everything else falls back to a default.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| AssistantError::Config("GEMINI_API_KEY must be set".to_string()))?;

        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url = std::env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| AssistantError::Config(format!("invalid PORT: {raw}")))?,
            Err(_) => DEFAULT_PORT,
        };

        let allowed_origins = parse_origins(
            &std::env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
        );

        let agent_mode = match std::env::var("AGENT_MODE") {
            Ok(raw) => AgentMode::from_str(&raw)?,
            Err(_) => AgentMode::Full,
        };

        Ok(Self {
            api_key,
            model,
            base_url,
            port,
            allowed_origins,
            agent_mode,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',').map(|o| o.trim().to_string()).filter(|o| !o.is_empty()).collect()
}
