#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Tool error: {0}")]
    Tool(String),

    /// Input rejected by a guardrail before reaching the model. The payload
    /// is the guardrail's reason. This is the only variant the HTTP layer
    /// answers with the refusal reply; everything else gets the apology.
    #[error("Blocked by guardrail: {0}")]
    GuardrailBlocked(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AssistantError>;
