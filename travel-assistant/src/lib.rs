//! Smart Travel Assistant domain: the agent definitions, the demo tools,
//! the canned replies, and the response folding shared by the server and
//! console front ends.

pub mod agent;
pub mod collect;
pub mod replies;
pub mod tools;

/// Application name attached to every invocation.
pub const APP_NAME: &str = "smart_travel_assistant";

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini's OpenAI-compatible endpoint, used when `BASE_URL` is not set.
/// No trailing slash; the client appends `/chat/completions`.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

pub use agent::{build_travel_agent, AgentMode, BUDGET_AGENT_NAME, TRAVEL_AGENT_NAME};
pub use collect::collect_response;
