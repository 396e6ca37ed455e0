//! Agent orchestration for the travel assistant.
//!
//! - [`LlmAgent`] - Drives an LLM in a loop of model turns and tool calls
//! - [`Runner`] - Executes an invocation, following transfers between agents
//! - [`FunctionTool`] - Wraps an async closure as a [`Tool`](travel_core::Tool)
//! - [`GuardrailSet`] - Validates user input before the model is called

mod context;
mod function_tool;
mod guardrail;
mod llm_agent;
mod runner;

pub use context::InvocationContext;
pub use function_tool::FunctionTool;
pub use guardrail::{ContentFilter, Guardrail, GuardrailResult, GuardrailSet, Severity};
pub use llm_agent::{LlmAgent, LlmAgentBuilder};
pub use runner::{find_agent, Runner, RunnerConfig};
pub use travel_core::Agent;
