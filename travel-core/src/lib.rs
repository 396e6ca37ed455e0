//! # travel-core
//!
//! Core traits and types for the Smart Travel Assistant.
//!
//! ## Overview
//!
//! This crate provides the foundational abstractions shared by the model
//! client, the agent runtime, and the HTTP server:
//!
//! - [`Agent`] - The fundamental trait for all agents
//! - [`Tool`] - For extending agents with custom capabilities
//! - [`Llm`] - The model seam; implemented by real clients and test mocks
//! - [`Event`] - For streaming agent responses
//! - [`Content`] / [`Part`] - Conversation payloads (text, tool calls, tool results)
//! - [`InvocationContext`] / [`UserProfile`] - Per-request state; nothing persists across calls
//! - [`AssistantError`] / [`Result`] - Unified error handling
//!
//! ## Core Traits
//!
//! The [`Agent`] trait defines the interface for all agents:
//!
//! ```rust,ignore
//! #[async_trait]
//! pub trait Agent: Send + Sync {
//!     fn name(&self) -> &str;
//!     fn description(&self) -> &str;
//!     fn sub_agents(&self) -> &[Arc<dyn Agent>];
//!     async fn run(&self, ctx: Arc<dyn InvocationContext>) -> Result<EventStream>;
//! }
//! ```
//!
//! Agents emit a stream of [`Event`]s: partial text chunks while the model is
//! generating, tool results as they are executed, and finally a completed
//! turn. Consumers fold the text parts in arrival order to reconstruct the
//! reply.

pub mod agent;
pub mod context;
pub mod error;
pub mod event;
pub mod model;
pub mod tool;
pub mod types;

pub use agent::{Agent, EventStream};
pub use context::{InstructionProvider, InvocationContext, UserProfile};
pub use error::{AssistantError, Result};
pub use event::{Event, EventActions};
pub use model::{
    FinishReason, GenerateContentConfig, Llm, LlmRequest, LlmResponse, LlmResponseStream,
    UsageMetadata,
};
pub use tool::{Tool, ToolContext};
pub use types::{Content, FunctionResponseData, Part};
