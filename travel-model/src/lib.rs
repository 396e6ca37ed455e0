//! # travel-model
//!
//! Model integrations for the Smart Travel Assistant.
//!
//! - [`OpenAICompatible`] - client for any OpenAI-compatible chat endpoint.
//!   In production this points at Gemini's OpenAI-compatible API surface.
//! - [`MockLlm`] - scriptable model for tests; plays back queued turns and
//!   records every request it receives.

pub(crate) mod convert;
pub mod mock;
pub mod openai_compatible;

pub use mock::MockLlm;
pub use openai_compatible::{OpenAICompatible, OpenAICompatibleConfig};
