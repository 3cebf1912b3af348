//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - LLM providers and the resilient inference client

pub mod ai;

pub use ai::{MockAIProvider, ResilientInferenceClient};
