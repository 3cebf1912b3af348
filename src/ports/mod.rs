//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - One request against one LLM endpoint with one credential
//! - `InferenceClient` - Never-failing completion used by the decision resolver

mod ai_provider;
mod inference;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, Message, MessageRole,
    ProviderInfo, TokenUsage,
};
pub use inference::{CancelSignal, Completion, CompletionSource, FallbackReason, InferenceClient};
