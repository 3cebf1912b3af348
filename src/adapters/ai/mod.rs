//! AI Provider Adapters.
//!
//! ## Available Adapters
//!
//! - `MistralProvider` - Mistral chat completions over HTTPS
//! - `MockAIProvider` - Configurable mock for testing
//! - `ResilientInferenceClient` - Retry, credential rotation and fallback
//!   over any set of providers

mod credential;
mod fallback;
mod mistral_provider;
mod mock_provider;
mod resilient_client;

pub use credential::{is_placeholder_key, Credential};
pub use fallback::synthesize as synthesize_fallback;
pub use mistral_provider::{MistralConfig, MistralProvider, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use resilient_client::{InferenceSettings, ResilientInferenceClient};
