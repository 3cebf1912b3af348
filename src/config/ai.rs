//! Inference endpoint configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::{Credential, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Inference endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API keys in priority order (`DECISION_SPLITTER__AI__API_KEYS=k1,k2`)
    #[serde(default)]
    pub api_keys: Vec<String>,

    /// Single key, tried after `api_keys`
    pub mistral_api_key: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-attempt timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Attempts per credential
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// First backoff delay in milliseconds
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    /// All configured keys in the order they are tried, labelled `key-1`, `key-2`, ...
    pub fn credentials(&self) -> Vec<Credential> {
        self.api_keys
            .iter()
            .chain(self.mistral_api_key.iter())
            .enumerate()
            .map(|(i, key)| Credential::new(format!("key-{}", i + 1), key.trim()))
            .collect()
    }

    /// Check if at least one non-placeholder key is configured
    pub fn has_usable_key(&self) -> bool {
        self.credentials().iter().any(|c| !c.is_placeholder())
    }

    /// Validate inference configuration
    ///
    /// A missing key is not an error; analyses degrade to offline defaults.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_retries == 0 {
            return Err(ValidationError::InvalidRetries);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature(self.temperature));
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            mistral_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    1000
}
