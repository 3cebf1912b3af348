//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Alpha must be within [0, 1], got {0}")]
    InvalidAlpha(f64),

    #[error("At least one attempt per credential is required")]
    InvalidRetries,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Temperature must be within [0, 2], got {0}")]
    InvalidTemperature(f32),

    #[error("max_tokens must be positive")]
    InvalidMaxTokens,

    #[error("Invalid inference base URL")]
    InvalidBaseUrl,
}
