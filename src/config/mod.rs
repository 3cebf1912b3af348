//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `DECISION_SPLITTER` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use decision_splitter::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Using model {}", config.ai.model);
//! ```

mod ai;
mod error;
mod scoring;
mod telemetry;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use scoring::ScoringConfig;
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

const ENV_PREFIX: &str = "DECISION_SPLITTER";

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads successfully and
/// runs fully offline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Inference endpoint configuration (keys, model, retries)
    #[serde(default)]
    pub ai: AiConfig,

    /// Composite scoring configuration
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DECISION_SPLITTER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Splits `AI__API_KEYS` on commas
    /// 5. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `DECISION_SPLITTER__AI__API_KEYS=key1,key2` -> `ai.api_keys = ["key1", "key2"]`
    /// - `DECISION_SPLITTER__SCORING__ALPHA=0.4` -> `scoring.alpha = 0.4`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("ai.api_keys"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.scoring.validate()?;
        Ok(())
    }
}
