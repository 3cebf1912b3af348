//! Scoring configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::decision::Alpha;

/// Composite scoring configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Weight of the emotional signal, within [0, 1]
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl ScoringConfig {
    /// Get alpha as a validated value
    pub fn alpha(&self) -> Result<Alpha, ValidationError> {
        Alpha::try_new(self.alpha).map_err(|_| ValidationError::InvalidAlpha(self.alpha))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.alpha().map(|_| ())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
        }
    }
}

fn default_alpha() -> f64 {
    Alpha::DEFAULT.value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alpha() {
        let config = ScoringConfig::default();
        assert_eq!(config.alpha().unwrap(), Alpha::DEFAULT);
    }

    #[test]
    fn test_alpha_bounds_are_inclusive() {
        assert!(ScoringConfig { alpha: 0.0 }.validate().is_ok());
        assert!(ScoringConfig { alpha: 1.0 }.validate().is_ok());
    }

    #[test]
    fn test_alpha_out_of_range_rejected() {
        for alpha in [-0.1, 1.5, f64::NAN] {
            assert!(
                matches!(
                    ScoringConfig { alpha }.validate(),
                    Err(ValidationError::InvalidAlpha(_))
                ),
                "alpha {alpha} should be rejected"
            );
        }
    }
}
