//! Composite scoring and winner selection.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::emotional::EmotionalScore;
use super::logical_scorer::LogicalScores;
use super::option::Side;
use crate::domain::foundation::ValidationError;

/// Blend weight of the emotional signal, within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Alpha(f64);

impl Alpha {
    pub const DEFAULT: Alpha = Alpha(0.3);

    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::out_of_range("alpha", 0.0, 1.0, value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Weight left for the logical signal.
    pub fn logical_weight(&self) -> f64 {
        1.0 - self.0
    }
}

impl Default for Alpha {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Alpha {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Alpha> for f64 {
    fn from(alpha: Alpha) -> Self {
        alpha.0
    }
}

impl fmt::Display for Alpha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Blended score per option.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub a: f64,
    pub b: f64,
}

impl CompositeScore {
    /// `(1 - alpha) * normalized_logical + alpha * emotional`, per side.
    pub fn blend(logical: &LogicalScores, emotional: &EmotionalScore, alpha: Alpha) -> Self {
        let mix = |logical: f64, emotional: f64| {
            alpha.logical_weight() * logical + alpha.value() * emotional
        };
        Self {
            a: mix(logical.a.normalized, emotional.a()),
            b: mix(logical.b.normalized, emotional.b()),
        }
    }

    /// A wins only on a strictly higher score; ties go to B.
    pub fn winner(&self) -> Side {
        if self.a > self.b {
            Side::A
        } else {
            Side::B
        }
    }

    pub fn for_side(&self, side: Side) -> f64 {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }
}
