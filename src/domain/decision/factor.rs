//! Factor value objects and the free-text factor parser.
//!
//! One factor per line, with an optional weight after a vertical bar:
//!
//! ```text
//! Shorter commute | 8
//! Better coffee
//! ```
//!
//! Lines without a weight get [`FactorWeight::DEFAULT`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Importance of a single pro or con, always within 1..=10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FactorWeight(u8);

impl FactorWeight {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const DEFAULT: FactorWeight = FactorWeight(5);

    /// Creates a weight, rejecting values outside 1..=10.
    pub fn try_new(value: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::out_of_range(
                "weight",
                Self::MIN as f64,
                Self::MAX as f64,
                value as f64,
            ))
        }
    }

    /// Creates a weight by clamping any integer into 1..=10.
    pub fn clamped(value: u64) -> Self {
        Self(value.clamp(Self::MIN as u64, Self::MAX as u64) as u8)
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for FactorWeight {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for FactorWeight {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<FactorWeight> for u8 {
    fn from(weight: FactorWeight) -> Self {
        weight.0
    }
}

impl fmt::Display for FactorWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named pro or con with its weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factor {
    item: String,
    weight: FactorWeight,
}

impl Factor {
    /// Creates a factor. The item is trimmed and must not be empty.
    pub fn new(item: impl Into<String>, weight: FactorWeight) -> Result<Self, ValidationError> {
        let item: String = item.into();
        let item = item.trim().to_string();
        if item.is_empty() {
            return Err(ValidationError::empty_field("item"));
        }
        Ok(Self { item, weight })
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn weight(&self) -> FactorWeight {
        self.weight
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.item, self.weight)
    }
}

/// Parses a multi-line factor list.
///
/// Blank lines are skipped and order is preserved. Never fails: a line that
/// does not carry a `| <digits>` suffix becomes an item with the default weight.
pub fn parse_factors(text: &str) -> Vec<Factor> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

/// Parses one non-blank, trimmed line.
fn parse_line(line: &str) -> Factor {
    if let Some((item, weight)) = split_weighted(line) {
        return Factor {
            item: item.to_string(),
            weight,
        };
    }

    Factor {
        item: line.to_string(),
        weight: FactorWeight::DEFAULT,
    }
}

/// Splits `<text> | <digits>` at the last bar.
///
/// Digits that overflow saturate, so `"x | 99999999999999999999"` still clamps to 10.
fn split_weighted(line: &str) -> Option<(&str, FactorWeight)> {
    let (left, right) = line.rsplit_once('|')?;
    let item = left.trim();
    let digits = right.trim();

    if item.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let raw = digits.parse::<u64>().unwrap_or(u64::MAX);
    Some((item, FactorWeight::clamped(raw)))
}
