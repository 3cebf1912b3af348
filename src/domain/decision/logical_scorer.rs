//! Logical Scorer - weighted pros minus cons on a shared [-10, 10] scale.

use serde::{Deserialize, Serialize};

use super::factor::Factor;
use super::option::OptionInput;

/// Highest weight a single factor can carry, used for the normalization bound.
const MAX_FACTOR_WEIGHT: u32 = 10;

/// Upper end of the normalized scale.
pub const SCORE_SCALE: f64 = 10.0;

/// Logical score for one option.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalScore {
    /// Σ pros.weight − Σ cons.weight.
    pub raw: i32,
    /// `raw` scaled against the shared denominator, within [-10, 10].
    pub normalized: f64,
}

/// Logical scores for both options, normalized against one denominator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalScores {
    pub a: LogicalScore,
    pub b: LogicalScore,
    /// The shared denominator both sides were normalized with.
    pub max_possible: u32,
}

/// Logical scoring functions.
pub struct LogicalScorer;

impl LogicalScorer {
    /// Computes Σ pros − Σ cons. May be negative.
    pub fn raw_score(pros: &[Factor], cons: &[Factor]) -> i32 {
        let sum = |factors: &[Factor]| -> i32 {
            factors.iter().map(|f| f.weight().value() as i32).sum()
        };
        sum(pros) - sum(cons)
    }

    /// Largest attainable |raw| across both options, floored at 1.
    ///
    /// The denominator is shared so both sides land on a comparable scale. An
    /// option with fewer factors than its rival therefore cannot reach ±10.
    pub fn max_possible(a: &OptionInput, b: &OptionInput) -> u32 {
        let bound = |option: &OptionInput| option.factor_count() as u32 * MAX_FACTOR_WEIGHT;
        bound(a).max(bound(b)).max(1)
    }

    /// Scales a raw score into [-10, 10] against `max_possible`.
    pub fn normalize(raw: i32, max_possible: u32) -> f64 {
        if max_possible == 0 {
            return 0.0;
        }
        (raw as f64 / max_possible as f64) * SCORE_SCALE
    }

    /// Scores both options against the shared denominator.
    ///
    /// # Edge Cases
    /// - Both options empty: denominator is 1, both scores are 0
    /// - Only cons: negative raw and normalized scores
    pub fn score(a: &OptionInput, b: &OptionInput) -> LogicalScores {
        let max_possible = Self::max_possible(a, b);
        let score_one = |option: &OptionInput| {
            let raw = Self::raw_score(&option.pros, &option.cons);
            LogicalScore {
                raw,
                normalized: Self::normalize(raw, max_possible),
            }
        };

        LogicalScores {
            a: score_one(a),
            b: score_one(b),
            max_possible,
        }
    }
}
