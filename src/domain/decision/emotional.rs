//! Emotional scores and their extraction from free-text completions.
//!
//! The model is asked for a JSON object such as
//! `{"A_emotional": 6, "B_emotional": -2}` but frequently wraps it in prose.
//! Extraction scans for the first brace-balanced object, validates both
//! fields and clamps them into [-10, 10]. It never fails: anything unusable
//! resolves to the neutral score with a reason attached.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::logical_scorer::SCORE_SCALE;

/// Wire name of option A's score.
pub const A_FIELD: &str = "A_emotional";
/// Wire name of option B's score.
pub const B_FIELD: &str = "B_emotional";

/// Sentiment score per option, always within [-10, 10].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionalScore {
    #[serde(rename = "A_emotional")]
    a: f64,
    #[serde(rename = "B_emotional")]
    b: f64,
}

impl EmotionalScore {
    /// Creates a score pair, clamping both values. Non-finite values become 0.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            a: clamp_score(a),
            b: clamp_score(b),
        }
    }

    /// The `{0, 0}` score used whenever the model gives nothing usable.
    pub fn neutral() -> Self {
        Self { a: 0.0, b: 0.0 }
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }
}

impl Default for EmotionalScore {
    fn default() -> Self {
        Self::neutral()
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-SCORE_SCALE, SCORE_SCALE)
    } else {
        0.0
    }
}

/// Why extraction fell back to the neutral score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum NeutralReason {
    /// No balanced `{ ... }` span in the text.
    NoJsonObject,
    /// A span was found but did not parse.
    MalformedJson(String),
    /// Neither score field held a number.
    NonNumericScores,
}

impl fmt::Display for NeutralReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeutralReason::NoJsonObject => write!(f, "no JSON object in completion"),
            NeutralReason::MalformedJson(err) => write!(f, "malformed JSON: {}", err),
            NeutralReason::NonNumericScores => write!(f, "score fields are not numeric"),
        }
    }
}

/// Outcome of emotional score extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum EmotionalExtraction {
    /// Scores read from the completion (after clamping).
    Parsed(EmotionalScore),
    /// Nothing usable; the neutral score applies.
    Neutral(NeutralReason),
}

impl EmotionalExtraction {
    /// The resolved scores, neutral when extraction failed.
    pub fn scores(&self) -> EmotionalScore {
        match self {
            EmotionalExtraction::Parsed(scores) => *scores,
            EmotionalExtraction::Neutral(_) => EmotionalScore::neutral(),
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, EmotionalExtraction::Parsed(_))
    }
}

/// Extracts the emotional score pair from a completion.
///
/// Every brace-balanced object is tried in order, so prose such as `{if}`
/// ahead of the real object does not hide it. The first object carrying a
/// numeric score wins.
pub fn extract_emotional_scores(text: &str) -> EmotionalExtraction {
    let mut reason = NeutralReason::NoJsonObject;
    for candidate in json_candidates(text) {
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) => match scores_from_value(&value) {
                parsed @ EmotionalExtraction::Parsed(_) => return parsed,
                EmotionalExtraction::Neutral(r) => reason = r,
            },
            Err(e) => reason = NeutralReason::MalformedJson(e.to_string()),
        }
    }

    EmotionalExtraction::Neutral(reason)
}

fn scores_from_value(value: &Value) -> EmotionalExtraction {
    let a = numeric_field(value, A_FIELD);
    let b = numeric_field(value, B_FIELD);

    if a.is_none() && b.is_none() {
        return EmotionalExtraction::Neutral(NeutralReason::NonNumericScores);
    }

    EmotionalExtraction::Parsed(EmotionalScore::new(a.unwrap_or(0.0), b.unwrap_or(0.0)))
}

/// Reads a field as a number. Numeric strings such as `"7.5"` are accepted.
fn numeric_field(value: &Value, field: &str) -> Option<f64> {
    match value.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Balanced object spans, one per opening brace, in text order.
fn json_candidates(text: &str) -> Vec<&str> {
    text.match_indices('{')
        .filter_map(|(start, _)| {
            balanced_end(&text[start..]).map(|end| &text[start..start + end])
        })
        .collect()
}

/// Byte length of the balanced object at the start of `text`, if it closes.
///
/// Braces inside string literals are ignored.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plain_json_is_parsed() {
        let result = extract_emotional_scores(r#"{"A_emotional": 6.5, "B_emotional": -2}"#);
        assert_eq!(result, EmotionalExtraction::Parsed(EmotionalScore::new(6.5, -2.0)));
    }

    #[test]
    fn json_wrapped_in_commentary_is_found() {
        let text = "Sure! Here are the scores:\n```json\n{\n  \"A_emotional\": 4,\n  \"B_emotional\": 7\n}\n```\nLet me know {if} you need more.";
        let scores = extract_emotional_scores(text).scores();
        assert_eq!(scores.a(), 4.0);
        assert_eq!(scores.b(), 7.0);
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        let scores = extract_emotional_scores(r#"{"A_emotional": 42, "B_emotional": -13.5}"#).scores();
        assert_eq!(scores.a(), 10.0);
        assert_eq!(scores.b(), -10.0);
    }

    #[test]
    fn missing_field_counts_as_zero() {
        let result = extract_emotional_scores(r#"{"A_emotional": 3}"#);
        assert!(result.is_parsed());
        assert_eq!(result.scores(), EmotionalScore::new(3.0, 0.0));
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let scores = extract_emotional_scores(r#"{"A_emotional": "7.5", "B_emotional": " -1 "}"#).scores();
        assert_eq!(scores, EmotionalScore::new(7.5, -1.0));
    }

    #[test]
    fn non_numeric_fields_fall_back_to_neutral() {
        let result = extract_emotional_scores(r#"{"A_emotional": "high", "B_emotional": null}"#);
        assert_eq!(result, EmotionalExtraction::Neutral(NeutralReason::NonNumericScores));
        assert_eq!(result.scores(), EmotionalScore::neutral());
    }

    #[test]
    fn text_without_json_is_neutral() {
        let result = extract_emotional_scores("Both options feel reasonable to me.");
        assert_eq!(result, EmotionalExtraction::Neutral(NeutralReason::NoJsonObject));
    }

    #[test]
    fn malformed_json_is_neutral() {
        let result = extract_emotional_scores("{A_emotional: six, B_emotional: two}");
        assert!(matches!(result, EmotionalExtraction::Neutral(NeutralReason::MalformedJson(_))));
        assert_eq!(result.scores(), EmotionalScore::neutral());
    }

    #[test]
    fn braces_inside_strings_do_not_break_balancing() {
        let text = r#"{"note": "a } in text", "A_emotional": 1, "B_emotional": 2} trailing }"#;
        assert_eq!(extract_emotional_scores(text).scores(), EmotionalScore::new(1.0, 2.0));
    }

    #[test]
    fn unclosed_outer_brace_still_finds_inner_object() {
        assert_eq!(balanced_end("{ { }"), None);
        let result = extract_emotional_scores(r#"{ {"A_emotional": 1} "#);
        assert_eq!(result, EmotionalExtraction::Parsed(EmotionalScore::new(1.0, 0.0)));
    }

    #[test]
    fn prose_braces_before_object_are_skipped() {
        let text = r#"Scores {as requested}: {} then {"A_emotional": -3, "B_emotional": 5}"#;
        let result = extract_emotional_scores(text);
        assert_eq!(result, EmotionalExtraction::Parsed(EmotionalScore::new(-3.0, 5.0)));
    }

    #[test]
    fn non_finite_values_are_zeroed() {
        let score = EmotionalScore::new(f64::NAN, f64::INFINITY);
        assert_eq!(score, EmotionalScore::neutral());
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let json = serde_json::to_value(EmotionalScore::new(1.0, -1.0)).unwrap();
        assert_eq!(json["A_emotional"], 1.0);
        assert_eq!(json["B_emotional"], -1.0);
    }

    proptest! {
        #[test]
        fn extracted_scores_always_in_range(text in "\\PC{0,200}") {
            let scores = extract_emotional_scores(&text).scores();
            prop_assert!((-10.0..=10.0).contains(&scores.a()));
            prop_assert!((-10.0..=10.0).contains(&scores.b()));
        }

        #[test]
        fn any_numeric_pair_lands_in_range(a in -1.0e6f64..1.0e6, b in -1.0e6f64..1.0e6) {
            let text = format!("Result: {{\"A_emotional\": {}, \"B_emotional\": {}}}", a, b);
            let scores = extract_emotional_scores(&text).scores();
            prop_assert!((-10.0..=10.0).contains(&scores.a()));
            prop_assert!((scores.a() - a.clamp(-10.0, 10.0)).abs() < 1e-9);
            prop_assert!((scores.b() - b.clamp(-10.0, 10.0)).abs() < 1e-9);
        }
    }
}
