//! Narrative analysis text and its extraction from labelled completions.
//!
//! The narrative prompt asks for three sections, each introduced by a fixed
//! marker. A section runs from the end of its marker to the next marker (or
//! the end of the text). Missing sections are reported as such and replaced
//! with templated text when the [`AnalysisText`] is assembled.

use serde::{Deserialize, Serialize};

use super::option::Side;

pub const LOGIC_MARKER: &str = "LOGIC_REASONING:";
pub const EMOTION_MARKER: &str = "EMOTION_REASONING:";
pub const VERDICT_MARKER: &str = "FINAL_VERDICT:";

const MARKERS: [&str; 3] = [LOGIC_MARKER, EMOTION_MARKER, VERDICT_MARKER];

/// The three-part rationale attached to every decision. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisText {
    pub logic: String,
    pub emotion: String,
    pub verdict: String,
}

impl AnalysisText {
    pub fn default_logic(winner: Side) -> String {
        format!(
            "Based on logical scoring, Option {} has a stronger rational foundation \
considering the weighted pros and cons.",
            winner
        )
    }

    pub fn default_emotion(winner: Side) -> String {
        format!(
            "From an emotional perspective, Option {} appears to offer better \
psychological outcomes and satisfaction potential.",
            winner
        )
    }

    pub fn default_verdict(winner: Side) -> String {
        format!(
            "Option {} is recommended based on the combined analysis.",
            winner
        )
    }

    /// Templated text for every section.
    pub fn templated(winner: Side) -> Self {
        Self {
            logic: Self::default_logic(winner),
            emotion: Self::default_emotion(winner),
            verdict: Self::default_verdict(winner),
        }
    }
}

/// Result of looking for one labelled section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Found(String),
    Missing,
}

impl Section {
    pub fn is_found(&self) -> bool {
        matches!(self, Section::Found(_))
    }

    fn or_else(self, default: impl FnOnce() -> String) -> String {
        match self {
            Section::Found(text) => text,
            Section::Missing => default(),
        }
    }
}

/// All three sections as found in a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeExtraction {
    pub logic: Section,
    pub emotion: Section,
    pub verdict: Section,
}

impl NarrativeExtraction {
    /// Number of sections that had to be defaulted.
    pub fn missing_count(&self) -> usize {
        [&self.logic, &self.emotion, &self.verdict]
            .iter()
            .filter(|s| !s.is_found())
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_count() == 0
    }

    /// Fills missing sections with templated text for `winner`.
    pub fn into_analysis(self, winner: Side) -> AnalysisText {
        AnalysisText {
            logic: self.logic.or_else(|| AnalysisText::default_logic(winner)),
            emotion: self.emotion.or_else(|| AnalysisText::default_emotion(winner)),
            verdict: self.verdict.or_else(|| AnalysisText::default_verdict(winner)),
        }
    }
}

/// Locates the three labelled sections in `text`.
///
/// Only the first occurrence of each marker counts. A marker followed by
/// nothing but whitespace is treated as missing.
pub fn extract_analysis(text: &str) -> NarrativeExtraction {
    let positions: Vec<Option<usize>> = MARKERS.iter().map(|m| text.find(m)).collect();

    let section = |index: usize| -> Section {
        let Some(start) = positions[index] else {
            return Section::Missing;
        };
        let body_start = start + MARKERS[index].len();
        let body_end = positions
            .iter()
            .flatten()
            .copied()
            .filter(|&p| p >= body_start)
            .min()
            .unwrap_or(text.len());

        let body = text[body_start..body_end].trim();
        if body.is_empty() {
            Section::Missing
        } else {
            Section::Found(body.to_string())
        }
    };

    NarrativeExtraction {
        logic: section(0),
        emotion: section(1),
        verdict: section(2),
    }
}
