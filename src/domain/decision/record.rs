//! DecisionRecord - the immutable outcome of one analysis run.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use super::composite::{Alpha, CompositeScore};
use super::emotional::EmotionalScore;
use super::logical_scorer::{LogicalScore, LogicalScores};
use super::narrative::AnalysisText;
use super::option::{OptionInput, Side};
use crate::domain::foundation::{AnalysisId, Timestamp};

/// Where a network-derived signal came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SignalSource {
    /// The model answered and its content was used as-is.
    Model,
    /// The model answered but some or all content was replaced by defaults.
    Defaulted { detail: String },
    /// No model answer; deterministic fallback text was used.
    Fallback { reason: String },
}

impl SignalSource {
    pub fn is_authoritative(&self) -> bool {
        matches!(self, SignalSource::Model)
    }
}

/// Provenance of the two network-facing steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub emotional: SignalSource,
    pub narrative: SignalSource,
}

impl Provenance {
    /// True when either step had to degrade.
    pub fn is_degraded(&self) -> bool {
        !(self.emotional.is_authoritative() && self.narrative.is_authoritative())
    }
}

/// Complete result of comparing two options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    id: AnalysisId,
    timestamp: Timestamp,
    option_a: OptionInput,
    option_b: OptionInput,
    logical: LogicalScores,
    emotional: EmotionalScore,
    composite: CompositeScore,
    alpha: Alpha,
    analysis: AnalysisText,
    winner: Side,
    provenance: Provenance,
}

impl DecisionRecord {
    /// Assembles a record. The winner is derived from the composite score.
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        id: AnalysisId,
        option_a: OptionInput,
        option_b: OptionInput,
        logical: LogicalScores,
        emotional: EmotionalScore,
        composite: CompositeScore,
        alpha: Alpha,
        analysis: AnalysisText,
        provenance: Provenance,
    ) -> Self {
        Self {
            id,
            timestamp: Timestamp::now(),
            option_a,
            option_b,
            logical,
            emotional,
            winner: composite.winner(),
            composite,
            alpha,
            analysis,
            provenance,
        }
    }

    pub fn id(&self) -> AnalysisId {
        self.id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn option(&self, side: Side) -> &OptionInput {
        match side {
            Side::A => &self.option_a,
            Side::B => &self.option_b,
        }
    }

    pub fn logical(&self, side: Side) -> LogicalScore {
        match side {
            Side::A => self.logical.a,
            Side::B => self.logical.b,
        }
    }

    pub fn logical_scores(&self) -> &LogicalScores {
        &self.logical
    }

    pub fn emotional(&self) -> EmotionalScore {
        self.emotional
    }

    pub fn composite(&self) -> CompositeScore {
        self.composite
    }

    pub fn alpha(&self) -> Alpha {
        self.alpha
    }

    pub fn analysis(&self) -> &AnalysisText {
        &self.analysis
    }

    pub fn winner(&self) -> Side {
        self.winner
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Name of the recommended option.
    pub fn winner_name(&self) -> &str {
        &self.option(self.winner).name
    }

    /// Plain-text rendering for terminals and logs.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Choose {}", self.winner_name());
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<10}{:>10}{:>12}{:>10}", "", "Logical", "Emotional", "Final");
        for side in [Side::A, Side::B] {
            let emotional = match side {
                Side::A => self.emotional.a(),
                Side::B => self.emotional.b(),
            };
            let _ = writeln!(
                out,
                "{:<10}{:>10.2}{:>12.2}{:>10.2}",
                format!("Option {}", side),
                self.logical(side).normalized,
                emotional,
                self.composite.for_side(side),
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Logic: {}", self.analysis.logic);
        let _ = writeln!(out, "Emotion: {}", self.analysis.emotion);
        let _ = writeln!(out, "Verdict: {}", self.analysis.verdict);
        if self.provenance.is_degraded() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Note: parts of this analysis used offline defaults.");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::logical_scorer::LogicalScorer;
    use crate::domain::decision::option::OptionDraft;

    fn record(emotional: EmotionalScore, provenance: Provenance) -> DecisionRecord {
        let a = OptionDraft::new("Cheap flat", "Cheaper | 8", "").parse();
        let b = OptionDraft::new("Nice flat", "", "Expensive | 8").parse();
        let logical = LogicalScorer::score(&a, &b);
        let composite = CompositeScore::blend(&logical, &emotional, Alpha::DEFAULT);
        DecisionRecord::assemble(
            AnalysisId::new(),
            a,
            b,
            logical,
            emotional,
            composite,
            Alpha::DEFAULT,
            AnalysisText::templated(composite.winner()),
            provenance,
        )
    }

    fn authoritative() -> Provenance {
        Provenance {
            emotional: SignalSource::Model,
            narrative: SignalSource::Model,
        }
    }

    #[test]
    fn winner_follows_composite() {
        let rec = record(EmotionalScore::neutral(), authoritative());
        assert_eq!(rec.winner(), Side::A);
        assert_eq!(rec.winner_name(), "Cheap flat");
    }

    #[test]
    fn summary_shows_scores_and_verdict() {
        let rec = record(EmotionalScore::neutral(), authoritative());
        let summary = rec.summary();
        assert!(summary.starts_with("Choose Cheap flat\n"));
        assert!(summary.contains("Option A"));
        assert!(summary.contains("5.60"));
        assert!(summary.contains("-5.60"));
        assert!(summary.contains("Verdict: Option A is recommended"));
        assert!(!summary.contains("offline defaults"));
    }

    #[test]
    fn degraded_provenance_is_flagged() {
        let provenance = Provenance {
            emotional: SignalSource::Fallback {
                reason: "all credentials exhausted".to_string(),
            },
            narrative: SignalSource::Model,
        };
        assert!(provenance.is_degraded());
        assert!(record(EmotionalScore::neutral(), provenance)
            .summary()
            .contains("offline defaults"));
    }

    #[test]
    fn record_serializes_for_export() {
        let rec = record(EmotionalScore::new(2.0, -3.0), authoritative());
        let json = serde_json::to_value(&rec).unwrap();

        assert_eq!(json["winner"], "A");
        assert_eq!(json["emotional"]["B_emotional"], -3.0);
        assert_eq!(json["option_a"]["pros"][0]["item"], "Cheaper");
        assert_eq!(json["option_a"]["pros"][0]["weight"], 8);
        assert_eq!(json["provenance"]["emotional"]["source"], "model");
        assert_eq!(json["alpha"], 0.3);

        let back: DecisionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, rec);
    }
}
