//! Lifecycle of a single analysis run.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Pipeline stage of an analysis run. Runs only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    Parsing,
    LogicalScoring,
    EmotionalScoring,
    CompositeScoring,
    NarrativeGeneration,
    Complete,
}

impl AnalysisStage {
    /// Stages in pipeline order.
    pub const ORDER: [AnalysisStage; 6] = [
        AnalysisStage::Parsing,
        AnalysisStage::LogicalScoring,
        AnalysisStage::EmotionalScoring,
        AnalysisStage::CompositeScoring,
        AnalysisStage::NarrativeGeneration,
        AnalysisStage::Complete,
    ];

    fn successor(&self) -> Option<AnalysisStage> {
        let index = Self::ORDER.iter().position(|s| s == self)?;
        Self::ORDER.get(index + 1).copied()
    }
}

impl StateMachine for AnalysisStage {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.successor() == Some(*target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        self.successor().into_iter().collect()
    }
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnalysisStage::Parsing => "parsing",
            AnalysisStage::LogicalScoring => "logical_scoring",
            AnalysisStage::EmotionalScoring => "emotional_scoring",
            AnalysisStage::CompositeScoring => "composite_scoring",
            AnalysisStage::NarrativeGeneration => "narrative_generation",
            AnalysisStage::Complete => "complete",
        };
        f.write_str(s)
    }
}
