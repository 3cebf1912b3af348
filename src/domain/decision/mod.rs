//! Decision module - scoring two options and explaining the outcome.
//!
//! # Components
//!
//! - `factor` - Factor value objects and the free-text factor parser
//! - `logical_scorer` - Weighted pros minus cons on a shared scale
//! - `emotional` - Emotional scores and extraction from model output
//! - `narrative` - Three-section rationale and its extraction
//! - `composite` - Alpha blending and winner selection
//! - `prompts` - Prompt templates for the two inference steps
//! - `record` - The immutable decision record
//! - `stage` - Analysis run lifecycle
//!
//! Everything here is pure. The network-facing steps live behind the
//! `InferenceClient` port and are orchestrated by the application layer.

mod composite;
mod emotional;
mod factor;
mod logical_scorer;
mod narrative;
mod option;
mod prompts;
mod record;
mod stage;

pub use composite::{Alpha, CompositeScore};
pub use emotional::{
    extract_emotional_scores, EmotionalExtraction, EmotionalScore, NeutralReason, A_FIELD,
    B_FIELD,
};
pub use factor::{parse_factors, Factor, FactorWeight};
pub use logical_scorer::{LogicalScore, LogicalScorer, LogicalScores, SCORE_SCALE};
pub use narrative::{
    extract_analysis, AnalysisText, NarrativeExtraction, Section, EMOTION_MARKER, LOGIC_MARKER,
    VERDICT_MARKER,
};
pub use option::{OptionDraft, OptionInput, Side};
pub use prompts::{
    declared_alpha, narrative_prompt, recommended_side, sentiment_prompt, NarrativeScores,
    PromptKind,
};
pub use record::{DecisionRecord, Provenance, SignalSource};
pub use stage::AnalysisStage;
