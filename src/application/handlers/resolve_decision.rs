//! ResolveDecisionHandler - runs one two-option analysis end to end.
//!
//! Pipeline: validate → logical scoring → emotional scoring (inference) →
//! composite blend → narrative (inference) → record. Inference never fails;
//! degraded signals are recorded in the record's provenance. The only errors
//! are invalid input and cancellation.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

use crate::domain::decision::{
    extract_analysis, extract_emotional_scores, narrative_prompt, sentiment_prompt, Alpha,
    AnalysisStage, CompositeScore, DecisionRecord, EmotionalExtraction, NarrativeScores,
    LogicalScorer, OptionDraft, OptionInput, Provenance, Side, SignalSource,
};
use crate::domain::foundation::{AnalysisId, StateMachine, ValidationError};
use crate::ports::{CancelSignal, Completion, CompletionSource, FallbackReason, InferenceClient};

/// Command to compare two options.
#[derive(Debug, Clone)]
pub struct ResolveDecisionCommand {
    pub option_a: OptionInput,
    pub option_b: OptionInput,
}

impl ResolveDecisionCommand {
    pub fn new(option_a: OptionInput, option_b: OptionInput) -> Self {
        Self { option_a, option_b }
    }

    /// Parses raw factor-list text for both options.
    pub fn from_drafts(option_a: &OptionDraft, option_b: &OptionDraft) -> Self {
        Self::new(option_a.parse(), option_b.parse())
    }

    fn option(&self, side: Side) -> &OptionInput {
        match side {
            Side::A => &self.option_a,
            Side::B => &self.option_b,
        }
    }
}

/// Errors surfaced to callers of the resolver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("Option {side} is invalid: {reason}")]
    InvalidOption { side: Side, reason: ValidationError },

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Invalid stage transition: {0}")]
    InvalidStageTransition(ValidationError),
}

/// Handler for decision analyses.
///
/// Holds no per-run state, so one instance can serve concurrent runs.
pub struct ResolveDecisionHandler {
    inference: Arc<dyn InferenceClient>,
    alpha: Alpha,
}

impl ResolveDecisionHandler {
    pub fn new(inference: Arc<dyn InferenceClient>, alpha: Alpha) -> Self {
        Self { inference, alpha }
    }

    pub fn alpha(&self) -> Alpha {
        self.alpha
    }

    /// Compares two options.
    pub async fn resolve(
        &self,
        option_a: OptionInput,
        option_b: OptionInput,
    ) -> Result<DecisionRecord, AnalysisError> {
        self.handle(
            ResolveDecisionCommand::new(option_a, option_b),
            &CancelSignal::never(),
        )
        .await
    }

    /// Compares two options, stopping with [`AnalysisError::Cancelled`] once
    /// `true` is sent on `shutdown`.
    pub async fn resolve_with_shutdown(
        &self,
        option_a: OptionInput,
        option_b: OptionInput,
        shutdown: watch::Receiver<bool>,
    ) -> Result<DecisionRecord, AnalysisError> {
        self.handle(
            ResolveDecisionCommand::new(option_a, option_b),
            &CancelSignal::from_watch(shutdown),
        )
        .await
    }

    /// Compares two options given as raw factor-list text.
    pub async fn resolve_drafts(
        &self,
        option_a: &OptionDraft,
        option_b: &OptionDraft,
    ) -> Result<DecisionRecord, AnalysisError> {
        self.handle(
            ResolveDecisionCommand::from_drafts(option_a, option_b),
            &CancelSignal::never(),
        )
        .await
    }

    pub async fn handle(
        &self,
        cmd: ResolveDecisionCommand,
        cancel: &CancelSignal,
    ) -> Result<DecisionRecord, AnalysisError> {
        // 1. Reject bad input before any work
        for side in [Side::A, Side::B] {
            cmd.option(side)
                .validate()
                .map_err(|reason| AnalysisError::InvalidOption { side, reason })?;
        }

        let mut run = Run::start(AnalysisId::new());
        let ResolveDecisionCommand { option_a, option_b } = cmd;

        // 2. Logical scores
        run.advance(AnalysisStage::LogicalScoring)?;
        let logical = LogicalScorer::score(&option_a, &option_b);

        // 3. Emotional scores
        run.advance(AnalysisStage::EmotionalScoring)?;
        let completion = run
            .infer(self.inference.as_ref(), &sentiment_prompt(&option_a, &option_b), cancel)
            .await?;
        let extraction = extract_emotional_scores(&completion.text);
        let emotional = extraction.scores();
        let emotional_source = match (fallback_reason(&completion), &extraction) {
            (Some(reason), _) => SignalSource::Fallback {
                reason: reason.to_string(),
            },
            (None, EmotionalExtraction::Parsed(_)) => SignalSource::Model,
            (None, EmotionalExtraction::Neutral(reason)) => {
                tracing::warn!(analysis_id = %run.id, reason = %reason, "Emotional scores defaulted to neutral");
                SignalSource::Defaulted {
                    detail: reason.to_string(),
                }
            }
        };

        // 4. Composite and winner
        run.advance(AnalysisStage::CompositeScoring)?;
        let composite = CompositeScore::blend(&logical, &emotional, self.alpha);
        let winner = composite.winner();

        // 5. Narrative
        run.advance(AnalysisStage::NarrativeGeneration)?;
        let prompt = narrative_prompt(
            &option_a,
            &option_b,
            NarrativeScores {
                logical: &logical,
                emotional: &emotional,
                composite: &composite,
                alpha: self.alpha,
                winner,
            },
        );
        let completion = run.infer(self.inference.as_ref(), &prompt, cancel).await?;
        let extraction = extract_analysis(&completion.text);
        let missing = extraction.missing_count();
        let narrative_source = match fallback_reason(&completion) {
            Some(reason) => SignalSource::Fallback {
                reason: reason.to_string(),
            },
            None if missing == 0 => SignalSource::Model,
            None => {
                tracing::warn!(analysis_id = %run.id, missing, "Narrative sections defaulted");
                SignalSource::Defaulted {
                    detail: format!("{} of 3 sections missing", missing),
                }
            }
        };
        let analysis = extraction.into_analysis(winner);

        // 6. Record
        run.advance(AnalysisStage::Complete)?;
        let record = DecisionRecord::assemble(
            run.id,
            option_a,
            option_b,
            logical,
            emotional,
            composite,
            self.alpha,
            analysis,
            Provenance {
                emotional: emotional_source,
                narrative: narrative_source,
            },
        );

        tracing::info!(
            analysis_id = %record.id(),
            winner = %record.winner(),
            composite_a = record.composite().a,
            composite_b = record.composite().b,
            degraded = record.provenance().is_degraded(),
            "Analysis complete"
        );
        Ok(record)
    }
}

/// Stage tracking for a single run.
struct Run {
    id: AnalysisId,
    stage: AnalysisStage,
}

impl Run {
    fn start(id: AnalysisId) -> Self {
        tracing::debug!(analysis_id = %id, stage = %AnalysisStage::Parsing, "Analysis started");
        Self {
            id,
            stage: AnalysisStage::Parsing,
        }
    }

    fn advance(&mut self, next: AnalysisStage) -> Result<(), AnalysisError> {
        self.stage = self
            .stage
            .transition_to(next)
            .map_err(AnalysisError::InvalidStageTransition)?;
        tracing::debug!(analysis_id = %self.id, stage = %self.stage, "Stage entered");
        Ok(())
    }

    async fn infer(
        &self,
        inference: &dyn InferenceClient,
        prompt: &str,
        cancel: &CancelSignal,
    ) -> Result<Completion, AnalysisError> {
        if cancel.is_cancelled() {
            return Err(self.cancelled());
        }
        let completion = inference.complete(prompt, cancel).await;
        if fallback_reason(&completion) == Some(FallbackReason::Cancelled) {
            return Err(self.cancelled());
        }
        Ok(completion)
    }

    fn cancelled(&self) -> AnalysisError {
        tracing::info!(analysis_id = %self.id, stage = %self.stage, "Analysis cancelled");
        AnalysisError::Cancelled
    }
}

fn fallback_reason(completion: &Completion) -> Option<FallbackReason> {
    match completion.source {
        CompletionSource::Fallback(reason) => Some(reason),
        CompletionSource::Model { .. } => None,
    }
}
