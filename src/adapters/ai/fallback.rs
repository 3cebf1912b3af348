//! Deterministic text synthesized when no model is reachable.
//!
//! The text depends only on the prompt, so identical prompts always degrade
//! to identical output.

use crate::domain::decision::{
    declared_alpha, recommended_side, Alpha, PromptKind, EMOTION_MARKER, LOGIC_MARKER,
    VERDICT_MARKER,
};

const SENTIMENT_GUIDANCE: &str = "Emotional sentiment could not be assessed right now. \
Treat both options as emotionally neutral and weigh how each one would affect your \
stress, satisfaction and day-to-day wellbeing.";

const GENERIC_GUIDANCE: &str = "Detailed analysis is unavailable right now. \
Compare the weighted pros and cons of each option and favour the one whose \
strongest benefits matter most to you.";

/// Builds fallback text appropriate to the template `prompt` came from.
pub fn synthesize(prompt: &str) -> String {
    match PromptKind::detect(prompt) {
        PromptKind::Narrative => narrative(prompt),
        PromptKind::Sentiment => SENTIMENT_GUIDANCE.to_string(),
        PromptKind::Other => GENERIC_GUIDANCE.to_string(),
    }
}

fn narrative(prompt: &str) -> String {
    let subject = recommended_side(prompt)
        .map(|side| format!("Option {}", side))
        .unwrap_or_else(|| "The recommended option".to_string());
    let alpha = declared_alpha(prompt).unwrap_or(Alpha::DEFAULT);
    let logical_pct = (alpha.logical_weight() * 100.0).round();
    let emotional_pct = (alpha.value() * 100.0).round();

    format!(
        "{LOGIC_MARKER}\nBased on logical scoring, {subject} has a stronger rational foundation \
considering the weighted pros and cons.\n\n\
{EMOTION_MARKER}\nFrom an emotional perspective, {subject} appears to offer better \
psychological outcomes and satisfaction potential.\n\n\
{VERDICT_MARKER}\n{subject} is recommended as it scores higher in the composite analysis \
that balances logical reasoning ({logical_pct}%) with emotional intelligence ({emotional_pct}%)."
    )
}
