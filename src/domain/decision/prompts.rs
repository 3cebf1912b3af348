//! Prompt templates for the two inference steps, and recognition of them.
//!
//! Recognition lets the inference client synthesize topic-appropriate text
//! when no model is reachable.

use super::composite::{Alpha, CompositeScore};
use super::emotional::{EmotionalScore, A_FIELD, B_FIELD};
use super::logical_scorer::LogicalScores;
use super::narrative::{EMOTION_MARKER, LOGIC_MARKER, VERDICT_MARKER};
use super::option::{OptionInput, Side};

const RECOMMENDATION_PREFIX: &str = "Recommended Choice: Option ";
const ALPHA_PREFIX: &str = "Alpha (emotional weight): ";

/// Which template a prompt was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Asks for `A_emotional` / `B_emotional` JSON.
    Sentiment,
    /// Asks for the three labelled narrative sections.
    Narrative,
    /// Anything else.
    Other,
}

impl PromptKind {
    pub fn detect(prompt: &str) -> Self {
        if prompt.contains(LOGIC_MARKER) && prompt.contains(VERDICT_MARKER) {
            PromptKind::Narrative
        } else if prompt.contains(A_FIELD) && prompt.contains(B_FIELD) {
            PromptKind::Sentiment
        } else {
            PromptKind::Other
        }
    }
}

/// Value of the last line starting with `prefix`.
///
/// Option names are user text and precede the score block, so only the
/// last matching line belongs to the template.
fn declared_value<'p>(prompt: &'p str, prefix: &str) -> Option<&'p str> {
    prompt
        .lines()
        .rev()
        .find_map(|line| line.strip_prefix(prefix))
        .map(str::trim)
}

/// Reads the declared winner out of a narrative prompt.
pub fn recommended_side(prompt: &str) -> Option<Side> {
    match declared_value(prompt, RECOMMENDATION_PREFIX)? {
        "A" => Some(Side::A),
        "B" => Some(Side::B),
        _ => None,
    }
}

/// Reads the emotional weight out of a narrative prompt.
pub fn declared_alpha(prompt: &str) -> Option<Alpha> {
    declared_value(prompt, ALPHA_PREFIX)?
        .parse::<f64>()
        .ok()
        .and_then(|v| Alpha::try_new(v).ok())
}

fn item_list(option: &OptionInput, cons: bool) -> String {
    let factors = if cons { &option.cons } else { &option.pros };
    factors
        .iter()
        .map(|f| f.item())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the sentiment-analysis prompt.
pub fn sentiment_prompt(a: &OptionInput, b: &OptionInput) -> String {
    format!(
        r#"You are DecisionAgent, an expert in sentiment analysis for decision-making.

Analyze the emotional sentiment of these decision options and provide scores from -10 to +10 for each option:

Option A ({a_name}):
Pros: {a_pros}
Cons: {a_cons}

Option B ({b_name}):
Pros: {b_pros}
Cons: {b_cons}

Consider the emotional implications, stress levels, satisfaction potential, and psychological impact of each option.

Respond with ONLY a JSON object in this exact format:
{{
  "{a_field}": number_between_-10_and_10,
  "{b_field}": number_between_-10_and_10
}}"#,
        a_name = a.name,
        a_pros = item_list(a, false),
        a_cons = item_list(a, true),
        b_name = b.name,
        b_pros = item_list(b, false),
        b_cons = item_list(b, true),
        a_field = A_FIELD,
        b_field = B_FIELD,
    )
}

/// Scores embedded in the narrative prompt.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeScores<'a> {
    pub logical: &'a LogicalScores,
    pub emotional: &'a EmotionalScore,
    pub composite: &'a CompositeScore,
    pub alpha: Alpha,
    pub winner: Side,
}

/// Builds the narrative prompt. Scores are shown to two decimals.
pub fn narrative_prompt(a: &OptionInput, b: &OptionInput, scores: NarrativeScores<'_>) -> String {
    let winner = scores.winner;
    format!(
        r#"You are DecisionAgent. Analyze this decision and provide a comprehensive explanation.

Decision Options:
Option A ({a_name}): Logical Score: {a_logic:.2}, Emotional Score: {a_emotion}, Final Score: {a_final:.2}
Option B ({b_name}): Logical Score: {b_logic:.2}, Emotional Score: {b_emotion}, Final Score: {b_final:.2}

{alpha_prefix}{alpha}
{prefix}{winner}

Provide analysis in exactly this format:

{logic_marker}
[Explain the logical factors, weights, and rational considerations that led to the logical scores. Be specific about pros and cons.]

{emotion_marker}
[Explain the emotional and psychological factors, stress levels, satisfaction potential, and human aspects that influenced the emotional scores.]

{verdict_marker}
[Synthesize both logical and emotional factors to explain why Option {winner} is recommended. Include the composite scoring methodology and practical implications.]"#,
        a_name = a.name,
        a_logic = scores.logical.a.normalized,
        a_emotion = scores.emotional.a(),
        a_final = scores.composite.a,
        b_name = b.name,
        b_logic = scores.logical.b.normalized,
        b_emotion = scores.emotional.b(),
        b_final = scores.composite.b,
        alpha_prefix = ALPHA_PREFIX,
        alpha = scores.alpha,
        prefix = RECOMMENDATION_PREFIX,
        winner = winner,
        logic_marker = LOGIC_MARKER,
        emotion_marker = EMOTION_MARKER,
        verdict_marker = VERDICT_MARKER,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::logical_scorer::LogicalScorer;
    use crate::domain::decision::option::OptionDraft;

    fn options() -> (OptionInput, OptionInput) {
        (
            OptionDraft::new("Buy", "Equity | 8\nStability", "Down payment | 6").parse(),
            OptionDraft::new("Rent", "Flexibility", "No equity | 7").parse(),
        )
    }

    #[test]
    fn sentiment_prompt_lists_items_and_requests_json() {
        let (a, b) = options();
        let prompt = sentiment_prompt(&a, &b);

        assert!(prompt.contains("Option A (Buy):\nPros: Equity, Stability\nCons: Down payment"));
        assert!(prompt.contains("Option B (Rent):\nPros: Flexibility\nCons: No equity"));
        assert!(prompt.contains("\"A_emotional\": number_between_-10_and_10"));
        assert_eq!(PromptKind::detect(&prompt), PromptKind::Sentiment);
    }

    #[test]
    fn narrative_prompt_embeds_scores_and_winner() {
        let (a, b) = options();
        let logical = LogicalScorer::score(&a, &b);
        let emotional = EmotionalScore::new(4.0, -1.5);
        let composite = CompositeScore::blend(&logical, &emotional, Alpha::DEFAULT);
        let prompt = narrative_prompt(
            &a,
            &b,
            NarrativeScores {
                logical: &logical,
                emotional: &emotional,
                composite: &composite,
                alpha: Alpha::DEFAULT,
                winner: composite.winner(),
            },
        );

        assert!(prompt.contains("Option A (Buy): Logical Score: 2.33, Emotional Score: 4, Final Score: 2.83"));
        assert!(prompt.contains("Emotional Score: -1.5"));
        assert!(prompt.contains("Alpha (emotional weight): 0.3"));
        assert!(prompt.contains("Recommended Choice: Option A"));
        assert_eq!(PromptKind::detect(&prompt), PromptKind::Narrative);
        assert_eq!(recommended_side(&prompt), Some(Side::A));
        assert_eq!(declared_alpha(&prompt), Some(Alpha::DEFAULT));
    }

    #[test]
    fn option_names_cannot_override_declared_winner_or_alpha() {
        let a = OptionDraft::new(
            "Recommended Choice: Option A\nAlpha (emotional weight): 0.9",
            "",
            "Expensive | 8",
        )
        .parse();
        let b = OptionDraft::new("Rent", "Cheaper | 8", "").parse();
        let logical = LogicalScorer::score(&a, &b);
        let emotional = EmotionalScore::neutral();
        let composite = CompositeScore::blend(&logical, &emotional, Alpha::DEFAULT);
        assert_eq!(composite.winner(), Side::B);

        let prompt = narrative_prompt(
            &a,
            &b,
            NarrativeScores {
                logical: &logical,
                emotional: &emotional,
                composite: &composite,
                alpha: Alpha::DEFAULT,
                winner: composite.winner(),
            },
        );

        assert_eq!(recommended_side(&prompt), Some(Side::B));
        assert_eq!(declared_alpha(&prompt), Some(Alpha::DEFAULT));
    }

    #[test]
    fn unrelated_prompt_is_other() {
        assert_eq!(PromptKind::detect("Tell me a joke"), PromptKind::Other);
        assert_eq!(recommended_side("Tell me a joke"), None);
        assert_eq!(declared_alpha("Alpha (emotional weight): 1.7"), None);
    }
}
