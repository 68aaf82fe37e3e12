use crate::domain::values::class_probabilities::ClassProbabilities;
use crate::domain::values::confidence::Confidence;
use crate::domain::values::score::Score;
use crate::domain::values::sentiment_label::SentimentLabel;
use serde::Serialize;
use std::collections::BTreeMap;

pub const ANALYZER_FINBERT: &str = "finbert";
pub const ANALYZER_HYBRID: &str = "hybrid";
pub const ANALYZER_LLM_FAILED: &str = "llm-failed";

/// Normalized outcome of one sentiment analysis.
///
/// Fields are private so the score/label/confidence invariants hold for every
/// value: the score is clamped to `[-1, 1]`, the confidence to `[0, 1]`, and
/// the label is always `SentimentLabel::from_score(score)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResult {
    score: Score,
    label: SentimentLabel,
    confidence: Confidence,
    analyzer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspects: Option<BTreeMap<String, f64>>,
}

impl SentimentResult {
    pub fn new(score: f64, confidence: f64, analyzer: impl Into<String>) -> Self {
        let score = Score::clamped(score);
        Self {
            label: SentimentLabel::from_score(score.value()),
            score,
            confidence: Confidence::clamped(confidence),
            analyzer: analyzer.into(),
            reasoning: None,
            aspects: None,
        }
    }

    pub fn from_probabilities(probs: &ClassProbabilities) -> Self {
        Self::new(probs.score(), probs.confidence(), ANALYZER_FINBERT)
    }

    /// Neutral placeholder returned when every LLM provider failed.
    pub fn llm_failed(reasoning: impl Into<String>) -> Self {
        Self::new(0.0, 0.0, ANALYZER_LLM_FAILED).with_reasoning(reasoning)
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn with_optional_reasoning(mut self, reasoning: Option<String>) -> Self {
        self.reasoning = reasoning;
        self
    }

    /// Aspect scores are clamped like the headline score; an empty map is
    /// stored as `None`.
    pub fn with_aspects(mut self, aspects: Option<BTreeMap<String, f64>>) -> Self {
        self.aspects = aspects
            .map(|m| {
                m.into_iter()
                    .map(|(k, v)| (k, Score::clamped(v).value()))
                    .collect::<BTreeMap<_, _>>()
            })
            .filter(|m| !m.is_empty());
        self
    }

    pub fn score(&self) -> f64 {
        self.score.value()
    }

    pub fn label(&self) -> SentimentLabel {
        self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence.value()
    }

    pub fn analyzer(&self) -> &str {
        &self.analyzer
    }

    pub fn reasoning(&self) -> Option<&str> {
        self.reasoning.as_deref()
    }

    pub fn aspects(&self) -> Option<&BTreeMap<String, f64>> {
        self.aspects.as_ref()
    }

    pub fn is_llm_failure(&self) -> bool {
        self.analyzer == ANALYZER_LLM_FAILED
    }
}
