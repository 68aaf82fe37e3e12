//! Turning an LLM reply into a [`SentimentResult`].

use crate::domain::entities::sentiment_result::SentimentResult;
use crate::domain::error::DomainError;
use crate::domain::values::confidence::Confidence;
use crate::domain::values::sentiment_label::SentimentLabel;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct RawSentiment {
    score: f64,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    aspects: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Strip a surrounding markdown fence (```json ... ```) and anything outside
/// the outermost JSON object.
pub fn extract_json(reply: &str) -> &str {
    let cleaned = reply
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```JSON")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => &cleaned[start..=end],
        _ => cleaned,
    }
}

pub fn parse_sentiment_reply(reply: &str, analyzer: &str) -> Result<SentimentResult, DomainError> {
    let json = extract_json(reply);
    let raw: RawSentiment = serde_json::from_str(json).map_err(|e| {
        DomainError::Parse(format!(
            "{analyzer} returned invalid sentiment JSON: {e} (reply: {})",
            super::prompt::truncate_chars(reply, 200)
        ))
    })?;

    if !raw.score.is_finite() {
        return Err(DomainError::Parse(format!("{analyzer} returned a non-finite score")));
    }

    let result = SentimentResult::new(raw.score, raw.confidence.unwrap_or(Confidence::default().value()), analyzer);

    if let Some(label) = raw.label.as_deref() {
        match label.parse::<SentimentLabel>() {
            Ok(parsed) if parsed != result.label() => tracing::debug!(
                analyzer,
                reported = %parsed,
                derived = %result.label(),
                "LLM label disagrees with its score, keeping score-derived label"
            ),
            Ok(_) => {}
            Err(e) => tracing::debug!(analyzer, error = %e, "ignoring unrecognised label"),
        }
    }

    let aspects = raw.aspects.map(|m| {
        m.into_iter()
            .filter_map(|(k, v)| v.as_f64().map(|f| (k, f)))
            .collect::<BTreeMap<_, _>>()
    });

    Ok(result
        .with_optional_reasoning(raw.reasoning.filter(|r| !r.trim().is_empty()))
        .with_aspects(aspects))
}
