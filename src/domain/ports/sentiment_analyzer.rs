//! Ports consumed by the hybrid combiner.
//!
//! [`SentimentScorer`] is the fast first pass run on every text;
//! [`LlmAnalyzer`] is the slower escalation path.

use crate::domain::entities::sentiment_result::SentimentResult;
use crate::domain::error::DomainError;

#[async_trait::async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Results are positionally aligned with `texts`.
    async fn score_batch(&self, texts: &[String]) -> Result<Vec<SentimentResult>, DomainError>;

    async fn score(&self, text: &str) -> Result<SentimentResult, DomainError> {
        self.score_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::Model("scorer returned no result".into()))
    }
}

#[async_trait::async_trait]
pub trait LlmAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str, context: Option<&str>) -> Result<SentimentResult, DomainError>;

    /// Results are positionally aligned with `texts`.
    async fn analyze_batch(&self, texts: &[String]) -> Result<Vec<SentimentResult>, DomainError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.analyze(text, None).await?);
        }
        Ok(out)
    }
}
