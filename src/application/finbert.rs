use crate::domain::entities::sentiment_result::SentimentResult;
use crate::domain::error::DomainError;
use crate::domain::ports::sentiment_analyzer::SentimentScorer;
use crate::domain::ports::sentiment_model::{ModelLoader, SentimentModel};
use crate::domain::values::class_probabilities::ClassProbabilities;
use std::sync::Arc;
use tokio::sync::OnceCell;

pub const DEFAULT_MAX_TOKENS: usize = 512;
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// FinBERT first-pass scorer.
///
/// The model is loaded on first use and then shared by every call made
/// through this scorer; concurrent first calls wait on a single load. A failed
/// load is not cached, so the next call tries again. Loading and forward
/// passes run on tokio's blocking pool.
pub struct FinbertScorer {
    loader: Arc<dyn ModelLoader>,
    model: OnceCell<Arc<dyn SentimentModel>>,
    max_tokens: usize,
    batch_size: usize,
}

impl FinbertScorer {
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            loader,
            model: OnceCell::new(),
            max_tokens: DEFAULT_MAX_TOKENS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens.max(1);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    pub async fn analyze(&self, text: &str) -> Result<SentimentResult, DomainError> {
        self.score(text).await
    }

    pub async fn analyze_batch(&self, texts: &[String]) -> Result<Vec<SentimentResult>, DomainError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let model = self.model().await?;

        let truncated: Vec<String> = texts
            .iter()
            .map(|t| truncate_tokens(t, self.max_tokens))
            .collect();

        let mut results = Vec::with_capacity(texts.len());
        for chunk in truncated.chunks(self.batch_size) {
            let probs = run_blocking(model.clone(), chunk.to_vec()).await?;
            if probs.len() != chunk.len() {
                return Err(DomainError::Model(format!(
                    "FinBERT returned {} results for {} inputs",
                    probs.len(),
                    chunk.len()
                )));
            }
            results.extend(probs.iter().map(SentimentResult::from_probabilities));
        }
        Ok(results)
    }

    async fn model(&self) -> Result<Arc<dyn SentimentModel>, DomainError> {
        self.model
            .get_or_try_init(|| async {
                tracing::info!("loading FinBERT model");
                let loader = self.loader.clone();
                tokio::task::spawn_blocking(move || loader.load())
                    .await
                    .map_err(|e| DomainError::Model(format!("FinBERT load task failed: {e}")))?
            })
            .await
            .cloned()
    }
}

async fn run_blocking(
    model: Arc<dyn SentimentModel>,
    texts: Vec<String>,
) -> Result<Vec<ClassProbabilities>, DomainError> {
    tokio::task::spawn_blocking(move || model.predict(&texts))
        .await
        .map_err(|e| DomainError::Model(format!("FinBERT inference task failed: {e}")))?
}

#[async_trait::async_trait]
impl SentimentScorer for FinbertScorer {
    async fn score_batch(&self, texts: &[String]) -> Result<Vec<SentimentResult>, DomainError> {
        self.analyze_batch(texts).await
    }
}

/// Keep the first `max_tokens` whitespace-separated tokens.
pub fn truncate_tokens(text: &str, max_tokens: usize) -> String {
    let mut words = text.split_whitespace();
    let kept: Vec<&str> = words.by_ref().take(max_tokens).collect();
    if words.next().is_none() {
        return text.trim().to_string();
    }
    kept.join(" ")
}
