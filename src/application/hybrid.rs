//! FinBERT first, LLM when it matters.
//!
//! Every text is scored by the fast classifier. A text is escalated to the LLM
//! chain when the caller flags it as important, when FinBERT is not confident
//! enough, or when it carries a high-importance category. The three triggers
//! are independent; any one of them escalates. When both scores exist they are
//! blended with fixed weights.

use crate::domain::entities::sentiment_result::{SentimentResult, ANALYZER_HYBRID};
use crate::domain::error::DomainError;
use crate::domain::ports::sentiment_analyzer::{LlmAnalyzer, SentimentScorer};
use std::sync::Arc;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.6;
pub const FINBERT_WEIGHT: f64 = 0.3;
pub const LLM_WEIGHT: f64 = 0.7;

/// Categories that always get an LLM opinion.
pub const HIGH_IMPORTANCE_CATEGORIES: [&str; 5] =
    ["earnings", "m&a", "merger_acquisition", "executive", "regulatory"];

pub struct HybridCombiner {
    finbert: Option<Arc<dyn SentimentScorer>>,
    llm: Arc<dyn LlmAnalyzer>,
    confidence_threshold: f64,
}

impl HybridCombiner {
    pub fn new(finbert: Arc<dyn SentimentScorer>, llm: Arc<dyn LlmAnalyzer>) -> Self {
        Self {
            finbert: Some(finbert),
            llm,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    /// LLM-only mode: no FinBERT pass, every text goes to the fallback chain.
    pub fn without_finbert(llm: Arc<dyn LlmAnalyzer>) -> Self {
        Self {
            finbert: None,
            llm,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    pub fn uses_finbert(&self) -> bool {
        self.finbert.is_some()
    }

    pub fn should_use_llm(
        &self,
        finbert: &SentimentResult,
        categories: &[String],
        is_high_importance: bool,
    ) -> bool {
        should_use_llm(finbert, categories, is_high_importance, self.confidence_threshold)
    }

    /// Only FinBERT failures are returned as errors; LLM trouble degrades to
    /// the FinBERT reading.
    #[tracing::instrument(name = "hybrid.analyze", skip(self, text, categories), fields(text_len = text.len()))]
    pub async fn analyze(
        &self,
        text: &str,
        categories: Option<&[String]>,
        is_high_importance: Option<bool>,
    ) -> Result<SentimentResult, DomainError> {
        let categories = categories.unwrap_or(&[]);
        let important = is_high_importance.unwrap_or(false);

        let Some(finbert) = &self.finbert else {
            return Ok(self.llm_only(text).await);
        };

        let fast = finbert.score(text).await?;
        if !self.should_use_llm(&fast, categories, important) {
            return Ok(fast);
        }

        tracing::debug!(finbert_confidence = fast.confidence(), "escalating to LLM");
        let deep = self.llm.analyze(text, None).await;
        Ok(merge_outcome(fast, deep))
    }

    /// Positionally aligned with `texts`. Missing entries in the optional
    /// lists mean "no categories" and "not important".
    #[tracing::instrument(name = "hybrid.analyze_batch", skip_all, fields(count = texts.len()))]
    pub async fn analyze_batch(
        &self,
        texts: &[String],
        categories_list: Option<&[Vec<String>]>,
        importance_flags: Option<&[bool]>,
    ) -> Result<Vec<SentimentResult>, DomainError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let Some(finbert) = &self.finbert else {
            return Ok(match self.llm.analyze_batch(texts).await {
                Ok(results) => results,
                Err(e) => {
                    tracing::warn!(error = %e, "LLM batch failed");
                    texts
                        .iter()
                        .map(|_| SentimentResult::llm_failed(format!("LLM analysis error: {e}")))
                        .collect()
                }
            });
        };

        let fast = finbert.score_batch(texts).await?;

        let escalate: Vec<usize> = fast
            .iter()
            .enumerate()
            .filter(|(i, result)| {
                let categories = categories_list
                    .and_then(|l| l.get(*i))
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                let important = importance_flags.and_then(|f| f.get(*i)).copied().unwrap_or(false);
                self.should_use_llm(result, categories, important)
            })
            .map(|(i, _)| i)
            .collect();

        if escalate.is_empty() {
            return Ok(fast);
        }
        tracing::debug!(escalated = escalate.len(), "escalating batch items to LLM");

        let escalated_texts: Vec<String> = escalate.iter().map(|&i| texts[i].clone()).collect();
        let deep: Vec<Result<SentimentResult, DomainError>> =
            match self.llm.analyze_batch(&escalated_texts).await {
                Ok(results) if results.len() == escalate.len() => results.into_iter().map(Ok).collect(),
                Ok(results) => {
                    let msg = format!("LLM returned {} results for {} texts", results.len(), escalate.len());
                    escalate.iter().map(|_| Err(DomainError::Model(msg.clone()))).collect()
                }
                Err(e) => {
                    let msg = e.to_string();
                    escalate.iter().map(|_| Err(DomainError::Model(msg.clone()))).collect()
                }
            };

        let mut out = fast;
        for (idx, outcome) in escalate.into_iter().zip(deep) {
            let fast = out[idx].clone();
            out[idx] = merge_outcome(fast, outcome);
        }
        Ok(out)
    }

    async fn llm_only(&self, text: &str) -> SentimentResult {
        match self.llm.analyze(text, None).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "LLM analysis failed with FinBERT disabled");
                SentimentResult::llm_failed(format!("LLM analysis error: {e}"))
            }
        }
    }
}

/// Escalation rule: any of the three triggers is enough.
pub fn should_use_llm(
    finbert: &SentimentResult,
    categories: &[String],
    is_high_importance: bool,
    confidence_threshold: f64,
) -> bool {
    is_high_importance
        || finbert.confidence() < confidence_threshold
        || categories.iter().any(|c| is_high_importance_category(c))
}

pub fn is_high_importance_category(category: &str) -> bool {
    let c = category.trim().to_lowercase();
    HIGH_IMPORTANCE_CATEGORIES.contains(&c.as_str())
}

pub fn combined_score(finbert_score: f64, llm_score: f64) -> f64 {
    FINBERT_WEIGHT * finbert_score + LLM_WEIGHT * llm_score
}

/// Blend a FinBERT reading with an LLM reading. Qualitative fields come from
/// the LLM since FinBERT has none.
pub fn combine(finbert: &SentimentResult, llm: &SentimentResult) -> SentimentResult {
    SentimentResult::new(
        combined_score(finbert.score(), llm.score()),
        finbert.confidence().max(llm.confidence()),
        ANALYZER_HYBRID,
    )
    .with_optional_reasoning(llm.reasoning().map(str::to_string))
    .with_aspects(llm.aspects().cloned())
}

fn merge_outcome(fast: SentimentResult, deep: Result<SentimentResult, DomainError>) -> SentimentResult {
    match deep {
        Ok(llm) if !llm.is_llm_failure() => combine(&fast, &llm),
        Ok(llm) => {
            tracing::debug!(reason = llm.reasoning().unwrap_or(""), "LLM chain failed, keeping FinBERT result");
            fast
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM analysis errored, keeping FinBERT result");
            fast
        }
    }
}
