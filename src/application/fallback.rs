use crate::domain::entities::sentiment_result::SentimentResult;
use crate::domain::error::DomainError;
use crate::domain::ports::llm_provider::LlmProvider;
use crate::domain::ports::sentiment_analyzer::LlmAnalyzer;
use crate::infrastructure::llm::registry::{provider_status, ProviderStatus};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_BATCH_CONCURRENCY: usize = 5;

/// Longest provider error kept in the failure summary.
const MAX_ERROR_CHARS: usize = 100;

/// Tries LLM providers in priority order and returns the first success.
///
/// Attempts within one text are strictly sequential. Providers without a
/// credential are skipped without a request. When every provider fails the
/// result is a neutral `llm-failed` value whose reasoning lists each
/// provider's outcome; `analyze` itself never fails.
pub struct FallbackOrchestrator {
    providers: Vec<Arc<dyn LlmProvider>>,
    timeout: Duration,
    concurrency: usize,
}

impl FallbackOrchestrator {
    pub fn new(providers: Vec<Arc<dyn LlmProvider>>) -> Self {
        Self {
            providers,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
            concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    /// Deadline applied to each provider call individually.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// How many texts `analyze_batch` keeps in flight.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn providers(&self) -> &[Arc<dyn LlmProvider>] {
        &self.providers
    }

    pub fn status(&self) -> Vec<ProviderStatus> {
        provider_status(&self.providers)
    }

    #[tracing::instrument(name = "fallback.analyze", skip(self, text, context), fields(text_len = text.len()))]
    pub async fn analyze(&self, text: &str, context: Option<&str>) -> SentimentResult {
        if self.providers.is_empty() {
            return SentimentResult::llm_failed("No LLM providers available");
        }

        let mut failures: Vec<String> = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let name = provider.name();
            if !provider.is_configured() {
                tracing::debug!(provider = name, "skipping provider without credentials");
                failures.push(format!("{name}: not configured"));
                continue;
            }

            match self.call_with_timeout(provider.as_ref(), text, context).await {
                Ok(result) => {
                    tracing::debug!(provider = name, score = result.score(), "provider succeeded");
                    return result;
                }
                Err(e) if e.is_not_configured() => {
                    failures.push(format!("{name}: not configured"));
                }
                Err(e) => {
                    tracing::warn!(provider = name, error = %e, "provider failed, trying next");
                    failures.push(format!("{name}: {}", truncate_error(&e.to_string())));
                }
            }
        }

        tracing::warn!(attempts = failures.len(), "all LLM providers failed");
        SentimentResult::llm_failed(format!("All LLM providers failed: {}", failures.join("; ")))
    }

    /// Analyze many texts concurrently. Output is aligned with `texts`.
    pub async fn analyze_batch(&self, texts: &[String]) -> Vec<SentimentResult> {
        let pending: Vec<_> = texts.iter().map(|text| self.analyze(text, None)).collect();
        stream::iter(pending).buffered(self.concurrency).collect().await
    }

    async fn call_with_timeout(
        &self,
        provider: &dyn LlmProvider,
        text: &str,
        context: Option<&str>,
    ) -> Result<SentimentResult, DomainError> {
        tokio::time::timeout(self.timeout, provider.analyze(text, context))
            .await
            .unwrap_or_else(|_| {
                Err(DomainError::Timeout {
                    provider: provider.name().to_string(),
                    timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                })
            })
    }
}

#[async_trait::async_trait]
impl LlmAnalyzer for FallbackOrchestrator {
    async fn analyze(&self, text: &str, context: Option<&str>) -> Result<SentimentResult, DomainError> {
        Ok(FallbackOrchestrator::analyze(self, text, context).await)
    }

    async fn analyze_batch(&self, texts: &[String]) -> Result<Vec<SentimentResult>, DomainError> {
        Ok(FallbackOrchestrator::analyze_batch(self, texts).await)
    }
}

fn truncate_error(msg: &str) -> String {
    match msg.char_indices().nth(MAX_ERROR_CHARS) {
        Some((idx, _)) => format!("{}...", &msg[..idx]),
        None => msg.to_string(),
    }
}
