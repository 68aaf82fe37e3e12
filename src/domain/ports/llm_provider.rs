use crate::domain::entities::sentiment_result::SentimentResult;
use crate::domain::error::DomainError;
use crate::domain::values::provider_kind::ProviderKind;

/// One LLM backend. Implementations issue a single request per call and never
/// retry; fallback between providers is the orchestrator's job.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn model(&self) -> &str;

    /// Whether a credential is available. Must not touch the network.
    fn is_configured(&self) -> bool;

    /// Returns `DomainError::NotConfigured` without a request when no
    /// credential is available.
    async fn analyze(&self, text: &str, context: Option<&str>) -> Result<SentimentResult, DomainError>;

    fn name(&self) -> &'static str {
        self.kind().name()
    }
}
