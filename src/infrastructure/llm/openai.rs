use super::openai_compat::ChatCompletions;
use crate::config::ProviderConfig;
use crate::domain::entities::sentiment_result::SentimentResult;
use crate::domain::error::DomainError;
use crate::domain::ports::llm_provider::LlmProvider;
use crate::domain::values::provider_kind::ProviderKind;
use crate::infrastructure::secrets::CredentialStore;
use std::sync::Arc;

pub struct OpenAiProvider {
    inner: ChatCompletions,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig, credentials: Arc<CredentialStore>) -> Self {
        debug_assert_eq!(config.kind, ProviderKind::OpenAi);
        Self {
            inner: ChatCompletions::new(config, credentials),
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model(&self) -> &str {
        &self.inner.config().model
    }

    fn is_configured(&self) -> bool {
        self.inner.is_configured()
    }

    async fn analyze(&self, text: &str, context: Option<&str>) -> Result<SentimentResult, DomainError> {
        self.inner.analyze(text, context).await
    }
}
