use super::anthropic::AnthropicProvider;
use super::groq::GroqProvider;
use super::openai::OpenAiProvider;
use crate::config::ProviderConfig;
use crate::domain::error::DomainError;
use crate::domain::ports::llm_provider::LlmProvider;
use crate::domain::values::provider_kind::ProviderKind;
use crate::infrastructure::secrets::CredentialStore;
use serde::Serialize;
use std::sync::Arc;

type Constructor = fn(ProviderConfig, Arc<CredentialStore>) -> Arc<dyn LlmProvider>;

fn groq(config: ProviderConfig, credentials: Arc<CredentialStore>) -> Arc<dyn LlmProvider> {
    Arc::new(GroqProvider::new(config, credentials))
}

fn anthropic(config: ProviderConfig, credentials: Arc<CredentialStore>) -> Arc<dyn LlmProvider> {
    Arc::new(AnthropicProvider::new(config, credentials))
}

fn openai(config: ProviderConfig, credentials: Arc<CredentialStore>) -> Arc<dyn LlmProvider> {
    Arc::new(OpenAiProvider::new(config, credentials))
}

/// Every provider the crate can build, keyed by kind.
pub const REGISTRY: &[(ProviderKind, Constructor)] = &[
    (ProviderKind::Groq, groq as Constructor),
    (ProviderKind::Anthropic, anthropic as Constructor),
    (ProviderKind::OpenAi, openai as Constructor),
];

pub fn build_provider(
    config: ProviderConfig,
    credentials: Arc<CredentialStore>,
) -> Result<Arc<dyn LlmProvider>, DomainError> {
    let ctor = REGISTRY
        .iter()
        .find(|(kind, _)| *kind == config.kind)
        .map(|(_, ctor)| *ctor)
        .ok_or_else(|| DomainError::Config(format!("no constructor registered for {}", config.kind)))?;
    Ok(ctor(config, credentials))
}

/// Providers in the order given, which is their priority order.
pub fn build_providers(
    configs: &[ProviderConfig],
    credentials: Arc<CredentialStore>,
) -> Result<Vec<Arc<dyn LlmProvider>>, DomainError> {
    configs
        .iter()
        .cloned()
        .map(|c| build_provider(c, credentials.clone()))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub model: String,
    pub priority: usize,
    pub configured: bool,
}

/// Configuration health of each provider. Never makes a network call.
pub fn provider_status(providers: &[Arc<dyn LlmProvider>]) -> Vec<ProviderStatus> {
    providers
        .iter()
        .enumerate()
        .map(|(i, p)| ProviderStatus {
            name: p.name().to_string(),
            model: p.model().to_string(),
            priority: i + 1,
            configured: p.is_configured(),
        })
        .collect()
}
