pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::aggregate::{aggregate_by_symbol, SymbolSentiment};
use crate::application::fallback::FallbackOrchestrator;
use crate::application::finbert::FinbertScorer;
use crate::application::hybrid::HybridCombiner;
use crate::config::Settings;
use crate::domain::entities::news_article::NewsArticle;
use crate::domain::entities::sentiment_result::SentimentResult;
use crate::domain::error::DomainError;
use crate::domain::ports::llm_provider::LlmProvider;
use crate::domain::ports::secret_store::SecretStore;
use crate::domain::ports::sentiment_analyzer::SentimentScorer;
use crate::domain::ports::sentiment_model::ModelLoader;
use crate::infrastructure::finbert::hf_inference::HfInferenceLoader;
use crate::infrastructure::llm::registry::{build_providers, ProviderStatus};
use crate::infrastructure::secrets::json_file::JsonFileSecretStore;
use crate::infrastructure::secrets::CredentialStore;
use std::sync::Arc;

/// Credential key for the hosted FinBERT endpoint (`HUGGINGFACE_API_KEY`).
const FINBERT_CREDENTIAL_KEY: &str = "HUGGINGFACE";

pub struct FinSent {
    hybrid: HybridCombiner,
    fallback: Arc<FallbackOrchestrator>,
}

impl FinSent {
    /// Wire everything from environment settings.
    pub fn new() -> Result<Self, DomainError> {
        let settings = Settings::from_env()?;
        Self::from_settings(&settings)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, DomainError> {
        let secrets: Option<Arc<dyn SecretStore>> = match &settings.secrets_file {
            Some(path) => Some(Arc::new(JsonFileSecretStore::open(path)?)),
            None => None,
        };
        let credentials = Arc::new(CredentialStore::new(secrets));
        let providers = build_providers(&settings.providers, credentials.clone())?;

        let loader: Option<Arc<dyn ModelLoader>> = if settings.skip_finbert {
            None
        } else {
            Some(Arc::new(HfInferenceLoader::new(
                settings.finbert_endpoint.clone(),
                credentials.get_api_key(FINBERT_CREDENTIAL_KEY),
            )))
        };

        Ok(Self::with_providers(settings, providers, loader))
    }

    /// Wire with explicit providers and model loader; `None` disables FinBERT.
    pub fn with_providers(
        settings: &Settings,
        providers: Vec<Arc<dyn LlmProvider>>,
        loader: Option<Arc<dyn ModelLoader>>,
    ) -> Self {
        let scorer = loader.map(|l| {
            Arc::new(
                FinbertScorer::new(l)
                    .with_max_tokens(settings.max_tokens)
                    .with_batch_size(settings.finbert_batch_size),
            ) as Arc<dyn SentimentScorer>
        });
        Self::with_scorer(settings, providers, scorer)
    }

    /// Wire with any first-pass scorer in place of FinBERT.
    pub fn with_scorer(
        settings: &Settings,
        providers: Vec<Arc<dyn LlmProvider>>,
        scorer: Option<Arc<dyn SentimentScorer>>,
    ) -> Self {
        let fallback = Arc::new(
            FallbackOrchestrator::new(providers)
                .with_timeout(settings.provider_timeout)
                .with_concurrency(settings.batch_concurrency),
        );
        let hybrid = match scorer {
            Some(scorer) => HybridCombiner::new(scorer, fallback.clone()),
            None => HybridCombiner::without_finbert(fallback.clone()),
        }
        .with_confidence_threshold(settings.confidence_threshold);

        Self { hybrid, fallback }
    }

    pub async fn analyze(
        &self,
        text: &str,
        categories: Option<&[String]>,
        is_high_importance: Option<bool>,
    ) -> Result<SentimentResult, DomainError> {
        self.hybrid.analyze(text, categories, is_high_importance).await
    }

    pub async fn analyze_batch(
        &self,
        texts: &[String],
        categories_list: Option<&[Vec<String>]>,
        importance_flags: Option<&[bool]>,
    ) -> Result<Vec<SentimentResult>, DomainError> {
        self.hybrid.analyze_batch(texts, categories_list, importance_flags).await
    }

    /// Score articles using their own categories. Aligned with `articles`.
    pub async fn analyze_articles(&self, articles: &[NewsArticle]) -> Result<Vec<SentimentResult>, DomainError> {
        let texts: Vec<String> = articles.iter().map(NewsArticle::analysis_text).collect();
        let categories: Vec<Vec<String>> = articles.iter().map(|a| a.categories.clone()).collect();
        self.analyze_batch(&texts, Some(categories.as_slice()), None).await
    }

    /// Ask the LLM chain directly, bypassing FinBERT.
    pub async fn analyze_llm(&self, text: &str, context: Option<&str>) -> SentimentResult {
        self.fallback.analyze(text, context).await
    }

    pub fn aggregate(&self, articles: &[NewsArticle], results: &[SentimentResult]) -> Vec<SymbolSentiment> {
        aggregate_by_symbol(articles, results)
    }

    pub fn provider_status(&self) -> Vec<ProviderStatus> {
        self.fallback.status()
    }

    pub fn uses_finbert(&self) -> bool {
        self.hybrid.uses_finbert()
    }
}
