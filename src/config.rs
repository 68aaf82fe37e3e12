//! Runtime settings, read once from the environment at startup.
//!
//! | Variable                         | Default                   |
//! |----------------------------------|---------------------------|
//! | `FINSENT_PROVIDERS`              | `groq,anthropic,openai`   |
//! | `FINSENT_CONFIDENCE_THRESHOLD`   | `0.6`                     |
//! | `FINSENT_PROVIDER_TIMEOUT_SECS`  | `30`                      |
//! | `FINSENT_BATCH_CONCURRENCY`      | `5`                       |
//! | `FINSENT_SKIP_FINBERT`           | `false`                   |
//! | `FINSENT_FINBERT_ENDPOINT`       | Hugging Face `ProsusAI/finbert` |
//! | `FINSENT_FINBERT_BATCH_SIZE`     | `16`                      |
//! | `FINSENT_MAX_TOKENS`             | `512`                     |
//! | `FINSENT_SECRETS_FILE`           | unset                     |
//! | `FINSENT_<PROVIDER>_MODEL`       | provider default          |
//! | `FINSENT_<PROVIDER>_BASE_URL`    | provider default          |

use crate::domain::error::DomainError;
use crate::domain::values::provider_kind::ProviderKind;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_FINBERT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/ProsusAI/finbert";

/// Static description of one provider in the fallback chain. Priority is the
/// position in [`Settings::providers`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub credential_key: String,
    pub model: String,
    pub base_url: String,
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            credential_key: kind.credential_key().to_string(),
            model: kind.default_model().to_string(),
            base_url: kind.default_base_url().to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub providers: Vec<ProviderConfig>,
    pub confidence_threshold: f64,
    pub provider_timeout: Duration,
    pub batch_concurrency: usize,
    pub skip_finbert: bool,
    pub finbert_endpoint: String,
    pub finbert_batch_size: usize,
    pub max_tokens: usize,
    pub secrets_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            providers: ProviderKind::DEFAULT_ORDER
                .iter()
                .map(|k| ProviderConfig::new(*k))
                .collect(),
            confidence_threshold: 0.6,
            provider_timeout: Duration::from_secs(30),
            batch_concurrency: 5,
            skip_finbert: false,
            finbert_endpoint: DEFAULT_FINBERT_ENDPOINT.to_string(),
            finbert_batch_size: 16,
            max_tokens: 512,
            secrets_file: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Settings::default();

        if let Some(list) = var("FINSENT_PROVIDERS") {
            let mut kinds: Vec<ProviderKind> = Vec::new();
            for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let kind = ProviderKind::from_str(part).map_err(DomainError::Config)?;
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
            settings.providers = kinds.into_iter().map(ProviderConfig::new).collect();
        }

        for provider in settings.providers.iter_mut() {
            let prefix = format!("FINSENT_{}", provider.kind.credential_key());
            if let Some(model) = var(&format!("{prefix}_MODEL")) {
                provider.model = model;
            }
            if let Some(url) = var(&format!("{prefix}_BASE_URL")) {
                provider.base_url = url.trim_end_matches('/').to_string();
            }
        }

        if let Some(v) = var("FINSENT_CONFIDENCE_THRESHOLD") {
            let threshold: f64 = parse("FINSENT_CONFIDENCE_THRESHOLD", &v)?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(DomainError::Config(format!(
                    "FINSENT_CONFIDENCE_THRESHOLD must be within 0..=1, got {threshold}"
                )));
            }
            settings.confidence_threshold = threshold;
        }
        if let Some(v) = var("FINSENT_PROVIDER_TIMEOUT_SECS") {
            let secs = parse_positive("FINSENT_PROVIDER_TIMEOUT_SECS", &v)?;
            settings.provider_timeout = Duration::from_secs(secs as u64);
        }
        if let Some(v) = var("FINSENT_BATCH_CONCURRENCY") {
            settings.batch_concurrency = parse_positive("FINSENT_BATCH_CONCURRENCY", &v)?;
        }
        if let Some(v) = var("FINSENT_SKIP_FINBERT") {
            settings.skip_finbert = parse_bool("FINSENT_SKIP_FINBERT", &v)?;
        }
        if let Some(v) = var("FINSENT_FINBERT_ENDPOINT") {
            settings.finbert_endpoint = v;
        }
        if let Some(v) = var("FINSENT_FINBERT_BATCH_SIZE") {
            settings.finbert_batch_size = parse_positive("FINSENT_FINBERT_BATCH_SIZE", &v)?;
        }
        if let Some(v) = var("FINSENT_MAX_TOKENS") {
            settings.max_tokens = parse_positive("FINSENT_MAX_TOKENS", &v)?;
        }
        settings.secrets_file = var("FINSENT_SECRETS_FILE").map(PathBuf::from);

        Ok(settings)
    }
}

fn parse<T: FromStr>(name: &str, value: &str) -> Result<T, DomainError>
where
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| DomainError::Config(format!("{name}={value}: {e}")))
}

fn parse_positive(name: &str, value: &str) -> Result<usize, DomainError> {
    match parse::<usize>(name, value)? {
        0 => Err(DomainError::Config(format!("{name} must be greater than zero"))),
        n => Ok(n),
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, DomainError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(DomainError::Config(format!("{name}={value}: expected a boolean"))),
    }
}
