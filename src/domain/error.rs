use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{provider} is not configured (no API key)")]
    NotConfigured { provider: String },

    #[error("{provider} failed: {msg}")]
    Provider { provider: String, msg: String },

    #[error("{provider} timed out after {timeout_ms}ms")]
    Timeout { provider: String, timeout_ms: u64 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Secret store error: {0}")]
    SecretStore(String),
}

impl DomainError {
    pub fn provider(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        DomainError::Provider {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    pub fn not_configured(provider: impl Into<String>) -> Self {
        DomainError::NotConfigured {
            provider: provider.into(),
        }
    }

    pub fn is_not_configured(&self) -> bool {
        matches!(self, DomainError::NotConfigured { .. })
    }
}
