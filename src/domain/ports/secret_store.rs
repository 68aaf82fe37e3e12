use crate::domain::error::DomainError;

/// Key-value secret backend consulted before the environment.
pub trait SecretStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
}
