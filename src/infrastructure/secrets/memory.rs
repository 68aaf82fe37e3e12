use crate::domain::error::DomainError;
use crate::domain::ports::secret_store::SecretStore;
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct InMemorySecretStore {
    values: HashMap<String, String>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into().to_uppercase(), v.into()))
                .collect(),
        }
    }
}

impl SecretStore for InMemorySecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.values.get(&key.to_uppercase()).cloned())
    }
}
