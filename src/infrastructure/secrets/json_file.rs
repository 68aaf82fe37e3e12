use crate::domain::error::DomainError;
use crate::domain::ports::secret_store::SecretStore;
use std::collections::HashMap;
use std::path::Path;

/// Secrets read once from a flat JSON object, e.g. `{"GROQ": "gsk_..."}`.
/// Keys are matched case-insensitively; non-string values are ignored.
#[derive(Debug)]
pub struct JsonFileSecretStore {
    values: HashMap<String, String>,
}

impl JsonFileSecretStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DomainError::SecretStore(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        let doc: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| DomainError::SecretStore(format!("invalid secrets JSON: {e}")))?;
        let obj = doc
            .as_object()
            .ok_or_else(|| DomainError::SecretStore("secrets file must be a JSON object".into()))?;

        let values = obj
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.to_uppercase(), s.to_string())))
            .collect();
        Ok(Self { values })
    }
}

impl SecretStore for JsonFileSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.values.get(&key.to_uppercase()).cloned())
    }
}
