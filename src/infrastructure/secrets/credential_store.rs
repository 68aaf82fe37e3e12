use crate::domain::ports::secret_store::SecretStore;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// API keys for the LLM providers, built once at startup and shared by every
/// client.
///
/// Lookup order is the secret store, then the `<PROVIDER>_API_KEY` environment
/// variable. The first answer for a provider (including "absent") is cached
/// and reused for the lifetime of the store.
pub struct CredentialStore {
    secrets: Option<Arc<dyn SecretStore>>,
    env: EnvLookup,
    cache: RwLock<HashMap<String, Option<String>>>,
}

impl CredentialStore {
    pub fn new(secrets: Option<Arc<dyn SecretStore>>) -> Self {
        Self::with_env_lookup(secrets, |name| std::env::var(name).ok())
    }

    /// Replace the environment lookup, e.g. with an empty one in tests.
    pub fn with_env_lookup<F>(secrets: Option<Arc<dyn SecretStore>>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            secrets,
            env: Box::new(env),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// A store that only answers from `secrets`.
    pub fn isolated(secrets: Arc<dyn SecretStore>) -> Self {
        Self::with_env_lookup(Some(secrets), |_| None)
    }

    pub fn get_api_key(&self, provider: &str) -> Option<String> {
        let key = provider.to_uppercase();
        if let Ok(cache) = self.cache.read() {
            if let Some(hit) = cache.get(&key) {
                return hit.clone();
            }
        }

        let resolved = self.resolve(&key);
        if let Ok(mut cache) = self.cache.write() {
            // Another task may have won the race; keep its answer.
            return cache.entry(key).or_insert(resolved).clone();
        }
        resolved
    }

    pub fn has_api_key(&self, provider: &str) -> bool {
        self.get_api_key(provider).is_some()
    }

    fn resolve(&self, key: &str) -> Option<String> {
        if let Some(store) = &self.secrets {
            match store.get(key) {
                Ok(Some(v)) if !v.trim().is_empty() => {
                    tracing::debug!(provider = key, "credential loaded from secret store");
                    return Some(v.trim().to_string());
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(provider = key, error = %e, "secret store lookup failed, trying environment");
                }
            }
        }

        let var = format!("{key}_API_KEY");
        (self.env)(&var)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self.cache.read().map(|c| c.len()).unwrap_or(0);
        f.debug_struct("CredentialStore")
            .field("has_secret_store", &self.secrets.is_some())
            .field("cached", &cached)
            .finish()
    }
}
