//! FinBERT served by a Hugging Face text-classification endpoint
//! (the hosted Inference API or a self-hosted inference server).
//!
//! Request:  `{"inputs": ["..."], "options": {"wait_for_model": true}}`
//! Response: `[[{"label": "positive", "score": 0.93}, ...], ...]`, one inner
//! list per input. Some servers answer a single input with a flat list.

use crate::domain::error::DomainError;
use crate::domain::ports::sentiment_model::{ModelLoader, SentimentModel};
use crate::domain::values::class_probabilities::ClassProbabilities;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a [String],
    options: ClassifyOptions,
}

#[derive(Serialize)]
struct ClassifyOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Batch(Vec<Vec<LabelScore>>),
    Single(Vec<LabelScore>),
}

pub struct HfInferenceModel {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HfInferenceModel {
    fn new(endpoint: String, token: Option<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Model(format!("cannot build FinBERT client: {e}")))?;
        Ok(Self { client, endpoint, token })
    }
}

impl SentimentModel for HfInferenceModel {
    fn predict(&self, texts: &[String]) -> Result<Vec<ClassProbabilities>, DomainError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let mut req = self.client.post(&self.endpoint).json(&ClassifyRequest {
            inputs: texts,
            options: ClassifyOptions { wait_for_model: true },
        });
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .map_err(|e| DomainError::Model(format!("FinBERT request error: {e}")))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(DomainError::Model(format!("FinBERT endpoint {status}: {body}")));
        }

        let parsed: ClassifyResponse = resp
            .json()
            .map_err(|e| DomainError::Model(format!("FinBERT response: {e}")))?;
        let rows = match parsed {
            ClassifyResponse::Batch(rows) => rows,
            ClassifyResponse::Single(row) => vec![row],
        };
        if rows.len() != texts.len() {
            return Err(DomainError::Model(format!(
                "FinBERT returned {} results for {} inputs",
                rows.len(),
                texts.len()
            )));
        }

        rows.iter()
            .map(|row| {
                ClassProbabilities::from_labelled(row.iter().map(|ls| (ls.label.as_str(), ls.score)))
                    .map_err(DomainError::Model)
            })
            .collect()
    }
}

/// Builds an [`HfInferenceModel`] and checks it answers before handing it out,
/// so an unreachable endpoint fails at load time.
pub struct HfInferenceLoader {
    endpoint: String,
    token: Option<String>,
    timeout: Duration,
}

impl HfInferenceLoader {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl ModelLoader for HfInferenceLoader {
    fn load(&self) -> Result<Arc<dyn SentimentModel>, DomainError> {
        let model = HfInferenceModel::new(self.endpoint.clone(), self.token.clone(), self.timeout)?;
        model
            .predict(&["Markets were flat today.".to_string()])
            .map_err(|e| DomainError::Model(format!("FinBERT warm-up failed: {e}")))?;
        tracing::info!(endpoint = %self.endpoint, "FinBERT model ready");
        Ok(Arc::new(model))
    }
}
