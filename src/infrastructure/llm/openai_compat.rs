//! Wire format shared by OpenAI and Groq (`POST {base}/chat/completions`).

use super::prompt::{user_prompt, MAX_TOKENS, SYSTEM_PROMPT, TEMPERATURE};
use super::response::parse_sentiment_reply;
use crate::config::ProviderConfig;
use crate::domain::entities::sentiment_result::SentimentResult;
use crate::domain::error::DomainError;
use crate::infrastructure::secrets::CredentialStore;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

pub struct ChatCompletions {
    client: Client,
    config: ProviderConfig,
    credentials: Arc<CredentialStore>,
}

impl ChatCompletions {
    pub fn new(config: ProviderConfig, credentials: Arc<CredentialStore>) -> Self {
        Self {
            client: Client::new(),
            config,
            credentials,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.has_api_key(&self.config.credential_key)
    }

    pub async fn analyze(&self, text: &str, context: Option<&str>) -> Result<SentimentResult, DomainError> {
        let name = self.config.kind.name();
        let api_key = self
            .credentials
            .get_api_key(&self.config.credential_key)
            .ok_or_else(|| DomainError::not_configured(name))?;

        let url = format!("{}/chat/completions", self.config.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&ChatRequest {
                model: &self.config.model,
                messages: vec![
                    ChatMessage {
                        role: "system",
                        content: SYSTEM_PROMPT.to_string(),
                    },
                    ChatMessage {
                        role: "user",
                        content: user_prompt(text, context),
                    },
                ],
                temperature: TEMPERATURE,
                max_tokens: MAX_TOKENS,
            })
            .send()
            .await
            .map_err(|e| DomainError::provider(name, format!("request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::provider(name, format!("HTTP {status}: {body}")));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Parse(format!("{name} response: {e}")))?;
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DomainError::provider(name, "empty completion"))?;

        tracing::debug!(provider = name, reply_len = reply.len(), "completion received");
        parse_sentiment_reply(&reply, self.config.kind.analyzer_tag())
    }
}
