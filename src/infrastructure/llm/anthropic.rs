use super::prompt::{user_prompt, MAX_TOKENS, SYSTEM_PROMPT, TEMPERATURE};
use super::response::parse_sentiment_reply;
use crate::config::ProviderConfig;
use crate::domain::entities::sentiment_result::SentimentResult;
use crate::domain::error::DomainError;
use crate::domain::ports::llm_provider::LlmProvider;
use crate::domain::values::provider_kind::ProviderKind;
use crate::infrastructure::secrets::CredentialStore;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: Client,
    config: ProviderConfig,
    credentials: Arc<CredentialStore>,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    system: &'a str,
    messages: Vec<UserMessage>,
}

#[derive(Serialize)]
struct UserMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicProvider {
    pub fn new(config: ProviderConfig, credentials: Arc<CredentialStore>) -> Self {
        debug_assert_eq!(config.kind, ProviderKind::Anthropic);
        Self {
            client: Client::new(),
            config,
            credentials,
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_configured(&self) -> bool {
        self.credentials.has_api_key(&self.config.credential_key)
    }

    async fn analyze(&self, text: &str, context: Option<&str>) -> Result<SentimentResult, DomainError> {
        let api_key = self
            .credentials
            .get_api_key(&self.config.credential_key)
            .ok_or_else(|| DomainError::not_configured("anthropic"))?;

        let url = format!("{}/v1/messages", self.config.base_url);
        let resp = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&MessagesRequest {
                model: &self.config.model,
                max_tokens: MAX_TOKENS,
                temperature: TEMPERATURE,
                system: SYSTEM_PROMPT,
                messages: vec![UserMessage {
                    role: "user",
                    content: user_prompt(text, context),
                }],
            })
            .send()
            .await
            .map_err(|e| DomainError::provider("anthropic", format!("request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::provider("anthropic", format!("HTTP {status}: {body}")));
        }

        let parsed: MessagesResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Parse(format!("anthropic response: {e}")))?;
        let reply: String = parsed
            .content
            .into_iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text)
            .collect::<Vec<_>>()
            .join("");
        if reply.trim().is_empty() {
            return Err(DomainError::provider("anthropic", "empty completion"));
        }

        parse_sentiment_reply(&reply, ProviderKind::Anthropic.analyzer_tag())
    }
}
