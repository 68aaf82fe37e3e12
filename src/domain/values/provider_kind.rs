use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// LLM backends the fallback chain knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Groq,
    Anthropic,
    OpenAi,
}

impl ProviderKind {
    /// Cheapest/fastest first; OpenAI last because of past quota exhaustion.
    pub const DEFAULT_ORDER: [ProviderKind; 3] =
        [ProviderKind::Groq, ProviderKind::Anthropic, ProviderKind::OpenAi];

    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
        }
    }

    /// Key used against the secret store; env fallback is `<KEY>_API_KEY`.
    pub fn credential_key(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "GROQ",
            ProviderKind::Anthropic => "ANTHROPIC",
            ProviderKind::OpenAi => "OPENAI",
        }
    }

    /// Tag written into `SentimentResult::analyzer`.
    pub fn analyzer_tag(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "llm-groq",
            ProviderKind::Anthropic => "llm-anthropic",
            ProviderKind::OpenAi => "llm-openai",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "llama-3.3-70b-versatile",
            ProviderKind::Anthropic => "claude-3-5-haiku-latest",
            ProviderKind::OpenAi => "gpt-4o-mini",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "https://api.groq.com/openai/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "openai" => Ok(ProviderKind::OpenAi),
            _ => Err(format!("Unknown LLM provider: {s}")),
        }
    }
}
