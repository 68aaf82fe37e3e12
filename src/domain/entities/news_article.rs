use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized article as delivered by the news connectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub source: Option<String>,
}

impl NewsArticle {
    pub fn new(title: impl Into<String>, published_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            summary: None,
            symbols: Vec::new(),
            categories: Vec::new(),
            published_at,
            source: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_symbols<S: Into<String>>(mut self, symbols: impl IntoIterator<Item = S>) -> Self {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<S: Into<String>>(
        mut self,
        categories: impl IntoIterator<Item = S>,
    ) -> Self {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Text fed to the analyzers: the title, plus the summary when present.
    pub fn analysis_text(&self) -> String {
        match self.summary.as_deref().map(str::trim) {
            Some(summary) if !summary.is_empty() => format!("{}. {}", self.title.trim(), summary),
            _ => self.title.trim().to_string(),
        }
    }
}
