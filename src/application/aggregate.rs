//! Per-symbol roll-up of article sentiment for the recommendation views.

use crate::domain::entities::news_article::NewsArticle;
use crate::domain::entities::sentiment_result::SentimentResult;
use crate::domain::values::sentiment_label::SentimentLabel;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct SymbolSentiment {
    pub symbol: String,
    pub article_count: usize,
    /// Plain mean of article scores.
    pub average_score: f64,
    /// Confidence-weighted mean; equals `average_score` when every article
    /// has zero confidence.
    pub weighted_score: f64,
    /// Derived from `weighted_score`.
    pub label: SentimentLabel,
    pub bullish_count: usize,
    pub bearish_count: usize,
    pub neutral_count: usize,
    pub latest_published_at: DateTime<Utc>,
}

#[derive(Default)]
struct Acc {
    count: usize,
    score_sum: f64,
    weighted_sum: f64,
    weight_sum: f64,
    bullish: usize,
    bearish: usize,
    neutral: usize,
    latest: Option<DateTime<Utc>>,
}

/// Pair articles with their results by position and group by symbol.
/// Articles without symbols are ignored; extra items on either side are
/// dropped. Output is sorted by symbol.
pub fn aggregate_by_symbol(articles: &[NewsArticle], results: &[SentimentResult]) -> Vec<SymbolSentiment> {
    let mut groups: BTreeMap<String, Acc> = BTreeMap::new();

    for (article, result) in articles.iter().zip(results) {
        let mut seen: Vec<String> = Vec::new();
        for symbol in &article.symbols {
            let symbol = symbol.trim().to_uppercase();
            if symbol.is_empty() || seen.contains(&symbol) {
                continue;
            }
            seen.push(symbol.clone());

            let acc = groups.entry(symbol).or_default();
            acc.count += 1;
            acc.score_sum += result.score();
            acc.weighted_sum += result.score() * result.confidence();
            acc.weight_sum += result.confidence();
            let label = result.label();
            if label.is_bullish() {
                acc.bullish += 1;
            } else if label.is_bearish() {
                acc.bearish += 1;
            } else {
                acc.neutral += 1;
            }
            acc.latest = Some(match acc.latest {
                Some(t) if t >= article.published_at => t,
                _ => article.published_at,
            });
        }
    }

    groups
        .into_iter()
        .filter_map(|(symbol, acc)| {
            let latest = acc.latest?;
            let average = acc.score_sum / acc.count as f64;
            let weighted = if acc.weight_sum > 0.0 {
                acc.weighted_sum / acc.weight_sum
            } else {
                average
            };
            Some(SymbolSentiment {
                symbol,
                article_count: acc.count,
                average_score: average,
                weighted_score: weighted,
                label: SentimentLabel::from_score(weighted),
                bullish_count: acc.bullish,
                bearish_count: acc.bearish,
                neutral_count: acc.neutral,
                latest_published_at: latest,
            })
        })
        .collect()
}
