mod common;

use common::{erased, EchoProvider, FakeProvider, FakeScorer};
use finsent::application::fallback::FallbackOrchestrator;
use finsent::application::hybrid::HybridCombiner;
use finsent::domain::error::DomainError;
use finsent::domain::values::provider_kind::ProviderKind;
use finsent::domain::values::sentiment_label::SentimentLabel;
use std::collections::HashMap;
use std::sync::Arc;

fn chain(providers: &[Arc<FakeProvider>]) -> Arc<FallbackOrchestrator> {
    Arc::new(FallbackOrchestrator::new(providers.iter().map(erased).collect()))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_confident_finbert_result_is_returned_as_is() {
    let groq = FakeProvider::succeeding(ProviderKind::Groq, 0.9, 0.9);
    let hybrid = HybridCombiner::new(FakeScorer::uniform(0.3, 0.85), chain(&[groq.clone()]));

    let result = hybrid.analyze("Shares edge higher", None, None).await.unwrap();

    assert_eq!(result.analyzer(), "finbert");
    assert!((result.score() - 0.3).abs() < 1e-9);
    assert_eq!(groq.calls(), 0);
}

#[tokio::test]
async fn test_earnings_headline_blends_scores() {
    let groq = FakeProvider::succeeding(ProviderKind::Groq, 0.8, 0.7);
    let hybrid = HybridCombiner::new(FakeScorer::uniform(0.5, 0.4), chain(&[groq.clone()]));
    let categories = strings(&["earnings"]);

    let result = hybrid
        .analyze("Retailer posts record holiday sales", Some(categories.as_slice()), None)
        .await
        .unwrap();

    // 0.3 * 0.5 + 0.7 * 0.8
    assert!((result.score() - 0.71).abs() < 1e-9);
    assert_eq!(result.label(), SentimentLabel::VeryBullish);
    assert_eq!(result.confidence(), 0.7);
    assert_eq!(result.analyzer(), "hybrid");
    assert_eq!(result.reasoning(), Some("groq says so"));
    assert_eq!(groq.calls(), 1);
}

#[tokio::test]
async fn test_category_escalates_confident_text() {
    let groq = FakeProvider::succeeding(ProviderKind::Groq, -0.6, 0.8);
    let hybrid = HybridCombiner::new(FakeScorer::uniform(0.1, 0.95), chain(&[groq.clone()]));
    let categories = strings(&["Earnings"]);

    let result = hybrid
        .analyze("Quarterly results are out", Some(categories.as_slice()), None)
        .await
        .unwrap();

    assert_eq!(result.analyzer(), "hybrid");
    assert_eq!(result.confidence(), 0.95);
    assert_eq!(groq.calls(), 1);
}

#[tokio::test]
async fn test_importance_flag_escalates() {
    let groq = FakeProvider::succeeding(ProviderKind::Groq, 0.0, 0.5);
    let hybrid = HybridCombiner::new(FakeScorer::uniform(0.2, 0.99), chain(&[groq.clone()]));

    let result = hybrid.analyze("CEO steps down", None, Some(true)).await.unwrap();

    assert_eq!(result.analyzer(), "hybrid");
    assert_eq!(groq.calls(), 1);
}

#[tokio::test]
async fn test_custom_threshold() {
    let groq = FakeProvider::succeeding(ProviderKind::Groq, 0.0, 0.5);
    let hybrid = HybridCombiner::new(FakeScorer::uniform(0.2, 0.7), chain(&[groq.clone()]))
        .with_confidence_threshold(0.8);

    let result = hybrid.analyze("text", None, None).await.unwrap();

    assert_eq!(result.analyzer(), "hybrid");
}

#[tokio::test]
async fn test_falls_back_to_finbert_when_every_provider_fails() {
    let groq = FakeProvider::failing(ProviderKind::Groq, "HTTP 503");
    let openai = FakeProvider::unconfigured(ProviderKind::OpenAi);
    let hybrid = HybridCombiner::new(FakeScorer::uniform(-0.35, 0.3), chain(&[groq.clone(), openai]));

    let result = hybrid.analyze("Guidance cut", None, None).await.unwrap();

    assert_eq!(result.analyzer(), "finbert");
    assert!((result.score() + 0.35).abs() < 1e-9);
    assert_eq!(result.label(), SentimentLabel::Bearish);
    assert_eq!(groq.calls(), 1);
}

#[tokio::test]
async fn test_without_finbert_returns_llm_result() {
    let anthropic = FakeProvider::succeeding(ProviderKind::Anthropic, -0.7, 0.6);
    let hybrid = HybridCombiner::without_finbert(chain(&[anthropic]));
    assert!(!hybrid.uses_finbert());

    let result = hybrid.analyze("Bank fined by regulator", None, None).await.unwrap();

    assert_eq!(result.analyzer(), "llm-anthropic");
    assert_eq!(result.label(), SentimentLabel::VeryBearish);
}

#[tokio::test]
async fn test_without_finbert_and_no_providers_is_llm_failed() {
    let hybrid = HybridCombiner::without_finbert(chain(&[]));

    let result = hybrid.analyze("text", None, None).await.unwrap();

    assert!(result.is_llm_failure());
    assert_eq!(result.score(), 0.0);
}

#[tokio::test]
async fn test_finbert_error_propagates() {
    let groq = FakeProvider::succeeding(ProviderKind::Groq, 0.5, 0.5);
    let hybrid = HybridCombiner::new(FakeScorer::broken(), chain(&[groq.clone()]));

    let err = hybrid.analyze("text", None, None).await.unwrap_err();

    assert!(matches!(err, DomainError::Model(_)));
    assert_eq!(groq.calls(), 0);
}

#[tokio::test]
async fn test_batch_escalates_only_flagged_items() {
    let scorer = FakeScorer::with_readings(&[
        ("steady", 0.1, 0.9),
        ("unsure", 0.4, 0.3),
        ("merger", 0.2, 0.95),
        ("flagged", -0.1, 0.9),
    ]);
    let groq = FakeProvider::succeeding(ProviderKind::Groq, 1.0, 0.8);
    let hybrid = HybridCombiner::new(scorer, chain(&[groq.clone()]));

    let texts = strings(&["steady", "unsure", "merger", "flagged"]);
    let categories = vec![vec![], vec![], strings(&["m&a"]), vec![]];
    let flags = [false, false, false, true];

    let results = hybrid
        .analyze_batch(&texts, Some(categories.as_slice()), Some(flags.as_slice()))
        .await
        .unwrap();

    let analyzers: Vec<&str> = results.iter().map(|r| r.analyzer()).collect();
    assert_eq!(analyzers, vec!["finbert", "hybrid", "hybrid", "hybrid"]);
    assert_eq!(groq.calls(), 3);
    // 0.3 * 0.4 + 0.7 * 1.0
    assert!((results[1].score() - 0.82).abs() < 1e-9);
    assert!((results[0].score() - 0.1).abs() < 1e-9);
}

#[tokio::test]
async fn test_batch_with_short_option_lists_uses_defaults() {
    let scorer = FakeScorer::with_readings(&[("a", 0.0, 0.9), ("b", 0.0, 0.9)]);
    let groq = FakeProvider::succeeding(ProviderKind::Groq, 0.5, 0.5);
    let hybrid = HybridCombiner::new(scorer, chain(&[groq.clone()]));

    let texts = strings(&["a", "b"]);
    let flags = [true];

    let results = hybrid
        .analyze_batch(&texts, None, Some(flags.as_slice()))
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].analyzer(), "hybrid");
    assert_eq!(results[1].analyzer(), "finbert");
}

#[tokio::test]
async fn test_batch_keeps_finbert_results_when_llm_fails() {
    let groq = FakeProvider::failing(ProviderKind::Groq, "rate limited");
    let hybrid = HybridCombiner::new(FakeScorer::uniform(0.25, 0.2), chain(&[groq]));

    let texts = strings(&["x", "y", "z"]);
    let results = hybrid.analyze_batch(&texts, None, None).await.unwrap();

    assert!(results.iter().all(|r| r.analyzer() == "finbert"));
}

#[tokio::test]
async fn test_empty_batch_touches_nothing() {
    let groq = FakeProvider::succeeding(ProviderKind::Groq, 0.5, 0.5);
    let hybrid = HybridCombiner::new(FakeScorer::broken(), chain(&[groq.clone()]));

    let results = hybrid.analyze_batch(&[], None, None).await.unwrap();

    assert!(results.is_empty());
    assert_eq!(groq.calls(), 0);
}

#[tokio::test]
async fn test_batch_without_finbert() {
    let groq = FakeProvider::succeeding(ProviderKind::Groq, -0.1, 0.6);
    let hybrid = HybridCombiner::without_finbert(chain(&[groq.clone()]));

    let texts = strings(&["a", "b"]);
    let results = hybrid.analyze_batch(&texts, None, None).await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.analyzer() == "llm-groq"));
    assert_eq!(groq.calls(), 2);
}

#[tokio::test]
async fn test_batch_blends_each_llm_result_into_its_own_slot() {
    let scorer = FakeScorer::with_readings(&[
        ("slow", 0.0, 0.1),
        ("kept", 0.0, 0.9),
        ("fast", 0.0, 0.1),
        ("mid", 0.0, 0.1),
    ]);
    // Lower LLM scores answer later, so completion order is fast, mid, slow.
    let scores: HashMap<String, f64> = [("slow", -0.8), ("fast", 0.9), ("mid", 0.2)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    let llm = Arc::new(FallbackOrchestrator::new(vec![erased(&Arc::new(EchoProvider { scores }))]));
    let hybrid = HybridCombiner::new(scorer, llm);

    let texts = strings(&["slow", "kept", "fast", "mid"]);
    let results = hybrid.analyze_batch(&texts, None, None).await.unwrap();

    assert_eq!(results[0].reasoning(), Some("slow"));
    assert!((results[0].score() + 0.56).abs() < 1e-9);
    assert_eq!(results[1].analyzer(), "finbert");
    assert_eq!(results[1].reasoning(), None);
    assert_eq!(results[2].reasoning(), Some("fast"));
    assert!((results[2].score() - 0.63).abs() < 1e-9);
    assert_eq!(results[3].reasoning(), Some("mid"));
    assert!((results[3].score() - 0.14).abs() < 1e-9);
}
