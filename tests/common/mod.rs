//! Shared test helpers: scripted providers, scorers and model loaders.

#![allow(dead_code)]

use finsent::domain::entities::sentiment_result::SentimentResult;
use finsent::domain::error::DomainError;
use finsent::domain::ports::llm_provider::LlmProvider;
use finsent::domain::ports::sentiment_analyzer::SentimentScorer;
use finsent::domain::ports::sentiment_model::{ModelLoader, SentimentModel};
use finsent::domain::values::class_probabilities::ClassProbabilities;
use finsent::domain::values::provider_kind::ProviderKind;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
pub enum Behavior {
    Succeed { score: f64, confidence: f64 },
    Fail(String),
    Hang,
}

/// Provider whose outcome is scripted. Counts every `analyze` call.
pub struct FakeProvider {
    kind: ProviderKind,
    configured: bool,
    behavior: Behavior,
    calls: AtomicUsize,
}

impl FakeProvider {
    pub fn succeeding(kind: ProviderKind, score: f64, confidence: f64) -> Arc<Self> {
        Arc::new(Self::build(kind, true, Behavior::Succeed { score, confidence }))
    }

    pub fn failing(kind: ProviderKind, msg: &str) -> Arc<Self> {
        Arc::new(Self::build(kind, true, Behavior::Fail(msg.to_string())))
    }

    pub fn hanging(kind: ProviderKind) -> Arc<Self> {
        Arc::new(Self::build(kind, true, Behavior::Hang))
    }

    pub fn unconfigured(kind: ProviderKind) -> Arc<Self> {
        Arc::new(Self::build(
            kind,
            false,
            Behavior::Succeed { score: 0.9, confidence: 0.9 },
        ))
    }

    fn build(kind: ProviderKind, configured: bool, behavior: Behavior) -> Self {
        Self {
            kind,
            configured,
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LlmProvider for FakeProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn analyze(&self, _text: &str, _context: Option<&str>) -> Result<SentimentResult, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.configured {
            return Err(DomainError::not_configured(self.kind.name()));
        }
        match &self.behavior {
            Behavior::Succeed { score, confidence } => {
                Ok(SentimentResult::new(*score, *confidence, self.kind.analyzer_tag())
                    .with_reasoning(format!("{} says so", self.kind)))
            }
            Behavior::Fail(msg) => Err(DomainError::provider(self.kind.name(), msg.clone())),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                unreachable!("hanging provider should time out first")
            }
        }
    }
}

/// Provider that echoes the input text back as its score, after a delay
/// that makes earlier texts finish later.
pub struct EchoProvider {
    pub scores: HashMap<String, f64>,
}

#[async_trait::async_trait]
impl LlmProvider for EchoProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Groq
    }

    fn model(&self) -> &str {
        "echo"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn analyze(&self, text: &str, _context: Option<&str>) -> Result<SentimentResult, DomainError> {
        let score = self.scores.get(text).copied().unwrap_or(0.0);
        // Higher scores return sooner.
        let wait = ((1.0 - score) * 50.0) as u64;
        tokio::time::sleep(Duration::from_millis(wait)).await;
        Ok(SentimentResult::new(score, 0.9, "llm-groq").with_reasoning(text.to_string()))
    }
}

/// First-pass scorer with a fixed (score, confidence) per text.
pub struct FakeScorer {
    readings: HashMap<String, (f64, f64)>,
    default: (f64, f64),
    pub fail: bool,
}

impl FakeScorer {
    pub fn uniform(score: f64, confidence: f64) -> Arc<Self> {
        Arc::new(Self {
            readings: HashMap::new(),
            default: (score, confidence),
            fail: false,
        })
    }

    pub fn with_readings(readings: &[(&str, f64, f64)]) -> Arc<Self> {
        Arc::new(Self {
            readings: readings
                .iter()
                .map(|(t, s, c)| (t.to_string(), (*s, *c)))
                .collect(),
            default: (0.0, 0.9),
            fail: false,
        })
    }

    pub fn broken() -> Arc<Self> {
        Arc::new(Self {
            readings: HashMap::new(),
            default: (0.0, 0.0),
            fail: true,
        })
    }
}

#[async_trait::async_trait]
impl SentimentScorer for FakeScorer {
    async fn score_batch(&self, texts: &[String]) -> Result<Vec<SentimentResult>, DomainError> {
        if self.fail {
            return Err(DomainError::Model("model weights missing".into()));
        }
        Ok(texts
            .iter()
            .map(|t| {
                let (s, c) = self.readings.get(t).copied().unwrap_or(self.default);
                SentimentResult::new(s, c, "finbert")
            })
            .collect())
    }
}

/// Classifier that returns fixed probabilities and records batch sizes.
pub struct FixedModel {
    pub probs: ClassProbabilities,
    pub batches: Mutex<Vec<usize>>,
}

impl SentimentModel for FixedModel {
    fn predict(&self, texts: &[String]) -> Result<Vec<ClassProbabilities>, DomainError> {
        self.batches.lock().unwrap().push(texts.len());
        Ok(texts.iter().map(|_| self.probs).collect())
    }
}

/// Loader that counts loads, optionally failing the first `fail_first` ones.
pub struct CountingLoader {
    pub model: Arc<FixedModel>,
    pub loads: AtomicUsize,
    pub fail_first: usize,
    pub load_delay: Duration,
}

impl CountingLoader {
    pub fn new(probs: ClassProbabilities) -> Self {
        Self {
            model: Arc::new(FixedModel {
                probs,
                batches: Mutex::new(Vec::new()),
            }),
            loads: AtomicUsize::new(0),
            fail_first: 0,
            load_delay: Duration::from_millis(0),
        }
    }

    pub fn failing_first(mut self, n: usize) -> Self {
        self.fail_first = n;
        self
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.model.batches.lock().unwrap().clone()
    }
}

impl ModelLoader for CountingLoader {
    fn load(&self) -> Result<Arc<dyn SentimentModel>, DomainError> {
        let n = self.loads.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.load_delay);
        if n < self.fail_first {
            return Err(DomainError::Model("weights not downloaded".into()));
        }
        Ok(self.model.clone())
    }
}

/// Erase a concrete provider handle so it can join a chain while the test
/// keeps the typed handle for call counts.
pub fn erased<P: LlmProvider + 'static>(provider: &Arc<P>) -> Arc<dyn LlmProvider> {
    provider.clone()
}
