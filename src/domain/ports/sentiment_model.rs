use crate::domain::error::DomainError;
use crate::domain::values::class_probabilities::ClassProbabilities;
use std::sync::Arc;

/// A loaded three-class classifier. `predict` is a blocking forward pass and
/// is only ever called from the blocking thread pool.
pub trait SentimentModel: Send + Sync {
    fn predict(&self, texts: &[String]) -> Result<Vec<ClassProbabilities>, DomainError>;
}

/// Produces the classifier on first use. `load` may block.
pub trait ModelLoader: Send + Sync {
    fn load(&self) -> Result<Arc<dyn SentimentModel>, DomainError>;
}
