pub mod class_probabilities;
pub mod confidence;
pub mod provider_kind;
pub mod score;
pub mod sentiment_label;
