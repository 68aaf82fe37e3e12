pub mod llm_provider;
pub mod secret_store;
pub mod sentiment_analyzer;
pub mod sentiment_model;
