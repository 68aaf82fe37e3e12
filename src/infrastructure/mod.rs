pub mod finbert;
pub mod llm;
pub mod secrets;
