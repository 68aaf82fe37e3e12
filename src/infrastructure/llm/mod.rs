pub mod anthropic;
pub mod groq;
pub mod openai;
pub mod openai_compat;
pub mod prompt;
pub mod registry;
pub mod response;
