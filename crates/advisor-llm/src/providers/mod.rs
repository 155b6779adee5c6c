//! Concrete LLM provider implementations

pub mod openai_compat;

pub use openai_compat::{OpenAiCompatConfig, OpenAiCompatProvider};
