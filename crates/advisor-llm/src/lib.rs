//! LLM client layer for stock-advisor
//!
//! This crate provides provider-agnostic abstractions for the single
//! chat-style LLM invocations the narrative pipeline needs:
//!
//! - Message types for LLM communication
//! - Completion request/response types
//! - The [`LlmProvider`] trait the pipeline depends on
//! - An HTTP provider for OpenAI-compatible chat-completions endpoints
//!   (NVIDIA's hosted API speaks this wire format)
//!
//! The provider is constructed explicitly and injected where it is
//! needed; there is no process-wide shared client.

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, TokenUsage};
pub use error::{LlmError, Result};
pub use messages::{Message, Role};
pub use provider::LlmProvider;
pub use providers::{OpenAiCompatConfig, OpenAiCompatProvider};
