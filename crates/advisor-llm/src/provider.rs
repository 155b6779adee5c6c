//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for LLM providers
///
/// Implementations of this trait provide access to different LLM
/// services. The narrative pipeline holds a `dyn LlmProvider`, so tests
/// can substitute a scripted double without touching the network.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion from the LLM
    ///
    /// One blocking request, one response. Retries and timeouts are the
    /// caller's concern.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "openai-compat")
    fn name(&self) -> &str;
}
