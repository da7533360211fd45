//! LLM provider trait definition

use async_trait::async_trait;

use crate::{CompletionRequest, CompletionResponse, Result};

/// Access to a chat-completion service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion for `request`
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Provider name (e.g. "openai")
    fn name(&self) -> &'static str;
}
