//! Chat-completion layer for chartbot
//!
//! Provider-agnostic request/response types, the [`LLMProvider`] trait and an
//! OpenAI-compatible provider used to summarize market news and analyze
//! chart images.

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{ContentBlock, ImageSource, Message, MessageContent, Role};
pub use provider::LLMProvider;
pub use providers::{OpenAIConfig, OpenAIProvider};
