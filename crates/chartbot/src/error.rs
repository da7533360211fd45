//! Error types for the bot shell

use chartbot_core::ChartError;
use chartbot_llm::LLMError;
use thiserror::Error;

/// Bot errors
#[derive(Debug, Error)]
pub enum BotError {
    /// Command parsing, chart building or mapping file failure
    #[error(transparent)]
    Chart(#[from] ChartError),

    /// Chat-completion failure
    #[error("LLM error: {0}")]
    Llm(#[from] LLMError),

    /// Upstream API answered with an error
    #[error("API error: {0}")]
    ApiError(String),

    /// Telegram Bot API rejected a call
    #[error("Telegram error: {0}")]
    Telegram(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;
