//! Artemis chart bot
//!
//! Chat front ends for [`chartbot_core`]: chart commands sent over Telegram
//! (or typed into the terminal REPL) come back as Artemis chart-builder links,
//! or as a screenshot captioned with a vision-model summary when a screenshot
//! service is configured, and `news [asset]` returns an LLM-written market summary.
//!
//! - [`bot`]: transport-independent message routing
//! - [`platforms`]: Telegram long polling and the terminal REPL
//! - [`news`]: Finnhub headlines and summaries
//! - [`snapshot`]: chart screenshots and their summaries
//! - [`api`]: Artemis asset listing, used to refresh the mapping file
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chartbot::platforms::{TelegramBot, TelegramConfig};
//! use chartbot::{BotConfig, ChartBot};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BotConfig::from_env()?;
//!     let bot = Arc::new(ChartBot::from_config(&config)?);
//!     let telegram = TelegramConfig::new(config.require_telegram_token()?);
//!     TelegramBot::new(telegram, bot)?.run().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod bot;
pub mod config;
pub mod error;
pub mod news;
pub mod platforms;
pub mod snapshot;

pub use bot::{BotReply, ChartBot, ChatKind};
pub use config::BotConfig;
pub use error::{BotError, Result};
