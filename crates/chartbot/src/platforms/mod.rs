//! Chat front ends

pub mod cli;
pub mod telegram;

pub use cli::run_repl;
pub use telegram::{TelegramBot, TelegramClient, TelegramConfig};
