//! Artemis chart bot
//!
//! # Usage
//!
//! ```bash
//! # Settings are read from the environment or a .env file
//! export TELEGRAM_BOT_TOKEN="123:abc"
//! export OPENAI_API_KEY="sk-..."
//!
//! chartbot telegram
//! chartbot repl --group
//! chartbot chart price vs tvl solana 1w 1d
//! chartbot update-mappings
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chartbot::api::ArtemisClient;
use chartbot::platforms::{TelegramBot, TelegramConfig, run_repl};
use chartbot::{BotConfig, ChartBot, ChatKind};
use chartbot_utils::{EnvSource, LogFormat, ProcessEnv, init_tracing_with};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "chartbot")]
#[command(about = "Turn chat commands into Artemis charts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the Telegram bot (long polling)
    Telegram,
    /// Chat with the bot in the terminal
    Repl {
        /// Behave as in a group chat (commands need the group prefix)
        #[arg(long)]
        group: bool,
    },
    /// Build one chart and print its link
    Chart {
        /// Command words, e.g. `price vs tvl solana 1w 1d`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
        /// Print the chart configuration as JSON instead of the link
        #[arg(long)]
        json: bool,
        /// Show group-chat format hints in errors
        #[arg(long)]
        group: bool,
    },
    /// Refresh the asset mapping file from the Artemis API
    UpdateMappings {
        /// Output file (defaults to ASSET_MAPPINGS_FILE)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let log_format = ProcessEnv
        .var("LOG_FORMAT")
        .map(|value| value.parse::<LogFormat>())
        .transpose()
        .map_err(anyhow::Error::msg)?
        .unwrap_or_default();
    init_tracing_with("info", log_format);

    let cli = Cli::parse();
    let config = BotConfig::from_env().context("invalid configuration")?;

    match cli.command {
        Commands::Telegram => {
            let telegram = TelegramConfig::new(config.require_telegram_token()?);
            let bot = Arc::new(ChartBot::from_config(&config)?);
            TelegramBot::new(telegram, bot)?.run().await?;
        }
        Commands::Repl { group } => {
            let kind = if group { ChatKind::Group } else { ChatKind::Direct };
            let bot = ChartBot::from_config(&config)?;
            let stdin = BufReader::new(tokio::io::stdin());
            run_repl(&bot, kind, stdin, tokio::io::stdout()).await?;
        }
        Commands::Chart { words, json, group } => {
            let bot = ChartBot::from_config(&config)?;
            let text = words.join(" ");
            let text = text
                .strip_prefix(bot.group_prefix())
                .map_or(text.as_str(), str::trim);

            let chart = bot.render_chart(text, group)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&chart.config)?);
            } else {
                println!("{}\n{}", chart.title, chart.url);
            }
        }
        Commands::UpdateMappings { output } => {
            let path = output.unwrap_or_else(|| config.mappings_file.clone());
            let client = ArtemisClient::from_config(&config)?;
            let mappings = client
                .sync_mappings(&path)
                .await
                .with_context(|| format!("failed to update {}", path.display()))?;
            info!(assets = mappings.len(), path = %path.display(), "Mappings updated");
            println!("Wrote {} assets to {}", mappings.len(), path.display());
        }
    }

    Ok(())
}
