//! Chart bot message router
//!
//! [`ChartBot::handle`] is transport independent: Telegram and the terminal
//! REPL both feed it raw message text together with the kind of chat it came
//! from, and send back whatever reply it produces.
//!
//! ```rust,ignore
//! use chartbot::bot::{ChartBot, ChatKind};
//! use chartbot::BotConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bot = ChartBot::from_config(&BotConfig::from_env()?)?;
//!     if let Some(reply) = bot.handle("price vs tvl solana 1w 1d", ChatKind::Direct).await {
//!         println!("{}", reply.text);
//!     }
//!     Ok(())
//! }
//! ```

pub mod commands;

use std::sync::Arc;

use chartbot_core::command::format_hint;
use chartbot_core::{AssetLookup, AssetMappings, BuiltChart, ChartBuilder, ChartError, ParsedCommand};
use chartbot_llm::{LLMProvider, OpenAIProvider};
use tracing::{debug, info, warn};

use crate::config::BotConfig;
use crate::error::Result;
use crate::news::{FALLBACK_SUMMARY, FinnhubClient, NewsAnalyzer};
use crate::platforms::telegram::{MAX_CAPTION_CHARS, truncate_utf16};
use crate::snapshot::{ChartAnalyzer, ChartRenderer, ScreenshotClient};

pub use commands::Command;

/// Where a message was posted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    /// One-to-one chat with the bot
    Direct,
    /// Group chat; commands need the group prefix
    Group,
}

impl ChatKind {
    /// Whether this is a group chat
    pub fn is_group(self) -> bool {
        self == Self::Group
    }
}

/// Reply to send back to the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotReply {
    /// Message text, or the caption when `photo` is set
    pub text: String,
    /// Whether `text` uses Telegram Markdown
    pub markdown: bool,
    /// PNG chart image
    pub photo: Option<Vec<u8>>,
}

impl BotReply {
    /// Plain-text reply
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markdown: false,
            photo: None,
        }
    }

    /// Markdown reply
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markdown: true,
            photo: None,
        }
    }

    /// Image with a Markdown caption
    pub fn photo(png: Vec<u8>, caption: impl Into<String>) -> Self {
        Self {
            text: caption.into(),
            markdown: true,
            photo: Some(png),
        }
    }
}

/// Photo caption: bold title, then the summary cut to fit Telegram's caption limit
pub fn summary_caption(title: &str, summary: &str) -> String {
    let mut caption = format!("*{title}*\n\n*Summary:* ");
    let used = caption.encode_utf16().count();
    caption.push_str(truncate_utf16(summary, MAX_CAPTION_CHARS.saturating_sub(used)));
    truncate_utf16(&caption, MAX_CAPTION_CHARS).to_string()
}

/// Routes chat messages to charts, news and help texts
pub struct ChartBot {
    lookup: Arc<dyn AssetLookup>,
    builder: ChartBuilder,
    news: Option<NewsAnalyzer>,
    renderer: Option<Arc<dyn ChartRenderer>>,
    chart_analyzer: Option<ChartAnalyzer>,
    group_prefix: String,
}

impl ChartBot {
    /// Bot resolving tickers through `lookup`, without news support
    pub fn new(lookup: Arc<dyn AssetLookup>, builder: ChartBuilder) -> Self {
        Self {
            lookup,
            builder,
            news: None,
            renderer: None,
            chart_analyzer: None,
            group_prefix: chartbot_core::command::GROUP_PREFIX.to_string(),
        }
    }

    /// Enable the `news` command
    pub fn with_news(mut self, analyzer: NewsAnalyzer) -> Self {
        self.news = Some(analyzer);
        self
    }

    /// Send charts as screenshots from `renderer` instead of links
    pub fn with_renderer(mut self, renderer: Arc<dyn ChartRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Caption chart screenshots with a summary from `analyzer`
    pub fn with_chart_analyzer(mut self, analyzer: ChartAnalyzer) -> Self {
        self.chart_analyzer = Some(analyzer);
        self
    }

    /// Use another group-chat prefix
    pub fn with_group_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.group_prefix = prefix.into();
        self
    }

    /// Build the bot from configuration: loads the mapping file, wires the
    /// screenshot service when one is set and the news and chart summaries
    /// when an LLM key is configured.
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        let mappings = AssetMappings::load(&config.mappings_file)?;
        let builder = ChartBuilder::with_base_url(&config.chart_base_url)?;
        let mut bot = Self::new(Arc::new(mappings), builder).with_group_prefix(&config.group_prefix);

        if let Some(endpoint) = &config.screenshot_url {
            let renderer = ScreenshotClient::new(endpoint.clone(), config.request_timeout)?;
            bot = bot.with_renderer(Arc::new(renderer));
        }

        match config.openai_config() {
            Some(openai) => {
                let provider: Arc<dyn LLMProvider> = Arc::new(OpenAIProvider::with_config(openai)?);
                if bot.renderer.is_some() {
                    let charts = ChartAnalyzer::new(Arc::clone(&provider)).with_model(config.vision_model.clone());
                    bot = bot.with_chart_analyzer(charts);
                }
                let mut analyzer = NewsAnalyzer::new(provider, config.model.clone());
                if let Some(key) = &config.finnhub_api_key {
                    let feed = FinnhubClient::new(key.clone(), config.request_timeout)?;
                    analyzer = analyzer.with_feed(Arc::new(feed));
                }
                bot = bot.with_news(analyzer);
            }
            None => warn!("OPENAI_API_KEY not set, news and chart summaries disabled"),
        }

        Ok(bot)
    }

    /// Prefix group-chat commands must start with
    pub fn group_prefix(&self) -> &str {
        &self.group_prefix
    }

    /// Handle one message; `None` means the bot stays silent
    pub async fn handle(&self, text: &str, kind: ChatKind) -> Option<BotReply> {
        let Some(command) = Command::classify(text, kind, &self.group_prefix) else {
            debug!(?kind, "Ignoring message");
            return None;
        };

        info!(?kind, ?command, "Handling command");
        let reply = match command {
            Command::Start => BotReply::plain(commands::start_text(&self.group_prefix)),
            Command::Help => BotReply::plain(commands::help_text(&self.group_prefix)),
            Command::News { asset } => self.news_reply(asset.as_deref()).await,
            Command::Chart { text } => self.chart_reply(&text, kind.is_group()).await,
        };
        Some(reply)
    }

    /// Parse and build a chart request
    pub fn render_chart(&self, text: &str, is_group: bool) -> Result<BuiltChart> {
        let command = ParsedCommand::parse(text, is_group)?;
        Ok(self.builder.build(&command, self.lookup.as_ref())?)
    }

    async fn chart_reply(&self, text: &str, is_group: bool) -> BotReply {
        let command = ParsedCommand::parse(text, is_group);
        match command.and_then(|command| self.builder.build(&command, self.lookup.as_ref())) {
            Ok(chart) => {
                info!(title = %chart.title, series = chart.config.series.len(), "Chart built");
                match self.snapshot_reply(&chart).await {
                    Some(reply) => reply,
                    None => BotReply::markdown(format!("*{}*\n\n{}", chart.title, chart.url)),
                }
            }
            Err(ChartError::InvalidCommand(message)) => BotReply::plain(message),
            Err(e) => {
                if e.is_validation() {
                    debug!("Rejected chart request: {e}");
                } else {
                    warn!("Chart request failed: {e}");
                }
                BotReply::plain(format!("Error: {e}\n\n{}", format_hint(is_group)))
            }
        }
    }

    /// Screenshot reply; `None` without a renderer or when the capture fails
    async fn snapshot_reply(&self, chart: &BuiltChart) -> Option<BotReply> {
        let renderer = self.renderer.as_ref()?;
        let png = match renderer.render(&chart.url).await {
            Ok(png) => png,
            Err(e) => {
                warn!(url = %chart.url, "Chart screenshot failed, sending link: {e}");
                return None;
            }
        };

        let summary = match &self.chart_analyzer {
            Some(analyzer) => analyzer.analyze(&png).await,
            None => None,
        };
        let caption = match summary {
            Some(summary) => summary_caption(&chart.title, &summary),
            None => truncate_utf16(&format!("*{}*", chart.title), MAX_CAPTION_CHARS).to_string(),
        };
        Some(BotReply::photo(png, caption))
    }

    async fn news_reply(&self, asset: Option<&str>) -> BotReply {
        let summary = match &self.news {
            Some(analyzer) => analyzer.market_news(asset).await,
            None => FALLBACK_SUMMARY.to_string(),
        };
        BotReply::markdown(format!("*Market News Summary*\n\n{summary}"))
    }
}
