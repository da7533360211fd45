//! Message classification and fixed reply texts

use chartbot_core::command::{MIN_TOKENS, format_hint, starts_with_metric};
use chartbot_core::{Granularity, Metric, TimePeriod};

use super::ChatKind;

/// What an incoming chat message asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start`
    Start,
    /// `/help`
    Help,
    /// `news [asset]`
    News { asset: Option<String> },
    /// Chart request; `text` has any group prefix removed
    Chart { text: String },
}

impl Command {
    /// Classify a message, or `None` when the bot should stay silent.
    ///
    /// Direct chats only treat text as a chart request when it has at least
    /// four words and opens with a metric, so casual conversation is ignored.
    /// Group chats require `group_prefix`; the parser then reports malformed
    /// requests instead of ignoring them.
    pub fn classify(text: &str, kind: ChatKind, group_prefix: &str) -> Option<Self> {
        let text = text.trim();

        if let Some(command) = text.strip_prefix('/') {
            return Self::slash_command(command);
        }

        let body = match kind {
            ChatKind::Direct => text,
            ChatKind::Group => text.strip_prefix(group_prefix)?.trim(),
        };

        let words: Vec<&str> = body.split_whitespace().collect();
        let first = words.first()?;

        if first.eq_ignore_ascii_case("news") {
            return Some(Self::News {
                asset: words.get(1).map(|asset| asset.to_lowercase()),
            });
        }

        if !starts_with_metric(body) {
            return None;
        }
        if kind == ChatKind::Direct && words.len() < MIN_TOKENS {
            return None;
        }

        Some(Self::Chart {
            text: body.to_string(),
        })
    }

    fn slash_command(command: &str) -> Option<Self> {
        // Telegram appends the bot name in groups: `/help@artemis_bot`
        let name = command.split_whitespace().next()?;
        let name = name.split('@').next().unwrap_or(name);

        match name.to_lowercase().as_str() {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Reply to `/start`
pub fn start_text(group_prefix: &str) -> String {
    format!(
        "🔍 Welcome to Artemis Analytics Chart Bot! 📊\n\n\
         I can generate charts from Artemis Analytics for you.\n\n\
         The command format is:\n\
         <metric> [vs <metric>] <asset> <time_period> [granularity] [%]\n\n\
         Example: fees ethereum 1w 1d\n\
         In group chats, start with '{group_prefix}', like: {group_prefix} fees ethereum 1w 1d\n\
         For more details, use /help"
    )
}

/// Reply to `/help`
pub fn help_text(group_prefix: &str) -> String {
    let hint = format_hint(false);
    let format_line = hint.lines().next().unwrap_or_default();

    format!(
        "📊 Artemis Analytics Chart Bot\n\n\
         {format_line}\n\n\
         Examples:\n\
         • price solana 1w 1d\n\
         • fees ethereum 3m 1d\n\
         • price vs tvl solana 1y 1d\n\
         • fees vs revenue ethereum 6m 1w %\n\
         • news eth\n\n\
         Metrics: {metrics}\n\
         Time Periods: {periods}\n\
         Granularity: {granularities}\n\n\
         In group chats, start with '{group_prefix} '",
        metrics = Metric::codes(),
        periods = TimePeriod::codes(),
        granularities = Granularity::codes(),
    )
}

/// Greeting posted when the bot is added to a group
pub fn group_welcome_text(chat_name: Option<&str>, group_prefix: &str) -> String {
    let chat_name = chat_name.unwrap_or("this group");
    format!(
        "🌟 *Hello {chat_name}!* 🌟\n\n\
         Thanks for adding me to your group! I'm your Artemis Analytics Chart Bot, \
         ready to build crypto market charts right here in the chat.\n\n\
         📈 *What I can do for you:*\n\
         Chart fees, price, volume, TVL, revenue and more for crypto assets, \
         and summarize the latest market news.\n\n\
         👉 *How to use me:*\n\
         Type `{group_prefix}` followed by your request, like:\n\n\
         ```\n\
         {group_prefix} fees ethereum 1m 1d\n\
         {group_prefix} price vs tvl solana 3m\n\
         {group_prefix} tvl uniswap application 1y 1w\n\
         {group_prefix} news btc\n\
         ```\n\n\
         📖 For more details, any member can message me directly with /help"
    )
}
