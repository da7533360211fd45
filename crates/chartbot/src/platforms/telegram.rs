//! Telegram Bot API transport
//!
//! Long-polls `getUpdates` and answers each message through [`ChartBot`].
//! Every update is handled on its own task so a slow news summary never
//! holds up chart replies.

use std::sync::Arc;
use std::time::Duration;

use chartbot_utils::{EnvSource, ProcessEnv};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::bot::{BotReply, ChartBot, ChatKind, commands};
use crate::error::{BotError, Result};

const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Longest text Telegram accepts in one message, in UTF-16 code units
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Longest photo caption, in UTF-16 code units
pub const MAX_CAPTION_CHARS: usize = 1024;

/// Telegram bot configuration
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot token from BotFather
    pub token: String,
    pub api_base: String,
    /// Long-poll timeout passed to `getUpdates`
    pub poll_timeout_secs: u64,
}

impl TelegramConfig {
    /// Config with the given token and default settings
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
        }
    }

    /// Create config from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_source(&ProcessEnv)
    }

    /// Create config from an arbitrary settings source
    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        let token = env
            .var("TELEGRAM_BOT_TOKEN")
            .ok_or_else(|| BotError::ConfigError("TELEGRAM_BOT_TOKEN not set".to_string()))?;
        Ok(Self::new(token))
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_base.trim_end_matches('/'),
            self.token
        )
    }
}

/// Telegram user
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub username: Option<String>,
}

/// Telegram chat
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    /// `private`, `group`, `supergroup` or `channel`
    #[serde(rename = "type")]
    pub chat_type: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl Chat {
    /// How the router should treat messages from this chat; channels are skipped
    pub fn kind(&self) -> Option<ChatKind> {
        match self.chat_type.as_str() {
            "private" => Some(ChatKind::Direct),
            "group" | "supergroup" => Some(ChatKind::Group),
            _ => None,
        }
    }
}

/// Telegram message
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub new_chat_members: Option<Vec<User>>,
}

/// Incoming update
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self, method: &str) -> Result<T> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(BotError::Telegram(format!(
                "{method} failed: {}",
                self.description.unwrap_or_else(|| "no description".to_string())
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
struct GetUpdates {
    offset: i64,
    timeout: u64,
    allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_message_id: Option<i64>,
}

/// Thin Bot API client
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    config: TelegramConfig,
}

impl TelegramClient {
    /// Create a client; the HTTP timeout leaves room for the long poll
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs + 10))
            .build()?;
        Ok(Self { client, config })
    }

    async fn call<B: Serialize + ?Sized, T: DeserializeOwned>(&self, method: &str, body: &B) -> Result<T> {
        let response: ApiResponse<T> = self
            .client
            .post(self.config.method_url(method))
            .json(body)
            .send()
            .await?
            .json()
            .await?;
        response.into_result(method)
    }

    async fn call_multipart<T: DeserializeOwned>(&self, method: &str, form: Form) -> Result<T> {
        let response: ApiResponse<T> = self
            .client
            .post(self.config.method_url(method))
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;
        response.into_result(method)
    }

    /// The bot's own user
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Updates after `offset`, waiting up to the poll timeout
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let request = GetUpdates {
            offset,
            timeout: self.config.poll_timeout_secs,
            allowed_updates: &["message"],
        };
        self.call("getUpdates", &request).await
    }

    /// Send `text` to `chat_id`, truncated to the message limit
    #[instrument(skip(self, text))]
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
        markdown: bool,
    ) -> Result<()> {
        let text = truncate_utf16(text, MAX_MESSAGE_CHARS);
        let request = SendMessage {
            chat_id,
            text,
            parse_mode: markdown.then_some("Markdown"),
            reply_to_message_id: reply_to,
        };
        let _: TelegramMessage = self.call("sendMessage", &request).await?;
        Ok(())
    }

    /// Upload a PNG to `chat_id` with `caption`, truncated to the caption limit
    #[instrument(skip(self, png, caption), fields(size = png.len()))]
    pub async fn send_photo(
        &self,
        chat_id: i64,
        png: &[u8],
        caption: &str,
        reply_to: Option<i64>,
        markdown: bool,
    ) -> Result<()> {
        let photo = Part::bytes(png.to_vec())
            .file_name("chart.png")
            .mime_str("image/png")?;
        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", truncate_utf16(caption, MAX_CAPTION_CHARS).to_string())
            .part("photo", photo);
        if markdown {
            form = form.text("parse_mode", "Markdown");
        }
        if let Some(message_id) = reply_to {
            form = form.text("reply_to_message_id", message_id.to_string());
        }

        let _: TelegramMessage = self.call_multipart("sendPhoto", form).await?;
        Ok(())
    }

    /// Send a bot reply; Markdown that Telegram refuses to parse is resent as plain text
    pub async fn send_reply(&self, chat_id: i64, reply: &BotReply, reply_to: Option<i64>) -> Result<()> {
        if !reply.markdown {
            return self.deliver(chat_id, reply, reply_to, false).await;
        }

        match self.deliver(chat_id, reply, reply_to, true).await {
            Err(BotError::Telegram(e)) => {
                warn!("Markdown reply rejected ({e}), resending as plain text");
                self.deliver(chat_id, reply, reply_to, false).await
            }
            other => other,
        }
    }

    async fn deliver(&self, chat_id: i64, reply: &BotReply, reply_to: Option<i64>, markdown: bool) -> Result<()> {
        match &reply.photo {
            Some(png) => self.send_photo(chat_id, png, &reply.text, reply_to, markdown).await,
            None => self.send_message(chat_id, &reply.text, reply_to, markdown).await,
        }
    }
}

/// Telegram front end for [`ChartBot`]
pub struct TelegramBot {
    client: TelegramClient,
    bot: Arc<ChartBot>,
}

impl TelegramBot {
    /// Create a Telegram bot
    pub fn new(config: TelegramConfig, bot: Arc<ChartBot>) -> Result<Self> {
        Ok(Self {
            client: TelegramClient::new(config)?,
            bot,
        })
    }

    /// Poll for updates until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        let me = self.client.get_me().await?;
        info!(
            username = me.username.as_deref().unwrap_or_default(),
            "Telegram bot started"
        );

        tokio::select! {
            result = self.poll(me.id) => result,
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down Telegram bot");
                Ok(())
            }
        }
    }

    async fn poll(&self, bot_id: i64) -> Result<()> {
        let mut offset = 0;
        loop {
            let updates = match self.client.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    error!("getUpdates failed: {e}");
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                let Some(message) = update.message else {
                    continue;
                };

                let client = self.client.clone();
                let bot = Arc::clone(&self.bot);
                tokio::spawn(async move {
                    if let Err(e) = handle_message(&client, &bot, bot_id, message).await {
                        error!("Failed to handle Telegram message: {e}");
                    }
                });
            }
        }
    }
}

async fn handle_message(
    client: &TelegramClient,
    bot: &ChartBot,
    bot_id: i64,
    message: TelegramMessage,
) -> Result<()> {
    let chat_id = message.chat.id;

    if was_added_to_group(&message, bot_id) {
        info!(chat_id, "Added to group");
        let welcome = commands::group_welcome_text(message.chat.title.as_deref(), bot.group_prefix());
        return client.send_reply(chat_id, &BotReply::markdown(welcome), None).await;
    }

    let (Some(kind), Some(text)) = (message.chat.kind(), message.text.as_deref()) else {
        return Ok(());
    };

    debug!(chat_id, ?kind, "Received message");
    match bot.handle(text, kind).await {
        Some(reply) => client.send_reply(chat_id, &reply, Some(message.message_id)).await,
        None => Ok(()),
    }
}

fn was_added_to_group(message: &TelegramMessage, bot_id: i64) -> bool {
    message
        .new_chat_members
        .as_ref()
        .is_some_and(|members| members.iter().any(|member| member.id == bot_id))
}

/// Longest prefix of `text` that fits in `max` UTF-16 code units, which is
/// how Telegram measures message and caption length. Never splits a character.
pub fn truncate_utf16(text: &str, max: usize) -> &str {
    let mut units = 0;
    for (index, ch) in text.char_indices() {
        units += ch.len_utf16();
        if units > max {
            return &text[..index];
        }
    }
    text
}
