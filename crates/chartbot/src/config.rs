//! Bot configuration
//!
//! Settings come from the environment (after `.env` is loaded by the binary):
//!
//! | variable | default |
//! |---|---|
//! | `TELEGRAM_BOT_TOKEN` | required for `telegram` |
//! | `OPENAI_API_KEY` | news summaries disabled when unset |
//! | `OPENAI_API_BASE` | `https://api.openai.com/v1` |
//! | `OPENAI_MODEL` | `gpt-4` |
//! | `OPENAI_VISION_MODEL` | `gpt-4o` |
//! | `CHART_SCREENSHOT_URL` | charts sent as links when unset |
//! | `FINNHUB_API_KEY` | headlines skipped when unset |
//! | `ARTEMIS_API_KEY` | required for `update-mappings` |
//! | `ARTEMIS_API_BASE` | `https://api.artemisxyz.com` |
//! | `ASSET_MAPPINGS_FILE` | `config/artemis_mappings.json` |
//! | `CHART_BASE_URL` | `https://app.artemis.xyz/chart-builder/` |
//! | `GROUP_PREFIX` | `=art` |

use std::path::PathBuf;
use std::time::Duration;

use chartbot_core::assets::DEFAULT_MAPPINGS_FILE;
use chartbot_core::chart::{DEFAULT_BASE_URL, normalize_base_url};
use chartbot_core::command::GROUP_PREFIX;
use chartbot_llm::OpenAIConfig;
use chartbot_utils::{EnvSource, ProcessEnv};
use url::Url;

use crate::error::{BotError, Result};
use crate::snapshot::ANALYSIS_MODEL;

const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_ARTEMIS_API_BASE: &str = "https://api.artemisxyz.com";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the chart bot
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram Bot API token
    pub telegram_token: Option<String>,
    /// Key for the chat-completion API; news is disabled without it
    pub openai_api_key: Option<String>,
    pub openai_api_base: String,
    /// Model used for news summaries
    pub model: String,
    /// Vision model used for chart summaries
    pub vision_model: String,
    /// Screenshot service endpoint; charts are sent as images when set
    pub screenshot_url: Option<String>,
    /// Key for the Finnhub news API
    pub finnhub_api_key: Option<String>,
    /// Key for the Artemis asset API
    pub artemis_api_key: Option<String>,
    pub artemis_api_base: String,
    /// Asset mapping file
    pub mappings_file: PathBuf,
    /// Chart-builder endpoint
    pub chart_base_url: String,
    /// Prefix of group-chat commands
    pub group_prefix: String,
    /// Timeout for outbound HTTP requests
    pub request_timeout: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            telegram_token: None,
            openai_api_key: None,
            openai_api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            vision_model: ANALYSIS_MODEL.to_string(),
            screenshot_url: None,
            finnhub_api_key: None,
            artemis_api_key: None,
            artemis_api_base: DEFAULT_ARTEMIS_API_BASE.to_string(),
            mappings_file: PathBuf::from(DEFAULT_MAPPINGS_FILE),
            chart_base_url: DEFAULT_BASE_URL.to_string(),
            group_prefix: GROUP_PREFIX.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl BotConfig {
    /// Create config from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_source(&ProcessEnv)
    }

    /// Create config from an arbitrary settings source
    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            telegram_token: env.var("TELEGRAM_BOT_TOKEN"),
            openai_api_key: env.var("OPENAI_API_KEY"),
            openai_api_base: env.var_or("OPENAI_API_BASE", &defaults.openai_api_base),
            model: env.var_or("OPENAI_MODEL", &defaults.model),
            vision_model: env.var_or("OPENAI_VISION_MODEL", &defaults.vision_model),
            screenshot_url: env.var("CHART_SCREENSHOT_URL"),
            finnhub_api_key: env.var("FINNHUB_API_KEY"),
            artemis_api_key: env.var("ARTEMIS_API_KEY"),
            artemis_api_base: env.var_or("ARTEMIS_API_BASE", &defaults.artemis_api_base),
            mappings_file: env
                .var("ASSET_MAPPINGS_FILE")
                .map_or(defaults.mappings_file, PathBuf::from),
            chart_base_url: env.var_or("CHART_BASE_URL", &defaults.chart_base_url),
            group_prefix: env.var_or("GROUP_PREFIX", &defaults.group_prefix),
            request_timeout: defaults.request_timeout,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create a builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        normalize_base_url(&self.chart_base_url)
            .map_err(|e| BotError::ConfigError(e.to_string()))?;

        for (name, value) in [
            ("OPENAI_API_BASE", &self.openai_api_base),
            ("ARTEMIS_API_BASE", &self.artemis_api_base),
        ] {
            check_url(name, value)?;
        }
        if let Some(value) = &self.screenshot_url {
            check_url("CHART_SCREENSHOT_URL", value)?;
        }

        if self.group_prefix.trim().is_empty() {
            return Err(BotError::ConfigError(
                "group prefix must not be empty".to_string(),
            ));
        }

        if self.model.trim().is_empty() || self.vision_model.trim().is_empty() {
            return Err(BotError::ConfigError("model must not be empty".to_string()));
        }

        if self.request_timeout.is_zero() {
            return Err(BotError::ConfigError(
                "request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Telegram token, or a configuration error naming the variable
    pub fn require_telegram_token(&self) -> Result<&str> {
        self.telegram_token
            .as_deref()
            .ok_or_else(|| BotError::ConfigError("TELEGRAM_BOT_TOKEN not set".to_string()))
    }

    /// Artemis API key, or a configuration error naming the variable
    pub fn require_artemis_key(&self) -> Result<&str> {
        self.artemis_api_key
            .as_deref()
            .ok_or_else(|| BotError::ConfigError("ARTEMIS_API_KEY not set".to_string()))
    }

    /// Chat-completion provider settings, when a key is configured
    pub fn openai_config(&self) -> Option<OpenAIConfig> {
        self.openai_api_key.as_ref().map(|key| {
            OpenAIConfig::new(key.clone())
                .with_api_base(self.openai_api_base.clone())
                .with_timeout(self.request_timeout.as_secs())
        })
    }
}

fn check_url(name: &str, value: &str) -> Result<()> {
    Url::parse(value)
        .map(drop)
        .map_err(|e| BotError::ConfigError(format!("{name} '{value}' is not a valid URL: {e}")))
}

/// Builder for [`BotConfig`]
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    telegram_token: Option<String>,
    openai_api_key: Option<String>,
    openai_api_base: Option<String>,
    model: Option<String>,
    vision_model: Option<String>,
    screenshot_url: Option<String>,
    finnhub_api_key: Option<String>,
    artemis_api_key: Option<String>,
    artemis_api_base: Option<String>,
    mappings_file: Option<PathBuf>,
    chart_base_url: Option<String>,
    group_prefix: Option<String>,
    request_timeout: Option<Duration>,
}

impl BotConfigBuilder {
    /// Set the Telegram token
    pub fn telegram_token(mut self, token: impl Into<String>) -> Self {
        self.telegram_token = Some(token.into());
        self
    }

    /// Set the chat-completion API key
    pub fn openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = Some(key.into());
        self
    }

    /// Set the chat-completion API base URL
    pub fn openai_api_base(mut self, base: impl Into<String>) -> Self {
        self.openai_api_base = Some(base.into());
        self
    }

    /// Set the summary model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the chart summary model
    pub fn vision_model(mut self, model: impl Into<String>) -> Self {
        self.vision_model = Some(model.into());
        self
    }

    /// Send charts as screenshots taken by this service
    pub fn screenshot_url(mut self, url: impl Into<String>) -> Self {
        self.screenshot_url = Some(url.into());
        self
    }

    /// Set the Finnhub key
    pub fn finnhub_api_key(mut self, key: impl Into<String>) -> Self {
        self.finnhub_api_key = Some(key.into());
        self
    }

    /// Set the Artemis key
    pub fn artemis_api_key(mut self, key: impl Into<String>) -> Self {
        self.artemis_api_key = Some(key.into());
        self
    }

    /// Set the Artemis API base URL
    pub fn artemis_api_base(mut self, base: impl Into<String>) -> Self {
        self.artemis_api_base = Some(base.into());
        self
    }

    /// Set the mapping file path
    pub fn mappings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.mappings_file = Some(path.into());
        self
    }

    /// Set the chart-builder endpoint
    pub fn chart_base_url(mut self, url: impl Into<String>) -> Self {
        self.chart_base_url = Some(url.into());
        self
    }

    /// Set the group-chat prefix
    pub fn group_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.group_prefix = Some(prefix.into());
        self
    }

    /// Set the HTTP timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build and validate the config
    pub fn build(self) -> Result<BotConfig> {
        let defaults = BotConfig::default();
        let config = BotConfig {
            telegram_token: self.telegram_token,
            openai_api_key: self.openai_api_key,
            openai_api_base: self.openai_api_base.unwrap_or(defaults.openai_api_base),
            model: self.model.unwrap_or(defaults.model),
            vision_model: self.vision_model.unwrap_or(defaults.vision_model),
            screenshot_url: self.screenshot_url,
            finnhub_api_key: self.finnhub_api_key,
            artemis_api_key: self.artemis_api_key,
            artemis_api_base: self.artemis_api_base.unwrap_or(defaults.artemis_api_base),
            mappings_file: self.mappings_file.unwrap_or(defaults.mappings_file),
            chart_base_url: self.chart_base_url.unwrap_or(defaults.chart_base_url),
            group_prefix: self.group_prefix.unwrap_or(defaults.group_prefix),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = BotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.group_prefix, "=art");
        assert_eq!(config.chart_base_url, "https://app.artemis.xyz/chart-builder/");
        assert_eq!(config.mappings_file, PathBuf::from("config/artemis_mappings.json"));
        assert!(config.openai_config().is_none());
        assert_eq!(config.vision_model, "gpt-4o");
        assert!(config.screenshot_url.is_none());
    }

    #[test]
    fn test_screenshot_settings() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CHART_SCREENSHOT_URL", "http://localhost:3000/screenshot"),
            ("OPENAI_VISION_MODEL", "gpt-4o-mini"),
        ]);
        let config = BotConfig::from_source(&env).unwrap();
        assert_eq!(config.screenshot_url.as_deref(), Some("http://localhost:3000/screenshot"));
        assert_eq!(config.vision_model, "gpt-4o-mini");

        let env: HashMap<&str, &str> = HashMap::from([("CHART_SCREENSHOT_URL", "localhost screenshot")]);
        let err = BotConfig::from_source(&env).unwrap_err();
        assert!(err.to_string().contains("CHART_SCREENSHOT_URL"));
    }

    #[test]
    fn test_from_source() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_API_BASE", "http://localhost:1234/v1"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("ASSET_MAPPINGS_FILE", "/tmp/mappings.json"),
            ("GROUP_PREFIX", "=chart"),
        ]);

        let config = BotConfig::from_source(&env).unwrap();
        assert_eq!(config.require_telegram_token().unwrap(), "123:abc");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.group_prefix, "=chart");
        assert_eq!(config.mappings_file, PathBuf::from("/tmp/mappings.json"));

        let openai = config.openai_config().unwrap();
        assert_eq!(openai.api_key, "sk-test");
        assert_eq!(openai.api_base, "http://localhost:1234/v1");
        assert_eq!(openai.timeout_secs, 60);
    }

    #[test]
    fn test_missing_keys() {
        let env: HashMap<&str, &str> = HashMap::new();
        let config = BotConfig::from_source(&env).unwrap();

        let err = config.require_telegram_token().unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_BOT_TOKEN"));
        let err = config.require_artemis_key().unwrap_err();
        assert!(err.to_string().contains("ARTEMIS_API_KEY"));
    }

    #[test]
    fn test_rejects_bad_chart_url() {
        let env: HashMap<&str, &str> = HashMap::from([("CHART_BASE_URL", "not a url")]);
        assert!(matches!(
            BotConfig::from_source(&env),
            Err(BotError::ConfigError(_))
        ));
    }

    #[test]
    fn test_builder_validation() {
        let config = BotConfig::builder()
            .model("gpt-4o")
            .group_prefix("=art")
            .request_timeout(Duration::from_secs(10))
            .build()
            .unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.request_timeout, Duration::from_secs(10));

        assert!(BotConfig::builder().group_prefix("  ").build().is_err());
        assert!(BotConfig::builder().request_timeout(Duration::ZERO).build().is_err());
        assert!(BotConfig::builder().artemis_api_base("nope").build().is_err());
    }
}
