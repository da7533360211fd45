//! LLM-written market news summaries

use std::sync::Arc;

use chartbot_llm::{CompletionRequest, LLMProvider, Message};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{error, info, warn};

use super::{NewsArticle, NewsFeed};

/// Reply used whenever a summary cannot be produced
pub const FALLBACK_SUMMARY: &str =
    "Failed to generate market news summary. Please try again later.";

const SYSTEM_PROMPT: &str = "You are a crypto market analyst providing concise news summaries.";
const MAX_HEADLINES: usize = 10;
const MAX_TOKENS: usize = 500;
const TEMPERATURE: f32 = 0.7;

/// Summarizes recent market news, optionally focused on one asset
pub struct NewsAnalyzer {
    provider: Arc<dyn LLMProvider>,
    feed: Option<Arc<dyn NewsFeed>>,
    model: String,
}

impl NewsAnalyzer {
    /// Analyzer without a headline feed; the model answers from its own knowledge
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            feed: None,
            model: model.into(),
        }
    }

    /// Ground summaries in headlines from `feed`
    pub fn with_feed(mut self, feed: Arc<dyn NewsFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Market news summary. Never fails: errors are logged and
    /// [`FALLBACK_SUMMARY`] is returned.
    pub async fn market_news(&self, asset: Option<&str>) -> String {
        let headlines = self.headlines(asset).await;
        let prompt = build_prompt(asset, &headlines, Utc::now().date_naive());

        let request = CompletionRequest::new(self.model.clone())
            .with_system(SYSTEM_PROMPT)
            .with_message(Message::user(prompt))
            .with_max_tokens(MAX_TOKENS)
            .with_temperature(TEMPERATURE);

        match self.provider.complete(request).await {
            Ok(response) => match response.message.text() {
                Some(summary) => {
                    info!(
                        asset = asset.unwrap_or("market"),
                        headlines = headlines.len(),
                        tokens = response.usage.total(),
                        "Generated news summary"
                    );
                    summary.to_string()
                }
                None => {
                    warn!("News summary came back empty");
                    FALLBACK_SUMMARY.to_string()
                }
            },
            Err(e) => {
                error!(provider = self.provider.name(), "Error generating market news summary: {e}");
                FALLBACK_SUMMARY.to_string()
            }
        }
    }

    async fn headlines(&self, asset: Option<&str>) -> Vec<NewsArticle> {
        let Some(feed) = &self.feed else {
            return Vec::new();
        };

        match feed.crypto_news().await {
            Ok(articles) => articles
                .into_iter()
                .filter(|article| asset.is_none_or(|asset| article.mentions(asset)))
                .take(MAX_HEADLINES)
                .collect(),
            Err(e) => {
                warn!("News feed unavailable, summarizing without headlines: {e}");
                Vec::new()
            }
        }
    }
}

fn build_prompt(asset: Option<&str>, headlines: &[NewsArticle], today: NaiveDate) -> String {
    let mut prompt = match asset {
        Some(asset) => format!(
            "Provide a concise summary of the latest market news specifically about {}. \
             Focus on price movements, significant events, and market sentiment. \
             Keep it under 500 characters.",
            asset.to_uppercase()
        ),
        None => "Provide a concise summary of the latest market news. \
                 Focus on major price movements, significant events, and overall market sentiment. \
                 Keep it under 500 characters."
            .to_string(),
    };

    prompt.push_str(&format!("\n\nToday is {}.", today.format("%Y-%m-%d")));

    if !headlines.is_empty() {
        prompt.push_str("\n\nRecent headlines:");
        for article in headlines {
            let date = DateTime::<Utc>::from_timestamp(article.datetime, 0)
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            prompt.push_str(&format!("\n- [{date}] {}", article.headline));
            if !article.source.is_empty() {
                prompt.push_str(&format!(" ({})", article.source));
            }
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;
    use crate::news::MockNewsFeed;
    use chartbot_llm::{CompletionResponse, LLMError, StopReason, TokenUsage};
    use mockall::mock;

    mock! {
        Provider {}

        #[async_trait::async_trait]
        impl LLMProvider for Provider {
            async fn complete(&self, request: CompletionRequest) -> chartbot_llm::Result<CompletionResponse>;
            fn name(&self) -> &'static str;
        }
    }

    fn reply(text: &str) -> CompletionResponse {
        CompletionResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }

    fn article(headline: &str, related: &str) -> NewsArticle {
        NewsArticle {
            datetime: 1_718_000_000,
            headline: headline.to_string(),
            related: related.to_string(),
            source: "Wire".to_string(),
            ..NewsArticle::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    #[test]
    fn test_prompt_for_asset() {
        let prompt = build_prompt(Some("eth"), &[], today());
        assert!(prompt.contains("specifically about ETH."));
        assert!(prompt.contains("Keep it under 500 characters."));
        assert!(prompt.contains("Today is 2024-06-10."));
        assert!(!prompt.contains("Recent headlines"));
    }

    #[test]
    fn test_prompt_lists_headlines() {
        let prompt = build_prompt(None, &[article("Bitcoin rallies", "BTC")], today());
        assert!(prompt.contains("latest market news. Focus on major price movements"));
        assert!(prompt.contains("Recent headlines:\n- [2024-06-10] Bitcoin rallies (Wire)"));
    }

    #[tokio::test]
    async fn test_summary_request() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_complete()
            .withf(|request| {
                request.model == "gpt-4"
                    && request.max_tokens == 500
                    && request.temperature == Some(0.7)
                    && request.system.as_deref() == Some(SYSTEM_PROMPT)
                    && request.messages[0].text().unwrap_or_default().contains("about SOL")
            })
            .times(1)
            .returning(|_| Ok(reply("  Solana is up 5% this week.  ")));

        let analyzer = NewsAnalyzer::new(Arc::new(provider), "gpt-4");
        let summary = analyzer.market_news(Some("sol")).await;
        assert_eq!(summary, "Solana is up 5% this week.");
    }

    #[tokio::test]
    async fn test_llm_failure_falls_back() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_complete()
            .returning(|_| Err(LLMError::AuthenticationFailed));

        let analyzer = NewsAnalyzer::new(Arc::new(provider), "gpt-4");
        assert_eq!(analyzer.market_news(None).await, FALLBACK_SUMMARY);
    }

    #[tokio::test]
    async fn test_empty_completion_falls_back() {
        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock");
        provider.expect_complete().returning(|_| Ok(reply("   ")));

        let analyzer = NewsAnalyzer::new(Arc::new(provider), "gpt-4");
        assert_eq!(analyzer.market_news(None).await, FALLBACK_SUMMARY);
    }

    #[tokio::test]
    async fn test_headlines_filtered_by_asset() {
        let mut feed = MockNewsFeed::new();
        feed.expect_crypto_news().times(1).returning(|| {
            Ok(vec![
                article("Bitcoin rallies", "BTC"),
                article("Ethereum upgrade ships", "ETH"),
                article("Macro week ahead", ""),
            ])
        });

        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_complete()
            .withf(|request| {
                let prompt = request.messages[0].text().unwrap_or_default();
                prompt.contains("Ethereum upgrade ships") && !prompt.contains("Bitcoin rallies")
            })
            .times(1)
            .returning(|_| Ok(reply("ETH upgrade went live.")));

        let analyzer = NewsAnalyzer::new(Arc::new(provider), "gpt-4").with_feed(Arc::new(feed));
        assert_eq!(analyzer.market_news(Some("eth")).await, "ETH upgrade went live.");
    }

    #[tokio::test]
    async fn test_feed_failure_still_summarizes() {
        let mut feed = MockNewsFeed::new();
        feed.expect_crypto_news()
            .returning(|| Err(BotError::ApiError("Finnhub API error 503".to_string())));

        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock");
        provider
            .expect_complete()
            .withf(|request| !request.messages[0].text().unwrap_or_default().contains("Recent headlines"))
            .times(1)
            .returning(|_| Ok(reply("Quiet day in crypto.")));

        let analyzer = NewsAnalyzer::new(Arc::new(provider), "gpt-4").with_feed(Arc::new(feed));
        assert_eq!(analyzer.market_news(None).await, "Quiet day in crypto.");
    }
}
