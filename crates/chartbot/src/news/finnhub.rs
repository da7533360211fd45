//! Finnhub market news client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::{NewsArticle, NewsFeed};
use crate::error::{BotError, Result};

const DEFAULT_FINNHUB_API_BASE: &str = "https://finnhub.io/api/v1";

/// Finnhub client for the news API
#[derive(Debug, Clone)]
pub struct FinnhubClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl FinnhubClient {
    /// Create a client with the given request timeout
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            api_base: DEFAULT_FINNHUB_API_BASE.to_string(),
        })
    }

    /// Point the client at another API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn market_news_url(&self) -> String {
        format!("{}/news", self.api_base.trim_end_matches('/'))
    }

    /// General market news for a category (general, forex, crypto, merger)
    #[instrument(skip(self))]
    pub async fn market_news(&self, category: &str) -> Result<Vec<NewsArticle>> {
        let response = self
            .client
            .get(self.market_news_url())
            .query(&[("category", category), ("token", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| BotError::ApiError(format!("Finnhub request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::ApiError(format!(
                "Finnhub API error {status}: {body}"
            )));
        }

        let articles = response
            .json::<Vec<NewsArticle>>()
            .await
            .map_err(|e| BotError::ApiError(format!("Failed to parse Finnhub response: {e}")))?;

        debug!(count = articles.len(), "Fetched market news");
        Ok(articles)
    }
}

#[async_trait]
impl NewsFeed for FinnhubClient {
    async fn crypto_news(&self) -> Result<Vec<NewsArticle>> {
        self.market_news("crypto").await
    }
}
