//! Market news: headline feeds and LLM summaries

mod analyzer;
mod finnhub;

pub use analyzer::{FALLBACK_SUMMARY, NewsAnalyzer};
pub use finnhub::FinnhubClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A news headline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    /// Publish time (UNIX timestamp)
    #[serde(default)]
    pub datetime: i64,
    pub headline: String,
    #[serde(default)]
    pub summary: String,
    /// Related tickers, comma separated
    #[serde(default)]
    pub related: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub url: String,
}

impl NewsArticle {
    /// Whether `asset` appears as a whole word in the headline or summary, or
    /// as an entry of the comma-separated related tickers (`ETH` matches `ETH-USD`)
    pub fn mentions(&self, asset: &str) -> bool {
        let asset = asset.trim();
        if asset.is_empty() {
            return false;
        }

        let in_related = self.related.split(',').map(str::trim).any(|entry| {
            entry.eq_ignore_ascii_case(asset)
                || entry
                    .split(['-', '/', ':'])
                    .next()
                    .is_some_and(|base| base.eq_ignore_ascii_case(asset))
        });

        in_related
            || [&self.headline, &self.summary].iter().any(|text| {
                text.split(|c: char| !c.is_alphanumeric())
                    .any(|word| word.eq_ignore_ascii_case(asset))
            })
    }
}

/// Source of recent crypto headlines
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsFeed: Send + Sync {
    /// Latest crypto headlines, newest first
    async fn crypto_news(&self) -> Result<Vec<NewsArticle>>;
}
