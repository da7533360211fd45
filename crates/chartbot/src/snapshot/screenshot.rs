//! HTTP screenshot service client
//!
//! The service loads the chart page in a headless browser and answers
//! `GET {endpoint}?url=<page>` with the image.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument};

use super::ChartRenderer;
use crate::error::{BotError, Result};

/// Client for a screenshot service
#[derive(Debug, Clone)]
pub struct ScreenshotClient {
    client: Client,
    endpoint: String,
}

impl ScreenshotClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChartRenderer for ScreenshotClient {
    #[instrument(skip(self, url), fields(endpoint = %self.endpoint))]
    async fn render(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", url)])
            .send()
            .await
            .map_err(|e| BotError::ApiError(format!("Screenshot request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::ApiError(format!(
                "Screenshot service error {status}: {body}"
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        check_content_type(content_type.as_deref())?;

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(BotError::ApiError(
                "Screenshot service returned an empty image".to_string(),
            ));
        }

        debug!(size = bytes.len(), "Captured chart screenshot");
        Ok(bytes.to_vec())
    }
}

/// Services that omit the header are trusted; anything else must be an image
fn check_content_type(content_type: Option<&str>) -> Result<()> {
    match content_type {
        Some(value) if !value.starts_with("image/") => Err(BotError::ApiError(format!(
            "Screenshot service returned '{value}' instead of an image"
        ))),
        _ => Ok(()),
    }
}
