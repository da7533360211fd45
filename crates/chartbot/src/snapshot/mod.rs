//! Chart images and vision summaries
//!
//! A [`ChartRenderer`] turns a chart-builder link into a PNG, and the
//! [`ChartAnalyzer`] asks a vision model to summarize that image for the
//! photo caption.

mod analyzer;
mod screenshot;

pub use analyzer::{ANALYSIS_MODEL, ANALYSIS_PROMPT, ChartAnalyzer};
pub use screenshot::ScreenshotClient;

use async_trait::async_trait;

use crate::error::Result;

/// Produces an image of a rendered chart page
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    /// PNG bytes of the chart at `url`
    async fn render(&self, url: &str) -> Result<Vec<u8>>;
}
