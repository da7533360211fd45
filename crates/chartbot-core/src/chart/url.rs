//! Chart-builder endpoint handling

use url::Url;

use super::config::ChartConfig;
use crate::error::{ChartError, Result};

/// Public Artemis chart-builder endpoint
pub const DEFAULT_BASE_URL: &str = "https://app.artemis.xyz/chart-builder/";

/// Check that `base` is an absolute http(s) URL and make it end in `/`
pub fn normalize_base_url(base: &str) -> Result<String> {
    let base = base.trim();
    let parsed = Url::parse(base).map_err(|e| ChartError::InvalidBaseUrl(format!("{base}: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ChartError::InvalidBaseUrl(format!(
            "{base}: expected an http(s) URL with a host"
        )));
    }

    let mut normalized = base.to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Ok(normalized)
}

/// Serialize `config` and append it, percent-encoded, to `base`
pub fn encode(base: &str, config: &ChartConfig) -> Result<String> {
    let json = config.to_json()?;
    Ok(format!("{base}{}", urlencoding::encode(&json)))
}
