//! Artemis asset API client
//!
//! Used by `chartbot update-mappings` to refresh the local mapping file from
//! the asset listing.

use std::path::Path;
use std::time::Duration;

use chartbot_core::AssetMappings;
use chartbot_core::assets::ApiAsset;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::config::BotConfig;
use crate::error::{BotError, Result};

/// Listing payload; the API wraps the list in `assets`, older deployments
/// return it bare
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AssetListResponse {
    Wrapped { assets: Vec<ApiAsset> },
    Bare(Vec<ApiAsset>),
}

impl AssetListResponse {
    fn into_assets(self) -> Vec<ApiAsset> {
        match self {
            Self::Wrapped { assets } | Self::Bare(assets) => assets,
        }
    }
}

/// Client for the Artemis asset API
#[derive(Debug, Clone)]
pub struct ArtemisClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl ArtemisClient {
    pub fn new(api_key: impl Into<String>, api_base: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            api_base: api_base.into(),
        })
    }

    /// Client from bot configuration; fails when `ARTEMIS_API_KEY` is unset
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        let key = config.require_artemis_key()?;
        Self::new(key, config.artemis_api_base.clone(), config.request_timeout)
    }

    fn asset_list_url(&self) -> String {
        format!("{}/asset", self.api_base.trim_end_matches('/'))
    }

    /// Every asset known to Artemis
    #[instrument(skip(self))]
    pub async fn list_assets(&self) -> Result<Vec<ApiAsset>> {
        let response = self
            .client
            .get(self.asset_list_url())
            .query(&[("APIKey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| BotError::ApiError(format!("Artemis request failed: {e}")))?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BotError::ApiError(format!("Artemis API error {status}: {body}")));
        }

        let assets = parse_asset_list(&body)?;
        info!(count = assets.len(), "Fetched Artemis assets");
        Ok(assets)
    }

    /// Fetch the asset listing and write it to `path` as a mapping file.
    ///
    /// An empty listing is treated as an error so a bad response never
    /// replaces a working file.
    pub async fn sync_mappings(&self, path: impl AsRef<Path>) -> Result<AssetMappings> {
        let assets = self.list_assets().await?;
        let mappings = AssetMappings::from_asset_list(&assets);
        if mappings.is_empty() {
            return Err(BotError::ApiError(
                "Artemis returned no usable assets; mappings file left untouched".to_string(),
            ));
        }

        mappings.save(path)?;
        Ok(mappings)
    }
}

fn parse_asset_list(body: &str) -> Result<Vec<ApiAsset>> {
    serde_json::from_str::<AssetListResponse>(body)
        .map(AssetListResponse::into_assets)
        .map_err(|e| BotError::ApiError(format!("Failed to parse Artemis asset list: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartbot_core::AssetLookup;

    const LISTING: &str = r#"{
        "assets": [
            {"artemis_id": "solana", "symbol": "SOL", "metadata": {"about": {"asset": "chain"}}},
            {"artemis_id": "uniswap", "symbol": "uni", "metadata": null},
            {"artemis_id": "mystery"}
        ]
    }"#;

    #[test]
    fn test_parse_wrapped_listing() {
        let assets = parse_asset_list(LISTING).unwrap();
        assert_eq!(assets.len(), 3);
        assert_eq!(assets[0].artemis_id.as_deref(), Some("solana"));
        assert_eq!(assets[2].symbol, None);
    }

    #[test]
    fn test_parse_bare_listing() {
        let assets = parse_asset_list(r#"[{"artemis_id": "aave", "symbol": "aave"}]"#).unwrap();
        assert_eq!(assets.len(), 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_asset_list(r#"{"error": "bad key"}"#).unwrap_err();
        assert!(matches!(err, BotError::ApiError(_)));
    }

    #[test]
    fn test_listing_to_mappings() {
        let mappings = AssetMappings::from_asset_list(&parse_asset_list(LISTING).unwrap());
        assert_eq!(mappings.len(), 2);

        let sol = mappings.lookup_by_symbol("sol").unwrap();
        assert_eq!(sol.id, "solana");
        assert_eq!(sol.asset_type.as_deref(), Some("chain"));
        assert_eq!(
            mappings.lookup_by_id("uniswap").unwrap().asset_type.as_deref(),
            Some("application")
        );
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = BotConfig::default();
        assert!(matches!(
            ArtemisClient::from_config(&config),
            Err(BotError::ConfigError(_))
        ));

        let config = BotConfig {
            artemis_api_key: Some("key".to_string()),
            artemis_api_base: "http://localhost:8080/".to_string(),
            ..BotConfig::default()
        };
        let client = ArtemisClient::from_config(&config).unwrap();
        assert_eq!(client.asset_list_url(), "http://localhost:8080/asset");
    }

    #[test]
    fn test_saved_listing_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("mappings.json");
        AssetMappings::from_asset_list(&parse_asset_list(LISTING).unwrap())
            .save(&path)
            .unwrap();

        let reloaded = AssetMappings::load(&path).unwrap();
        assert_eq!(reloaded.lookup_by_symbol("uni").unwrap().id, "uniswap");
        assert!(AssetMappings::load(dir.path().join("missing.json")).is_err());
    }
}
