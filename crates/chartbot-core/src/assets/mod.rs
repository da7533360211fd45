//! Asset records and the lookup capability used to resolve tickers

mod mappings;

pub use mappings::{ApiAsset, AssetMappings, DEFAULT_MAPPINGS_FILE};

use serde::{Deserialize, Serialize};

/// Asset as known to the chart platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Platform identifier (e.g. "solana")
    pub id: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Ticker symbol
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Asset type (e.g. "chain", "application")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
}

impl AssetRecord {
    /// Create a record with only an id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            symbol: None,
            asset_type: None,
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the ticker symbol
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Set the asset type
    pub fn with_type(mut self, asset_type: impl Into<String>) -> Self {
        self.asset_type = Some(asset_type.into());
        self
    }
}

/// Resolves ticker tokens to asset records
///
/// Implementations must be read-only and idempotent; the chart builder may
/// call them concurrently for independent commands.
#[cfg_attr(test, mockall::automock)]
pub trait AssetLookup: Send + Sync {
    /// Find an asset by platform id
    fn lookup_by_id(&self, id: &str) -> Option<AssetRecord>;

    /// Find an asset by ticker symbol
    fn lookup_by_symbol(&self, symbol: &str) -> Option<AssetRecord>;
}

/// Resolve a ticker: by id first, then by symbol.
///
/// At most two lookups are made and a miss is final.
pub fn resolve<L: AssetLookup + ?Sized>(lookup: &L, ticker: &str) -> Option<AssetRecord> {
    lookup
        .lookup_by_id(ticker)
        .or_else(|| lookup.lookup_by_symbol(ticker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    #[test]
    fn test_resolve_prefers_id() {
        let mut lookup = MockAssetLookup::new();
        lookup
            .expect_lookup_by_id()
            .with(eq("solana"))
            .times(1)
            .returning(|id| Some(AssetRecord::new(id)));
        lookup.expect_lookup_by_symbol().never();

        let record = resolve(&lookup, "solana").unwrap();
        assert_eq!(record.id, "solana");
    }

    #[test]
    fn test_resolve_falls_back_to_symbol() {
        let mut lookup = MockAssetLookup::new();
        lookup.expect_lookup_by_id().times(1).returning(|_| None);
        lookup
            .expect_lookup_by_symbol()
            .with(eq("sol"))
            .times(1)
            .returning(|_| Some(AssetRecord::new("solana").with_symbol("sol")));

        let record = resolve(&lookup, "sol").unwrap();
        assert_eq!(record.id, "solana");
        assert_eq!(record.symbol.as_deref(), Some("sol"));
    }

    #[test]
    fn test_record_type_field_name() {
        let record: AssetRecord =
            serde_json::from_str(r#"{"id":"uniswap","type":"application"}"#).unwrap();
        assert_eq!(record.asset_type.as_deref(), Some("application"));
        assert_eq!(record.name, None);
    }
}
