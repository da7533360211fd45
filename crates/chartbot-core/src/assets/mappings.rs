//! File-backed asset mapping table
//!
//! The table is a JSON document keyed by Artemis id:
//!
//! ```json
//! {
//!   "artemis_id_to_symbols": { "solana": ["sol"], "ethereum": "eth" },
//!   "artemis_id_to_type": { "solana": "chain", "uniswap": "application" }
//! }
//! ```
//!
//! Symbols may be a single string or a list. A reverse symbol index is built
//! once on load; afterwards the table is read-only. Assets without a type
//! resolve with no type so the command's hint applies.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{AssetLookup, AssetRecord};
use crate::error::{ChartError, Result};

/// Default location of the mapping file, relative to the working directory
pub const DEFAULT_MAPPINGS_FILE: &str = "config/artemis_mappings.json";

const UNKNOWN_TYPE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum Symbols {
    One(String),
    Many(Vec<String>),
}

impl Symbols {
    fn iter(&self) -> impl Iterator<Item = &str> {
        let slice = match self {
            Self::One(symbol) => std::slice::from_ref(symbol),
            Self::Many(symbols) => symbols.as_slice(),
        };
        slice.iter().map(String::as_str)
    }

    fn first(&self) -> Option<&str> {
        self.iter().next()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MappingsFile {
    #[serde(default)]
    artemis_id_to_symbols: BTreeMap<String, Symbols>,
    #[serde(default)]
    artemis_id_to_type: BTreeMap<String, String>,
    #[serde(default, skip_deserializing)]
    symbol_to_artemis_id: BTreeMap<String, String>,
    #[serde(default, skip_deserializing)]
    symbol_to_type: BTreeMap<String, String>,
}

/// Asset entry as returned by the Artemis asset listing API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiAsset {
    /// Platform id
    #[serde(default)]
    pub artemis_id: Option<String>,
    /// Ticker symbol
    #[serde(default)]
    pub symbol: Option<String>,
    /// Free-form metadata; `metadata.about.asset == "chain"` marks chains
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl ApiAsset {
    fn is_chain(&self) -> bool {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("about"))
            .and_then(|about| about.get("asset"))
            .and_then(serde_json::Value::as_str)
            == Some("chain")
    }
}

/// In-memory asset table implementing [`AssetLookup`]
#[derive(Debug, Clone, Default)]
pub struct AssetMappings {
    id_to_symbols: BTreeMap<String, Symbols>,
    id_to_type: BTreeMap<String, String>,
    symbol_to_id: HashMap<String, String>,
}

impl AssetMappings {
    fn from_file(file: MappingsFile) -> Self {
        let mut symbol_to_id = HashMap::new();
        for (id, symbols) in &file.artemis_id_to_symbols {
            for symbol in symbols.iter() {
                symbol_to_id.insert(symbol.to_lowercase(), id.clone());
            }
        }

        Self {
            id_to_symbols: file.artemis_id_to_symbols,
            id_to_type: file.artemis_id_to_type,
            symbol_to_id,
        }
    }

    /// Parse a mapping document
    pub fn from_json(json: &str) -> Result<Self> {
        let file: MappingsFile = serde_json::from_str(json)?;
        Ok(Self::from_file(file))
    }

    /// Load the mapping file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            ChartError::Mappings(format!(
                "could not read mappings file at {}: {e}",
                path.display()
            ))
        })?;
        let mappings = Self::from_json(&json)?;
        info!(path = %path.display(), assets = mappings.len(), "Loaded asset mappings");
        Ok(mappings)
    }

    /// Build a table from the Artemis asset listing.
    ///
    /// Entries without an id or symbol are skipped. The type is `chain` when
    /// the metadata says so and `application` otherwise.
    pub fn from_asset_list(assets: &[ApiAsset]) -> Self {
        let mut file = MappingsFile::default();
        for asset in assets {
            let (Some(id), Some(symbol)) = (asset.artemis_id.as_deref(), asset.symbol.as_deref())
            else {
                continue;
            };
            let (id, symbol) = (id.trim(), symbol.trim().to_lowercase());
            if id.is_empty() || symbol.is_empty() {
                continue;
            }

            let asset_type = if asset.is_chain() { "chain" } else { "application" };
            file.artemis_id_to_symbols
                .insert(id.to_string(), Symbols::Many(vec![symbol]));
            file.artemis_id_to_type
                .insert(id.to_string(), asset_type.to_string());
        }
        Self::from_file(file)
    }

    /// Write the table to `path` as pretty JSON, creating parent directories.
    ///
    /// The reverse symbol indexes are written too, for consumers that read
    /// the file directly.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = MappingsFile {
            artemis_id_to_symbols: self.id_to_symbols.clone(),
            artemis_id_to_type: self.id_to_type.clone(),
            ..MappingsFile::default()
        };
        for (symbol, id) in &self.symbol_to_id {
            file.symbol_to_artemis_id.insert(symbol.clone(), id.clone());
            file.symbol_to_type
                .insert(symbol.clone(), self.type_of(id).unwrap_or(UNKNOWN_TYPE).to_string());
        }

        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        info!(path = %path.display(), assets = self.len(), "Saved asset mappings");
        Ok(())
    }

    /// Number of assets
    pub fn len(&self) -> usize {
        self.id_to_symbols.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.id_to_symbols.is_empty()
    }

    fn type_of(&self, id: &str) -> Option<&str> {
        self.id_to_type.get(id).map(String::as_str)
    }
}

impl AssetLookup for AssetMappings {
    fn lookup_by_id(&self, id: &str) -> Option<AssetRecord> {
        let symbol = self.id_to_symbols.get(id)?.first()?;
        debug!(id, symbol, "Resolved asset by id");
        let mut record = AssetRecord::new(id).with_symbol(symbol);
        record.asset_type = self.type_of(id).map(str::to_string);
        Some(record)
    }

    fn lookup_by_symbol(&self, symbol: &str) -> Option<AssetRecord> {
        let symbol = symbol.to_lowercase();
        let id = self.symbol_to_id.get(&symbol)?;
        debug!(id = %id, symbol = %symbol, "Resolved asset by symbol");
        let mut record = AssetRecord::new(id.clone()).with_symbol(symbol);
        record.asset_type = self.type_of(id).map(str::to_string);
        Some(record)
    }
}
