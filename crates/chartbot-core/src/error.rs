//! Error types for command parsing and chart construction

use thiserror::Error;

/// Chart pipeline errors
///
/// The `Invalid*`/`Unknown*` variants are validation failures caused by user
/// input and are meant to be shown to the user verbatim.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Command text does not match the expected grammar
    #[error("{0}")]
    InvalidCommand(String),

    /// Metric code outside the metric vocabulary
    #[error("Unknown metric '{0}'. Must be one of: {list}", list = crate::vocab::Metric::codes())]
    UnknownMetric(String),

    /// Time period code outside the period vocabulary
    #[error("Unknown time period '{0}'. Must be one of: {list}", list = crate::vocab::TimePeriod::codes())]
    UnknownTimePeriod(String),

    /// Granularity code outside the granularity vocabulary
    #[error("Unknown granularity '{0}'. Must be one of: {list}", list = crate::vocab::Granularity::codes())]
    UnknownGranularity(String),

    /// Ticker resolved by neither the id nor the symbol lookup
    #[error("Asset '{0}' not found")]
    UnknownAsset(String),

    /// Mapping table is malformed
    #[error("Asset mappings error: {0}")]
    Mappings(String),

    /// Chart endpoint override is not an absolute http(s) URL
    #[error("Invalid chart base URL: {0}")]
    InvalidBaseUrl(String),

    /// Mapping file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChartError {
    /// Whether this error was caused by the user's input rather than a system fault
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCommand(_)
                | Self::UnknownMetric(_)
                | Self::UnknownTimePeriod(_)
                | Self::UnknownGranularity(_)
                | Self::UnknownAsset(_)
        )
    }
}

/// Result type alias for chart operations
pub type Result<T> = std::result::Result<T, ChartError>;
