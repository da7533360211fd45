//! Chart configuration construction
//!
//! [`ChartBuilder`] maps the command vocabulary onto platform identifiers,
//! resolves tickers, lays out the metric × ticker series and encodes the
//! result into a chart-builder URL.

mod builder;
mod config;
mod url;

pub use builder::{BuiltChart, ChartBuilder, PALETTE, build};
pub use config::{
    ChartConfig, DisplayMode, Scale, SeriesAsset, SeriesEntry, SeriesMetric, SeriesSetting,
    SeriesType, Units,
};
pub use url::{DEFAULT_BASE_URL, normalize_base_url};
