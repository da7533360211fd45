//! # chartbot-core
//!
//! Command interpretation and chart configuration for the Artemis chart
//! builder.
//!
//! A chat command such as `price vs tvl solana ethereum 1w 1d` is parsed into
//! a [`ParsedCommand`], then [`ChartBuilder`] validates it against the closed
//! vocabularies, resolves each ticker through an [`AssetLookup`] and produces
//! the chart document together with its URL.
//!
//! ```no_run
//! use chartbot_core::{AssetMappings, ChartBuilder, ParsedCommand};
//!
//! # fn main() -> chartbot_core::Result<()> {
//! let mappings = AssetMappings::load("config/artemis_mappings.json")?;
//! let command = ParsedCommand::parse("price vs tvl solana ethereum 1w 1d", false)?;
//! let chart = ChartBuilder::new().build(&command, &mappings)?;
//! println!("{}\n{}", chart.title, chart.url);
//! # Ok(())
//! # }
//! ```
//!
//! Everything here is synchronous and free of I/O apart from loading and
//! saving the mapping file.

pub mod assets;
pub mod chart;
pub mod command;
pub mod error;
pub mod vocab;

pub use assets::{AssetLookup, AssetMappings, AssetRecord};
pub use chart::{BuiltChart, ChartBuilder, ChartConfig, SeriesEntry};
pub use command::ParsedCommand;
pub use error::{ChartError, Result};
pub use vocab::{Granularity, Metric, TimePeriod};
