//! Turns a parsed command into a chart-builder document and URL

use tracing::debug;

use super::config::{
    ChartConfig, DisplayMode, Scale, SeriesAsset, SeriesEntry, SeriesMetric, SeriesSetting,
    SeriesType, Units,
};
use super::url::{self, DEFAULT_BASE_URL};
use crate::assets::{self, AssetLookup, AssetRecord};
use crate::command::ParsedCommand;
use crate::error::{ChartError, Result};
use crate::vocab::{Granularity, Metric, TimePeriod, capitalize};

/// Series colors, indexed by metric position
pub const PALETTE: [&str; 5] = ["#8A88FF", "#FF8A65", "#4DD0E1", "#81C784", "#FFD54F"];

/// Result of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltChart {
    pub title: String,
    pub config: ChartConfig,
    pub url: String,
}

impl BuiltChart {
    /// Split into `(title, config, url)`
    pub fn into_parts(self) -> (String, ChartConfig, String) {
        (self.title, self.config, self.url)
    }
}

/// Chart configuration builder bound to a chart-builder endpoint
#[derive(Debug, Clone)]
pub struct ChartBuilder {
    base_url: String,
}

impl Default for ChartBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Ticker after resolution, with the fields the series and title need
struct ResolvedAsset {
    record: AssetRecord,
    name: String,
    symbol: String,
    group: String,
}

impl ResolvedAsset {
    fn new(ticker: &str, record: AssetRecord, type_hint: &str) -> Self {
        let name = record.name.clone().unwrap_or_else(|| capitalize(ticker));
        let symbol = record
            .symbol
            .clone()
            .unwrap_or_else(|| ticker.to_lowercase());
        let group = record
            .asset_type
            .as_deref()
            .unwrap_or(type_hint)
            .to_uppercase();
        Self {
            record,
            name,
            symbol,
            group,
        }
    }
}

impl ChartBuilder {
    /// Builder for the public chart-builder endpoint
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder for another chart-builder endpoint
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: url::normalize_base_url(base_url)?,
        })
    }

    /// Endpoint the encoded configuration is appended to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the chart for `command`, resolving tickers through `lookup`.
    ///
    /// Checks run in a fixed order (time period, granularity, metrics, assets)
    /// and the first failure is returned. Nothing is produced on failure.
    pub fn build<L: AssetLookup + ?Sized>(
        &self,
        command: &ParsedCommand,
        lookup: &L,
    ) -> Result<BuiltChart> {
        command.ensure_complete()?;
        let period: TimePeriod = command.time_period().parse()?;
        let granularity: Granularity = command.granularity().parse()?;
        let metrics = command
            .metrics()
            .iter()
            .map(|code| code.parse::<Metric>())
            .collect::<Result<Vec<_>>>()?;

        let assets = command
            .tickers()
            .iter()
            .map(|ticker| {
                assets::resolve(lookup, ticker)
                    .map(|record| ResolvedAsset::new(ticker, record, command.asset_type()))
                    .ok_or_else(|| ChartError::UnknownAsset(ticker.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let title = compose_title(command, &assets);
        let units = if command.is_percentage() {
            Units::Percentage
        } else {
            Units::Raw
        };

        let mut series = Vec::with_capacity(metrics.len() * assets.len());
        for (index, metric) in metrics.iter().enumerate() {
            for asset in &assets {
                series.push(series_entry(*metric, asset, index, units));
            }
        }

        let config = ChartConfig {
            title: title.clone(),
            description: String::new(),
            period: period.platform_id().to_string(),
            preview_url: String::new(),
            granularity: granularity.platform_id().to_string(),
            sma_period: "0".to_string(),
            series,
        };
        let url = url::encode(&self.base_url, &config)?;

        debug!(title = %title, series = config.series.len(), "Built chart configuration");
        Ok(BuiltChart { title, config, url })
    }
}

/// Build with the default endpoint
pub fn build<L: AssetLookup + ?Sized>(command: &ParsedCommand, lookup: &L) -> Result<BuiltChart> {
    ChartBuilder::new().build(command, lookup)
}

fn compose_title(command: &ParsedCommand, assets: &[ResolvedAsset]) -> String {
    let metrics = command
        .metrics()
        .iter()
        .map(|code| Metric::display_label(code))
        .collect::<Vec<_>>()
        .join(" vs ");
    let names = assets
        .iter()
        .map(|asset| asset.name.as_str())
        .collect::<Vec<_>>()
        .join("/");

    let mut title = format!(
        "{metrics} - {names} ({}, {})",
        TimePeriod::display_label(command.time_period()),
        Granularity::display_label(command.granularity()),
    );
    if command.is_percentage() {
        title.push_str(" (%)");
    }
    title
}

fn series_entry(metric: Metric, asset: &ResolvedAsset, index: usize, units: Units) -> SeriesEntry {
    let series_type = if index == 0 {
        SeriesType::Line
    } else {
        SeriesType::Column
    };

    SeriesEntry {
        asset: SeriesAsset {
            group: asset.group.clone(),
            artemis_id: asset.record.id.clone(),
            name: asset.name.clone(),
            symbol: asset.symbol.clone(),
            icon_url: String::new(),
        },
        metric: SeriesMetric {
            artemis_id: metric.platform_id().to_string(),
        },
        setting: SeriesSetting {
            series_type,
            display: DisplayMode::Timeline,
            scale: Scale::Linear,
            units,
            visible: true,
            show_in_legend: true,
            color: PALETTE[index % PALETTE.len()].to_string(),
            y_axis: index,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MockAssetLookup;
    use std::collections::HashMap;

    /// Resolves a fixed set of ids; symbols map onto the same records
    struct StubLookup {
        by_id: HashMap<String, AssetRecord>,
        by_symbol: HashMap<String, AssetRecord>,
    }

    impl StubLookup {
        fn new(records: Vec<AssetRecord>) -> Self {
            let mut by_id = HashMap::new();
            let mut by_symbol = HashMap::new();
            for record in records {
                if let Some(symbol) = &record.symbol {
                    by_symbol.insert(symbol.clone(), record.clone());
                }
                by_id.insert(record.id.clone(), record);
            }
            Self { by_id, by_symbol }
        }

        fn chains() -> Self {
            Self::new(vec![
                AssetRecord::new("solana").with_symbol("sol"),
                AssetRecord::new("ethereum").with_symbol("eth"),
                AssetRecord::new("bitcoin").with_symbol("btc"),
                AssetRecord::new("uniswap")
                    .with_name("Uniswap")
                    .with_symbol("uni")
                    .with_type("application"),
            ])
        }
    }

    impl AssetLookup for StubLookup {
        fn lookup_by_id(&self, id: &str) -> Option<AssetRecord> {
            self.by_id.get(id).cloned()
        }

        fn lookup_by_symbol(&self, symbol: &str) -> Option<AssetRecord> {
            self.by_symbol.get(&symbol.to_lowercase()).cloned()
        }
    }

    fn parse(text: &str) -> ParsedCommand {
        ParsedCommand::parse(text, false).unwrap()
    }

    fn command(metrics: &[&str], tickers: &[&str], period: &str, granularity: &str) -> ParsedCommand {
        ParsedCommand::new(
            metrics.iter().map(|m| (*m).to_string()).collect(),
            tickers.iter().map(|t| (*t).to_string()).collect(),
            "chain",
            period,
            granularity,
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_comparison_scenario() {
        let chart = build(&parse("price vs tvl solana ethereum 1w 1d"), &StubLookup::chains()).unwrap();

        assert_eq!(chart.title, "Price vs TVL - Solana/Ethereum (1 Week, Daily)");
        assert_eq!(chart.config.title, chart.title);
        assert_eq!(chart.config.period, "WEEKLY");
        assert_eq!(chart.config.granularity, "DAY");
        assert_eq!(chart.config.sma_period, "0");
        assert_eq!(chart.config.series.len(), 4);
        assert!(chart.url.starts_with(DEFAULT_BASE_URL));

        let first = &chart.config.series[0];
        assert_eq!(first.asset.group, "CHAIN");
        assert_eq!(first.asset.artemis_id, "solana");
        assert_eq!(first.asset.name, "Solana");
        assert_eq!(first.asset.symbol, "sol");
        assert_eq!(first.asset.icon_url, "");
    }

    #[test]
    fn test_series_are_metric_major() {
        let chart = build(
            &parse("price vs tvl vs fees solana ethereum 1m 1w"),
            &StubLookup::chains(),
        )
        .unwrap();

        let pairs: Vec<(&str, &str)> = chart
            .config
            .series
            .iter()
            .map(|s| (s.metric.artemis_id.as_str(), s.asset.artemis_id.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("PRICE", "solana"),
                ("PRICE", "ethereum"),
                ("TVL", "solana"),
                ("TVL", "ethereum"),
                ("FEES", "solana"),
                ("FEES", "ethereum"),
            ]
        );
    }

    #[test]
    fn test_styling_follows_metric_index() {
        let metrics = ["price", "volume", "tvl", "fees", "revenue", "mc", "txns"];
        let chart = build(&command(&metrics, &["solana"], "1y", "1w"), &StubLookup::chains()).unwrap();

        assert_eq!(chart.config.series.len(), metrics.len());
        for (index, entry) in chart.config.series.iter().enumerate() {
            let setting = &entry.setting;
            assert_eq!(setting.series_type == SeriesType::Line, index == 0);
            assert_eq!(setting.y_axis, index);
            assert_eq!(setting.color, PALETTE[index % 5]);
            assert_eq!(setting.units, Units::Raw);
            assert_eq!(setting.display, DisplayMode::Timeline);
            assert_eq!(setting.scale, Scale::Linear);
            assert!(setting.visible && setting.show_in_legend);
        }
    }

    #[test]
    fn test_percentage_flag() {
        let chart = build(&parse("fees vs revenue ethereum 6m 1w %"), &StubLookup::chains()).unwrap();

        assert_eq!(chart.title, "Fees vs Revenue - Ethereum (6 Months, Weekly) (%)");
        assert_eq!(chart.title.matches("(%)").count(), 1);
        assert!(
            chart
                .config
                .series
                .iter()
                .all(|s| s.setting.units == Units::Percentage)
        );
    }

    #[test]
    fn test_unknown_asset() {
        let err = build(&parse("price doesnotexist 1w 1d"), &StubLookup::chains()).unwrap_err();
        assert!(matches!(err, ChartError::UnknownAsset(ref ticker) if ticker == "doesnotexist"));
    }

    #[test]
    fn test_validation_order() {
        let lookup = StubLookup::chains();

        let err = build(&command(&["nope"], &["nowhere"], "2w", "5d"), &lookup).unwrap_err();
        assert!(matches!(err, ChartError::UnknownTimePeriod(ref c) if c == "2w"));

        let err = build(&command(&["nope"], &["nowhere"], "1w", "5d"), &lookup).unwrap_err();
        assert!(matches!(err, ChartError::UnknownGranularity(ref c) if c == "5d"));

        let err = build(&command(&["price", "nope"], &["nowhere"], "1w", "1d"), &lookup).unwrap_err();
        assert!(matches!(err, ChartError::UnknownMetric(ref c) if c == "nope"));

        let err = build(&command(&["price"], &["solana", "nowhere"], "1w", "1d"), &lookup).unwrap_err();
        assert!(matches!(err, ChartError::UnknownAsset(ref t) if t == "nowhere"));
    }

    #[test]
    fn test_every_vocabulary_code_builds() {
        let lookup = StubLookup::chains();

        for period in TimePeriod::ALL {
            let chart = build(&command(&["price"], &["solana"], period.code(), "1d"), &lookup).unwrap();
            assert_eq!(chart.config.period, period.platform_id());
            assert!(chart.title.contains(period.label()));
        }
        for granularity in Granularity::ALL {
            let chart = build(&command(&["price"], &["solana"], "1y", granularity.code()), &lookup).unwrap();
            assert_eq!(chart.config.granularity, granularity.platform_id());
        }
        for metric in Metric::ALL {
            let chart = build(&command(&[metric.code()], &["solana"], "1y", "1d"), &lookup).unwrap();
            assert_eq!(chart.config.series[0].metric.artemis_id, metric.platform_id());
            assert!(chart.title.starts_with(metric.label()));
        }
    }

    #[test]
    fn test_idempotent_url() {
        let lookup = StubLookup::chains();
        let cmd = parse("price vs tvl solana ethereum 1w 1d");
        let first = build(&cmd, &lookup).unwrap();
        let second = build(&cmd, &lookup).unwrap();
        assert_eq!(first.url, second.url);
        assert_eq!(first, second);
    }

    #[test]
    fn test_symbol_resolution_and_record_fields() {
        let chart = build(
            &parse("tvl uni SOL application 1y 1w"),
            &StubLookup::chains(),
        )
        .unwrap();

        let uni = &chart.config.series[0].asset;
        assert_eq!(uni.artemis_id, "uniswap");
        assert_eq!(uni.name, "Uniswap");
        assert_eq!(uni.group, "APPLICATION");

        // No record type: the command hint is used.
        let sol = &chart.config.series[1].asset;
        assert_eq!(sol.artemis_id, "solana");
        assert_eq!(sol.name, "Sol");
        assert_eq!(sol.symbol, "sol");
        assert_eq!(sol.group, "APPLICATION");
        assert_eq!(chart.title, "TVL - Uniswap/Sol (1 Year, Weekly)");
    }

    #[test]
    fn test_record_type_beats_hint_per_ticker() {
        let chart = build(&parse("tvl uniswap solana chain 1y 1w"), &StubLookup::chains()).unwrap();

        let groups: Vec<&str> = chart
            .config
            .series
            .iter()
            .map(|entry| entry.asset.group.as_str())
            .collect();
        assert_eq!(groups, ["APPLICATION", "CHAIN"]);
    }

    #[test]
    fn test_each_ticker_resolved_once() {
        let mut lookup = MockAssetLookup::new();
        lookup
            .expect_lookup_by_id()
            .times(2)
            .returning(|id| (id == "solana").then(|| AssetRecord::new(id)));
        lookup
            .expect_lookup_by_symbol()
            .times(1)
            .returning(|_| Some(AssetRecord::new("ethereum").with_symbol("eth")));

        let chart = build(&parse("price vs tvl vs fees solana eth 1w 1d"), &lookup).unwrap();
        assert_eq!(chart.config.series.len(), 6);
        assert_eq!(chart.config.series[1].asset.artemis_id, "ethereum");
    }

    #[test]
    fn test_custom_base_url() {
        let builder = ChartBuilder::with_base_url("http://localhost:8080/charts").unwrap();
        assert_eq!(builder.base_url(), "http://localhost:8080/charts/");

        let chart = builder
            .build(&parse("price solana 1w 1d"), &StubLookup::chains())
            .unwrap();
        assert!(chart.url.starts_with("http://localhost:8080/charts/%7B"));

        let (title, config, url) = chart.into_parts();
        assert_eq!(title, config.title);
        assert!(!url.is_empty());
    }
}
