//! Chart command parsing
//!
//! Grammar: `<metric> [vs <metric>]* <ticker>+ [<asset type>] <time period> [<granularity>] [%]`
//!
//! The parser only classifies tokens. Metric, period and granularity codes in
//! their structural positions are passed through to the builder, which owns
//! the vocabulary checks; tickers are never validated here.

use crate::error::{ChartError, Result};
use crate::vocab::{
    self, DEFAULT_ASSET_TYPE, DEFAULT_GRANULARITY, Granularity, METRIC_CONNECTOR, Metric,
    PERCENT_MARKER, TimePeriod,
};

/// Minimum number of tokens in a chart command
pub const MIN_TOKENS: usize = 4;

/// Prefix group-chat commands must start with
pub const GROUP_PREFIX: &str = "=art";

const MISSING_ASSET: &str = "Missing asset: expected at least one ticker";

/// Structured chart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    metrics: Vec<String>,
    tickers: Vec<String>,
    asset_type: String,
    time_period: String,
    granularity: String,
    is_percentage: bool,
}

impl ParsedCommand {
    /// Assemble a command from already classified parts.
    ///
    /// Fails with [`ChartError::InvalidCommand`] when `metrics` or `tickers`
    /// is empty.
    pub fn new(
        metrics: Vec<String>,
        tickers: Vec<String>,
        asset_type: impl Into<String>,
        time_period: impl Into<String>,
        granularity: impl Into<String>,
        is_percentage: bool,
    ) -> Result<Self> {
        let command = Self {
            metrics,
            tickers,
            asset_type: asset_type.into(),
            time_period: time_period.into(),
            granularity: granularity.into(),
            is_percentage,
        };
        command.ensure_complete()?;
        Ok(command)
    }

    /// At least one metric and one ticker
    pub(crate) fn ensure_complete(&self) -> Result<()> {
        if self.metrics.is_empty() {
            return Err(ChartError::InvalidCommand(
                "Missing metric: expected at least one metric".to_string(),
            ));
        }
        if self.tickers.is_empty() {
            return Err(ChartError::InvalidCommand(MISSING_ASSET.to_string()));
        }
        Ok(())
    }

    /// Parse raw command text.
    ///
    /// `is_group` only changes the format hint in error messages; callers strip
    /// the group prefix themselves.
    pub fn parse(text: &str, is_group: bool) -> Result<Self> {
        let invalid = |message: &str| ChartError::InvalidCommand(with_format_hint(message, is_group));
        let too_short = || {
            invalid("Command must have at least 4 parts: <metric> <asset> <time_period> <granularity>")
        };

        let mut tokens = tokenize(text);
        if tokens.len() < MIN_TOKENS {
            return Err(too_short());
        }

        let is_percentage = tokens.last().is_some_and(|t| t == PERCENT_MARKER);
        if is_percentage {
            tokens.pop();
        }

        let (metrics, consumed) = split_metrics(&tokens)
            .ok_or_else(|| invalid("Expected a metric after 'vs'"))?;
        let rest = &tokens[consumed..];

        // Period and granularity are read from the tail. Known codes win; when
        // the tail holds no known period the last two tokens are taken
        // positionally so the builder can name the unknown code.
        let (time_period, granularity, used) = match rest {
            [.., period, granularity]
                if Granularity::is_known(granularity) && TimePeriod::is_known(period) =>
            {
                (period.to_lowercase(), granularity.to_lowercase(), 2)
            }
            [.., period] if TimePeriod::is_known(period) => {
                (period.to_lowercase(), DEFAULT_GRANULARITY.to_string(), 1)
            }
            [_, .., period, granularity] => (period.to_lowercase(), granularity.to_lowercase(), 2),
            _ => {
                return Err(invalid(
                    "Missing time period or granularity: expected <asset> <time_period> [granularity] after the metrics",
                ));
            }
        };
        let rest = &rest[..rest.len() - used];

        let (asset_type, rest) = match rest {
            [tickers @ .., hint] if !tickers.is_empty() && vocab::is_asset_type(hint) => {
                (hint.to_lowercase(), tickers)
            }
            _ => (DEFAULT_ASSET_TYPE.to_string(), rest),
        };

        if rest.is_empty() {
            return Err(invalid(MISSING_ASSET));
        }

        Ok(Self {
            metrics,
            tickers: rest.to_vec(),
            asset_type,
            time_period,
            granularity,
            is_percentage,
        })
    }

    /// Requested metric codes, in display order
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Ticker tokens, verbatim
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Asset type hint, used when a resolved asset carries no type
    pub fn asset_type(&self) -> &str {
        &self.asset_type
    }

    /// Time period code
    pub fn time_period(&self) -> &str {
        &self.time_period
    }

    /// Granularity code
    pub fn granularity(&self) -> &str {
        &self.granularity
    }

    /// Whether values are charted as percentages
    pub fn is_percentage(&self) -> bool {
        self.is_percentage
    }
}

/// Split on commas, then whitespace
fn tokenize(text: &str) -> Vec<String> {
    text.split(',')
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

/// Leading `<metric> [vs <metric>]*` run; returns the metrics and tokens consumed
fn split_metrics(tokens: &[String]) -> Option<(Vec<String>, usize)> {
    let mut metrics = vec![tokens.first()?.to_lowercase()];
    let mut index = 1;
    while tokens.get(index).is_some_and(|t| is_connector(t)) {
        let metric = tokens.get(index + 1).filter(|t| !is_connector(t))?;
        metrics.push(metric.to_lowercase());
        index += 2;
    }
    Some((metrics, index))
}

fn is_connector(token: &str) -> bool {
    token.eq_ignore_ascii_case(METRIC_CONNECTOR)
}

/// Whether `text` opens with a known metric code
pub fn starts_with_metric(text: &str) -> bool {
    tokenize(text).first().is_some_and(|t| Metric::is_known(t))
}

/// Expected command format, with the group prefix when relevant
pub fn format_hint(is_group: bool) -> String {
    let prefix = if is_group {
        format!("{GROUP_PREFIX} ")
    } else {
        String::new()
    };
    format!(
        "Format: {prefix}<metric> [vs <metric>] <asset> <time_period> <granularity> [%]\n\
         Example: {prefix}price vs tvl solana 1w 1d"
    )
}

fn with_format_hint(message: &str, is_group: bool) -> String {
    format!("{message}\n\n{}", format_hint(is_group))
}
