//! Closed vocabularies understood by the chart builder
//!
//! Every axis of a chart request (metric, time period, granularity) maps a
//! short user-facing code onto the identifier the Artemis chart builder
//! expects, plus a human readable label used in chart titles. The tables are
//! plain `const` data; lookups are case-insensitive on the raw code.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::ChartError;

/// Asset type hints accepted in a command
pub const ASSET_TYPES: [&str; 2] = ["chain", "application"];

/// Asset type hint used when the command does not carry one
pub const DEFAULT_ASSET_TYPE: &str = "chain";

/// Granularity code used when the command does not carry one
pub const DEFAULT_GRANULARITY: &str = "1d";

/// Literal connector between metrics (`price vs tvl`)
pub const METRIC_CONNECTOR: &str = "vs";

/// Literal marker requesting percentage units
pub const PERCENT_MARKER: &str = "%";

/// Whether `token` is one of the asset type hints
pub fn is_asset_type(token: &str) -> bool {
    ASSET_TYPES.iter().any(|t| t.eq_ignore_ascii_case(token))
}

/// Upper-case the first character and lower-case the rest
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $err:ident {
            $($variant:ident => ($code:literal, $id:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every member, in table order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Code as typed by users
            pub const fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            /// Identifier used by the chart platform
            pub const fn platform_id(self) -> &'static str {
                match self {
                    $(Self::$variant => $id),+
                }
            }

            /// Human readable label for titles
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Look a raw code up, ignoring case and surrounding whitespace
            pub fn lookup(code: &str) -> Option<Self> {
                let code = code.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|member| member.code().eq_ignore_ascii_case(code))
            }

            /// Whether `code` belongs to the vocabulary
            pub fn is_known(code: &str) -> bool {
                Self::lookup(code).is_some()
            }

            /// All codes joined for error messages
            pub fn codes() -> String {
                Self::ALL
                    .iter()
                    .map(|member| member.code())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.code())
            }
        }

        impl FromStr for $name {
            type Err = ChartError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::lookup(value).ok_or_else(|| ChartError::$err(value.trim().to_string()))
            }
        }
    };
}

vocabulary! {
    /// Quantitative series that can be charted
    Metric, UnknownMetric {
        Price => ("price", "PRICE", "Price"),
        Volume => ("volume", "VOLUME", "Volume"),
        Tvl => ("tvl", "TVL", "TVL"),
        Fees => ("fees", "FEES", "Fees"),
        Revenue => ("revenue", "REVENUE", "Revenue"),
        MarketCap => ("mc", "MC", "Market Cap"),
        Transactions => ("txns", "TXNS", "Transactions"),
        DailyActiveAddresses => ("daa", "DAA", "Daily Active Addresses"),
        DailyActiveUsers => ("dau", "DAU", "Daily Active Users"),
        FullyDilutedMarketCap => ("fdmc", "FDMC", "Fully Diluted Market Cap"),
        Borrows => ("borrows", "BORROWS", "Borrows"),
        Deposits => ("deposits", "DEPOSITS", "Deposits"),
    }
}

vocabulary! {
    /// Total time window of a chart
    TimePeriod, UnknownTimePeriod {
        OneWeek => ("1w", "WEEKLY", "1 Week"),
        MonthToDate => ("mtd", "MONTH_TO_DATE", "Month to Date"),
        OneMonth => ("1m", "MONTHLY", "1 Month"),
        ThreeMonths => ("3m", "THREE_MONTHS", "3 Months"),
        SixMonths => ("6m", "SIX_MONTHS", "6 Months"),
        YearToDate => ("ytd", "YEAR_TO_DATE", "Year to Date"),
        OneYear => ("1y", "ONE_YEAR", "1 Year"),
        All => ("all", "MAX", "All Time"),
    }
}

vocabulary! {
    /// Sampling interval of chart data points
    Granularity, UnknownGranularity {
        Day => ("1d", "DAY", "Daily"),
        Week => ("1w", "WEEK", "Weekly"),
        Month => ("1m", "MONTH", "Monthly"),
    }
}

impl Metric {
    /// Title label for a raw metric code.
    ///
    /// Codes missing from the label table fall back to the capitalized code
    /// instead of failing; validation happens separately via [`FromStr`].
    pub fn display_label(code: &str) -> String {
        Self::lookup(code).map_or_else(|| capitalize(code), |m| m.label().to_string())
    }
}

impl TimePeriod {
    /// Title label for a raw period code, or the code itself
    pub fn display_label(code: &str) -> String {
        Self::lookup(code).map_or_else(|| code.to_string(), |p| p.label().to_string())
    }
}

impl Granularity {
    /// Title label for a raw granularity code, or the code itself
    pub fn display_label(code: &str) -> String {
        Self::lookup(code).map_or_else(|| code.to_string(), |g| g.label().to_string())
    }
}
