//! Chart-builder configuration document
//!
//! Field order of the structs is the serialization order, so the encoded URL
//! is stable for equal values.

use serde::{Deserialize, Serialize};

/// Series rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeriesType {
    Line,
    Column,
}

/// How the x axis is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DisplayMode {
    Timeline,
}

/// Y axis scale. Only linear is supported by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Scale {
    Linear,
}

/// Units of the plotted values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Units {
    Raw,
    Percentage,
}

/// Asset half of a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesAsset {
    /// Asset group, e.g. `CHAIN`
    pub group: String,
    pub artemis_id: String,
    pub name: String,
    pub symbol: String,
    pub icon_url: String,
}

/// Metric half of a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesMetric {
    pub artemis_id: String,
}

/// Per-series display settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSetting {
    #[serde(rename = "type")]
    pub series_type: SeriesType,
    pub display: DisplayMode,
    pub scale: Scale,
    pub units: Units,
    pub visible: bool,
    pub show_in_legend: bool,
    pub color: String,
    pub y_axis: usize,
}

/// One plotted (metric, asset) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub asset: SeriesAsset,
    pub metric: SeriesMetric,
    pub setting: SeriesSetting,
}

/// Complete chart-builder document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub title: String,
    pub description: String,
    /// Platform period id, e.g. `WEEKLY`
    pub period: String,
    pub preview_url: String,
    /// Platform granularity id, e.g. `DAY`
    pub granularity: String,
    /// Smoothing period; always `"0"` (no smoothing)
    pub sma_period: String,
    /// Metric-major, ticker-minor
    pub series: Vec<SeriesEntry>,
}

impl ChartConfig {
    /// Serialize to compact JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialized_shape() {
        let config = ChartConfig {
            title: "Price - Solana (1 Week, Daily)".to_string(),
            description: String::new(),
            period: "WEEKLY".to_string(),
            preview_url: String::new(),
            granularity: "DAY".to_string(),
            sma_period: "0".to_string(),
            series: vec![SeriesEntry {
                asset: SeriesAsset {
                    group: "CHAIN".to_string(),
                    artemis_id: "solana".to_string(),
                    name: "Solana".to_string(),
                    symbol: "sol".to_string(),
                    icon_url: String::new(),
                },
                metric: SeriesMetric {
                    artemis_id: "PRICE".to_string(),
                },
                setting: SeriesSetting {
                    series_type: SeriesType::Line,
                    display: DisplayMode::Timeline,
                    scale: Scale::Linear,
                    units: Units::Raw,
                    visible: true,
                    show_in_legend: true,
                    color: "#8A88FF".to_string(),
                    y_axis: 0,
                },
            }],
        };

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Price - Solana (1 Week, Daily)",
                "description": "",
                "period": "WEEKLY",
                "previewUrl": "",
                "granularity": "DAY",
                "smaPeriod": "0",
                "series": [{
                    "asset": {
                        "group": "CHAIN",
                        "artemisId": "solana",
                        "name": "Solana",
                        "symbol": "sol",
                        "iconUrl": ""
                    },
                    "metric": {"artemisId": "PRICE"},
                    "setting": {
                        "type": "LINE",
                        "display": "TIMELINE",
                        "scale": "LINEAR",
                        "units": "RAW",
                        "visible": true,
                        "showInLegend": true,
                        "color": "#8A88FF",
                        "yAxis": 0
                    }
                }]
            })
        );

        let json = config.to_json().unwrap();
        assert!(json.starts_with(r#"{"title":"#));
    }
}
