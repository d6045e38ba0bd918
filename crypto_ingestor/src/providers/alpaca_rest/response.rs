use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::models::bar::Bar;

#[derive(Deserialize, Debug)]
pub struct AlpacaBar {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v")]
    pub volume: f64,
    #[serde(rename = "n", default)]
    pub trade_count: Option<u64>,
    #[serde(rename = "vw", default)]
    pub vwap: Option<f64>,
}

impl From<AlpacaBar> for Bar {
    fn from(ab: AlpacaBar) -> Self {
        Bar {
            timestamp: ab.timestamp,
            open: ab.open,
            high: ab.high,
            low: ab.low,
            close: ab.close,
            volume: ab.volume,
            trade_count: ab.trade_count,
            vwap: ab.vwap,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AlpacaResponse {
    #[serde(default)]
    pub bars: IndexMap<String, Vec<AlpacaBar>>,
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_crypto_bars_page() {
        let body = r#"{
            "bars": {
                "BTC/USD": [
                    {"c": 42000.5, "h": 42500.0, "l": 41000.0, "n": 1200, "o": 41500.0,
                     "t": "2024-01-01T06:00:00Z", "v": 12.5, "vw": 41900.1}
                ]
            },
            "next_page_token": "abc"
        }"#;
        let mut response: AlpacaResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.next_page_token.as_deref(), Some("abc"));
        let bar: Bar = response.bars.swap_remove("BTC/USD").unwrap().remove(0).into();
        assert_eq!(bar.close, 42000.5);
        assert_eq!(bar.trade_count, Some(1200));
        assert_eq!(bar.timestamp.to_rfc3339(), "2024-01-01T06:00:00+00:00");
    }

    #[test]
    fn missing_optional_fields_are_none() {
        let body = r#"{"bars": {"ETH/USD": [
            {"c": 1.0, "h": 1.0, "l": 1.0, "o": 1.0, "t": "2024-01-01T00:00:00Z", "v": 0.0}
        ]}, "next_page_token": null}"#;
        let response: AlpacaResponse = serde_json::from_str(body).unwrap();
        let bar = &response.bars["ETH/USD"][0];
        assert_eq!(bar.trade_count, None);
        assert_eq!(bar.vwap, None);
    }

    #[test]
    fn empty_bars_map_is_tolerated() {
        let response: AlpacaResponse =
            serde_json::from_str(r#"{"bars": {}, "next_page_token": null}"#).unwrap();
        assert!(response.bars.is_empty());
    }
}
