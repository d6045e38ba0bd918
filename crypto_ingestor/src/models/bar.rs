//! One OHLCV bar as delivered by a provider, independent of wire format.

use chrono::{DateTime, Utc};

/// Prices are quote-currency amounts (USD for the `*/USD` pairs). Crypto
/// volume is fractional, hence `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Start of the bar interval, UTC.
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Absent when the provider does not report it.
    pub trade_count: Option<u64>,
    pub vwap: Option<f64>,
}

impl Bar {
    /// Fractional close-to-close change from `previous`, `None` if its close is zero.
    pub fn change_since(&self, previous: &Bar) -> Option<f64> {
        (previous.close != 0.0).then(|| (self.close - previous.close) / previous.close)
    }
}
