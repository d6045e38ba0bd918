//! Daily bar fetching for one crypto pair over a calendar date range.
//!
//! Dates are parsed before the provider is touched, so a malformed date never
//! costs a network round trip.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::{
    models::{bar_series::BarSeries, request_params::BarsRequestParams, timeframe::TimeFrame},
    providers::{DataProvider, ProviderError},
};

/// Textual format accepted for start and end dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum FetchError {
    /// A start or end date did not match [`DATE_FORMAT`].
    #[snafu(display("Invalid date format."))]
    InvalidDateFormat {
        input: String,
        source: chrono::ParseError,
    },

    /// The provider could not deliver the bars.
    #[snafu(display("Error fetching data: {source}"))]
    Fetch { source: ProviderError },
}

/// Inclusive UTC instants covering whole calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// From midnight of `start` to the last second of `end`.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        let start = start.and_time(NaiveTime::MIN).and_utc();
        let end = end.and_time(NaiveTime::MIN).and_utc() + TimeDelta::days(1)
            - TimeDelta::seconds(1);
        Self { start, end }
    }
}

fn parse_date(input: &str) -> Result<NaiveDate, FetchError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).context(InvalidDateFormatSnafu { input })
}

/// Parses both ends of a range. Ordering between them is left to the API.
pub fn parse_date_range(start_date: &str, end_date: &str) -> Result<DateRange, FetchError> {
    let start = parse_date(start_date)?;
    let end = parse_date(end_date)?;
    Ok(DateRange::from_dates(start, end))
}

/// Fetches the daily bars of `symbol` over `range` with a single provider call.
///
/// If the provider has nothing for `symbol`, an empty series is returned.
pub async fn fetch_daily_bars(
    provider: &dyn DataProvider,
    range: DateRange,
    symbol: &str,
) -> Result<BarSeries, FetchError> {
    let params = BarsRequestParams::crypto(
        vec![symbol.to_string()],
        TimeFrame::day(),
        range.start,
        range.end,
    );
    debug!(asset = %symbol, start = %range.start, end = %range.end, "requesting daily bars");

    let series = provider.fetch_bars(params).await.context(FetchSnafu)?;
    let series = series
        .into_iter()
        .find(|s| s.symbol == symbol)
        .unwrap_or_else(|| BarSeries::empty(symbol, TimeFrame::day()));

    info!(asset = %symbol, bars = series.len(), "fetched daily bars");
    Ok(series)
}

/// Parses the textual dates, then fetches. See [`fetch_daily_bars`].
pub async fn fetch(
    provider: &dyn DataProvider,
    start_date: &str,
    end_date: &str,
    symbol: &str,
) -> Result<BarSeries, FetchError> {
    let range = parse_date_range(start_date, end_date)?;
    fetch_daily_bars(provider, range, symbol).await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::{
        models::bar::Bar,
        providers::{ApiSnafu, DataProvider},
    };

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DataProvider for CountingProvider {
        async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let bar = Bar {
                timestamp: params.start,
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: 1.5,
                volume: 10.0,
                trade_count: None,
                vwap: None,
            };
            Ok(vec![
                BarSeries {
                    symbol: "OTHER/USD".to_string(),
                    timeframe: params.timeframe.clone(),
                    bars: vec![],
                },
                BarSeries {
                    symbol: params.symbols[0].clone(),
                    timeframe: params.timeframe,
                    bars: vec![bar],
                },
            ])
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl DataProvider for FailingProvider {
        async fn fetch_bars(&self, _params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
            ApiSnafu {
                status: 403u16,
                message: "forbidden",
            }
            .fail()
        }
    }

    #[test]
    fn range_covers_whole_days() {
        let range = parse_date_range("2024-01-01", "2024-01-05").unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(range.end, Utc.with_ymd_and_hms(2024, 1, 5, 23, 59, 59).unwrap());
    }

    #[test]
    fn reversed_range_is_not_rejected_locally() {
        assert!(parse_date_range("2024-02-01", "2024-01-01").is_ok());
    }

    #[tokio::test]
    async fn malformed_dates_never_reach_the_provider() {
        let provider = CountingProvider::default();
        for (start, end) in [
            ("2024/01/01", "2024-01-05"),
            ("2024-01-01", "05-01-2024"),
            ("", "2024-01-05"),
            ("2024-13-01", "2024-01-05"),
        ] {
            let err = fetch(&provider, start, end, "BTC/USD").await.unwrap_err();
            assert!(matches!(err, FetchError::InvalidDateFormat { .. }));
            assert_eq!(err.to_string(), "Invalid date format.");
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn picks_the_requested_symbol() {
        let provider = CountingProvider::default();
        let series = fetch(&provider, "2024-01-01", "2024-01-02", "ETH/USD")
            .await
            .unwrap();
        assert_eq!(series.symbol, "ETH/USD");
        assert_eq!(series.len(), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn provider_failure_carries_the_message() {
        let err = fetch(&FailingProvider, "2024-01-01", "2024-01-02", "BTC/USD")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Fetch { .. }));
        assert_eq!(
            err.to_string(),
            "Error fetching data: API error (403): forbidden"
        );
    }
}
