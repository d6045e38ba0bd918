//! Row-oriented CSV persistence of a [`BarSeries`].
//!
//! Every write is a full replacement of the target file. Rows go to a sibling
//! `.tmp` file first; only once that is complete is the old file deleted and
//! the new one moved into place.

use std::{
    ffi::OsString,
    fs::{self, File},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use snafu::ResultExt;
use tracing::{debug, info};

use crate::{
    io::sink::{CreateDirSnafu, DataSink, IoSnafu, SinkError, WriteSnafu},
    models::bar_series::BarSeries,
};

/// Header of every file written by [`CsvSink`], in column order.
pub const CSV_COLUMNS: [&str; 10] = [
    "timestamp",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "trade_count",
    "vwap",
    "pct_change",
    "symbol",
];

#[derive(Serialize)]
struct CsvRow<'a> {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    trade_count: Option<u64>,
    vwap: Option<f64>,
    pct_change: Option<f64>,
    symbol: &'a str,
}

/// Writes bar series to one fixed CSV path.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("bars.csv"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_rows(&self, staging: &Path, series: &BarSeries) -> Result<(), SinkError> {
        let file = File::create(staging).context(IoSnafu { path: staging })?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer
            .write_record(CSV_COLUMNS)
            .context(WriteSnafu { path: staging })?;

        for (bar, pct_change) in series.bars.iter().zip(series.pct_changes()) {
            writer
                .serialize(CsvRow {
                    timestamp: bar.timestamp,
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    volume: bar.volume,
                    trade_count: bar.trade_count,
                    vwap: bar.vwap,
                    pct_change,
                    symbol: &series.symbol,
                })
                .context(WriteSnafu { path: staging })?;
        }

        writer.flush().context(IoSnafu { path: staging })
    }
}

impl DataSink for CsvSink {
    type Output = PathBuf;

    fn write(&self, series: &BarSeries) -> Result<PathBuf, SinkError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).context(CreateDirSnafu { path: dir })?;
        }

        let staging = self.staging_path();
        if let Err(e) = self.write_rows(&staging, series) {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }

        if self.path.exists() {
            debug!(path = %self.path.display(), "removing previous CSV");
            fs::remove_file(&self.path).context(IoSnafu { path: &self.path })?;
        }
        fs::rename(&staging, &self.path).context(IoSnafu { path: &self.path })?;

        info!(
            path = %self.path.display(),
            asset = %series.symbol,
            rows = series.len(),
            "persisted bars"
        );
        Ok(self.path.clone())
    }
}

/// Replaces the file at `path` with the contents of `series`.
pub fn persist(series: &BarSeries, path: impl Into<PathBuf>) -> Result<PathBuf, SinkError> {
    CsvSink::new(path).write(series)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::models::{bar::Bar, timeframe::TimeFrame};

    fn series(symbol: &str, closes: &[f64]) -> BarSeries {
        BarSeries {
            symbol: symbol.to_string(),
            timeframe: TimeFrame::day(),
            bars: closes
                .iter()
                .enumerate()
                .map(|(i, &close)| Bar {
                    timestamp: Utc.with_ymd_and_hms(2024, 1, 1 + i as u32, 0, 0, 0).unwrap(),
                    open: close - 1.0,
                    high: close + 2.0,
                    low: close - 2.0,
                    close,
                    volume: 3.5,
                    trade_count: Some(7),
                    vwap: None,
                })
                .collect(),
        }
    }

    #[test]
    fn writes_header_and_one_row_per_bar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("crypto_data.csv");

        let written = persist(&series("BTC/USD", &[100.0, 110.0]), &path).unwrap();
        assert_eq!(written, path);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "timestamp,open,high,low,close,volume,trade_count,vwap,pct_change,symbol"
        );
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "2024-01-01T00:00:00Z,99.0,102.0,98.0,100.0,3.5,7,,,BTC/USD");
        assert!(lines[2].starts_with("2024-01-02T00:00:00Z,109.0,112.0,108.0,110.0,3.5,7,,0.1"));
    }

    #[test]
    fn second_write_fully_replaces_the_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crypto_data.csv");

        persist(&series("BTC/USD", &[1.0, 2.0, 3.0, 4.0]), &path).unwrap();
        persist(&series("ETH/USD", &[10.0]), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(!content.contains("BTC/USD"));
        assert!(content.contains("ETH/USD"));
        assert!(!dir.path().join("crypto_data.csv.tmp").exists());
    }

    #[test]
    fn empty_series_still_gets_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crypto_data.csv");

        persist(&BarSeries::empty("SOL/USD", TimeFrame::day()), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn failed_write_leaves_previous_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crypto_data.csv");
        persist(&series("BTC/USD", &[1.0]), &path).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        // A directory squatting on the staging path makes File::create fail.
        fs::create_dir(dir.path().join("crypto_data.csv.tmp")).unwrap();
        let err = persist(&series("ETH/USD", &[2.0]), &path).unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }
}
