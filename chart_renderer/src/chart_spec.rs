//! Extraction of the (date, close) sequences a chart is drawn from.

use std::{
    fs::File,
    io::ErrorKind,
    path::Path,
};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use csv::StringRecord;
use snafu::ResultExt;

use crate::error::{
    CsvSnafu, EmptyDataSnafu, IoSnafu, MissingDataSnafu, ParseSnafu, RenderError, SchemaSnafu,
};

pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const CLOSE_COLUMN: &str = "close";

/// Parallel sequences of instants and closing prices, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub dates: Vec<DateTime<Utc>>,
    pub closes: Vec<f64>,
}

impl ChartSpec {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.dates.iter().copied().zip(self.closes.iter().copied())
    }

    /// Earliest and latest instant; a single instant is widened by a day on
    /// each side so the axis is never degenerate.
    pub fn x_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let min = *self.dates.iter().min()?;
        let max = *self.dates.iter().max()?;
        if min == max {
            let day = chrono::TimeDelta::days(1);
            Some((min - day, max + day))
        } else {
            Some((min, max))
        }
    }

    /// Lowest and highest close with 5% headroom on both sides.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        if self.closes.is_empty() {
            return None;
        }
        let min = self.closes.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let pad = if max > min {
            (max - min) * 0.05
        } else {
            min.abs().max(1.0) * 0.05
        };
        Some((min - pad, max + pad))
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS+00:00`, naive `YYYY-MM-DD HH:MM:SS`
/// (read as UTC) and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

fn column_index(headers: &StringRecord, column: &str, path: &Path) -> Result<usize, RenderError> {
    match headers.iter().position(|h| h.trim() == column) {
        Some(idx) => Ok(idx),
        None => SchemaSnafu { column, path }.fail(),
    }
}

/// Reads `path` into a [`ChartSpec`], keeping rows in file order.
pub fn load_chart_spec(path: &Path) -> Result<ChartSpec, RenderError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return MissingDataSnafu { path }.fail(),
        Err(e) => return Err(e).context(IoSnafu { path }),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(file);
    let headers = reader.headers().context(CsvSnafu { path })?.clone();
    if headers.is_empty() {
        return EmptyDataSnafu { path }.fail();
    }
    let ts_idx = column_index(&headers, TIMESTAMP_COLUMN, path)?;
    let close_idx = column_index(&headers, CLOSE_COLUMN, path)?;

    let mut spec = ChartSpec {
        dates: Vec::new(),
        closes: Vec::new(),
    };
    for (i, record) in reader.records().enumerate() {
        let record = record.context(CsvSnafu { path })?;
        let row = i + 1;

        let raw_ts = record.get(ts_idx).unwrap_or_default();
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| {
            ParseSnafu {
                row,
                column: TIMESTAMP_COLUMN,
                value: raw_ts,
            }
            .build()
        })?;

        let raw_close = record.get(close_idx).unwrap_or_default();
        let close = raw_close
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|c| c.is_finite())
            .ok_or_else(|| {
                ParseSnafu {
                    row,
                    column: CLOSE_COLUMN,
                    value: raw_close,
                }
                .build()
            })?;

        spec.dates.push(timestamp);
        spec.closes.push(close);
    }

    if spec.is_empty() {
        return EmptyDataSnafu { path }.fail();
    }
    Ok(spec)
}
