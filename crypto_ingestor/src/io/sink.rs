use std::path::PathBuf;

use snafu::{Backtrace, Snafu};

use crate::models::bar_series::BarSeries;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// The destination directory could not be created.
    #[snafu(display("Failed to create directory {}: {source}", path.display()))]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// Serializing or writing rows failed.
    #[snafu(display("Failed to write data to {}: {source}", path.display()))]
    Write {
        path: PathBuf,
        source: csv::Error,
        backtrace: Backtrace,
    },

    /// A generic I/O error, e.g. while flushing or swapping files.
    #[snafu(display("I/O error on {}: {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

pub trait DataSink {
    /// The type of output returned after a successful write operation.
    ///
    /// A file sink returns the path it wrote; other sinks may return a row count.
    type Output;

    /// Writes one `BarSeries` to the destination, replacing what was there.
    fn write(&self, series: &BarSeries) -> Result<Self::Output, SinkError>;
}
