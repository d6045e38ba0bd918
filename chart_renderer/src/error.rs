use std::path::PathBuf;

use snafu::{Backtrace, Snafu};

/// Everything that can go wrong between reading the CSV and writing the image.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RenderError {
    /// There is no CSV to plot yet.
    #[snafu(display("The data file {} does not exist.", path.display()))]
    MissingData { path: PathBuf },

    /// The CSV exists but holds no data rows.
    #[snafu(display("The data file {} contains no rows.", path.display()))]
    EmptyData { path: PathBuf },

    /// A required column is absent from the header.
    #[snafu(display("Column '{column}' is not present in {}.", path.display()))]
    Schema { column: String, path: PathBuf },

    /// A cell could not be converted.
    #[snafu(display("Row {row}: cannot parse {column} value '{value}'"))]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    #[snafu(display("Failed to read CSV {}: {source}", path.display()))]
    Csv {
        path: PathBuf,
        source: csv::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("I/O error on {}: {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// The plotting backend failed.
    #[snafu(display("Failed to draw chart: {message}"))]
    Draw { message: String },
}
