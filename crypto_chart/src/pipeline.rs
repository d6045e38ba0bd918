//! The fetch pipeline behind a form submission or the `fetch` command.
//!
//! A run moves through `Idle → Validating → Fetching → Persisting → Done`.
//! Any of the three working stages can end in failure, and the failure keeps
//! the stage it happened in so callers can map it to a status code.

use std::{fmt, path::PathBuf};

use chart_renderer::{ChartRenderer, RenderError};
use crypto_ingestor::{
    fetch::{DateRange, FetchError, FetchSnafu, fetch_daily_bars, parse_date_range},
    io::{csv_sink::CsvSink, sink::DataSink, sink::SinkError},
    providers::{
        DataProvider, InitSnafu, ProviderError,
        alpaca_rest::{AlpacaCredentials, AlpacaProvider, AlpacaTradingClient},
    },
};
use serde::Deserialize;
use snafu::ResultExt;
use thiserror::Error;
use tracing::{Span, debug, field, info, instrument, warn};

use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Validating,
    Fetching,
    Persisting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Validating => "validating",
            Stage::Fetching => "fetching",
            Stage::Persisting => "persisting",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Invalid dates as well as provider failures.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Error saving data: {0}")]
    Persist(#[from] SinkError),
}

impl PipelineError {
    /// The stage the run was in when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::MissingField(_) => Stage::Validating,
            PipelineError::Fetch(FetchError::InvalidDateFormat { .. }) => Stage::Validating,
            PipelineError::Fetch(FetchError::Fetch { .. }) => Stage::Fetching,
            PipelineError::Persist(_) => Stage::Persisting,
        }
    }
}

/// Raw submission as it arrives from the form or the command line.
///
/// No `Debug` impl: it carries the API secret in the clear.
#[derive(Default, Deserialize)]
pub struct FetchForm {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub asset: Option<String>,
}

/// A submission that passed validation.
#[derive(Debug)]
pub struct FetchRequest {
    pub credentials: AlpacaCredentials,
    pub range: DateRange,
    pub asset: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub asset: String,
    pub csv_path: PathBuf,
    pub rows: usize,
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &'static str) -> Result<String, PipelineError> {
    non_blank(value).ok_or(PipelineError::MissingField(name))
}

/// Checks that every required field is present and both dates parse.
pub fn validate(form: FetchForm, default_asset: &str) -> Result<FetchRequest, PipelineError> {
    let api_key = required(form.api_key, "api_key")?;
    let api_secret = required(form.api_secret, "api_secret")?;
    let start_date = required(form.start_date, "start_date")?;
    let end_date = required(form.end_date, "end_date")?;
    let range = parse_date_range(&start_date, &end_date)?;
    let asset = non_blank(form.asset).unwrap_or_else(|| default_asset.to_string());

    Ok(FetchRequest {
        credentials: AlpacaCredentials::new(api_key, api_secret),
        range,
        asset,
    })
}

fn enter(stage: Stage) {
    debug!(%stage, "pipeline stage");
}

/// Runs the `Fetching` and `Persisting` stages against any provider.
pub async fn fetch_and_persist(
    provider: &dyn DataProvider,
    sink: &CsvSink,
    request: &FetchRequest,
) -> Result<FetchOutcome, PipelineError> {
    enter(Stage::Fetching);
    let series = fetch_daily_bars(provider, request.range, &request.asset).await?;

    enter(Stage::Persisting);
    let csv_path = sink.write(&series)?;

    enter(Stage::Done);
    Ok(FetchOutcome {
        asset: request.asset.clone(),
        csv_path,
        rows: series.len(),
    })
}

async fn run_stages(config: &AppConfig, form: FetchForm) -> Result<FetchOutcome, PipelineError> {
    enter(Stage::Validating);
    let request = validate(form, &config.alpaca.default_asset)?;
    Span::current().record("asset", field::display(&request.asset));

    let provider = AlpacaProvider::with_base_url(&request.credentials, &config.alpaca.data_url)
        .context(InitSnafu)
        .context(FetchSnafu)?;
    fetch_and_persist(&provider, &CsvSink::new(config.csv_path()), &request).await
}

/// Validates `form`, fetches daily bars from Alpaca and replaces the stored CSV.
#[instrument(name = "fetch_pipeline", skip_all, fields(asset = field::Empty))]
pub async fn run_fetch_pipeline(
    config: &AppConfig,
    form: FetchForm,
) -> Result<FetchOutcome, PipelineError> {
    enter(Stage::Idle);
    let result = run_stages(config, form).await;

    match &result {
        Ok(outcome) => info!(
            rows = outcome.rows,
            path = %outcome.csv_path.display(),
            "fetch pipeline done"
        ),
        Err(e) => warn!(stage = %e.stage(), error = %e, "fetch pipeline failed"),
    }
    result
}

/// Renders the stored CSV into the configured image file.
pub fn render_chart(config: &AppConfig, asset: &str) -> Result<PathBuf, RenderError> {
    let result = ChartRenderer::new(config.plot_path()).render(&config.csv_path(), asset);
    if let Err(e) = &result {
        warn!(asset = %asset, error = %e, "chart rendering failed");
    }
    result
}

/// Crypto symbols visible to the given account, in API order.
pub async fn list_crypto_symbols(
    config: &AppConfig,
    credentials: &AlpacaCredentials,
) -> Result<Vec<String>, ProviderError> {
    let client = AlpacaTradingClient::with_base_url(credentials, &config.alpaca.trading_url)
        .context(InitSnafu)?;
    client.crypto_symbols().await
}
