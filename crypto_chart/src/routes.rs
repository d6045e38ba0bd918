//! HTTP surface: the form, the chart page, the asset listing and the image files.

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Query, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use chart_renderer::RenderError;
use chrono::Utc;
use crypto_ingestor::{fetch::FetchError, providers::alpaca_rest::AlpacaCredentials};
use serde::Deserialize;
use serde_json::json;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info_span, warn};

use crate::{
    config::AppConfig,
    pages::{index_page, plot_page, result_page},
    pipeline::{
        FetchForm, PipelineError, list_crypto_symbols, non_blank, render_chart, run_fetch_pipeline,
    },
};

#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

#[derive(Deserialize)]
pub struct PlotQuery {
    asset: Option<String>,
}

#[derive(Deserialize)]
pub struct AssetsQuery {
    api_key: Option<String>,
    api_secret: Option<String>,
}

pub fn router(state: AppState) -> Router {
    let static_dir = state.config.storage.static_dir.clone();

    Router::new()
        .route("/", get(index).post(submit))
        .route("/plot", get(plot))
        .route("/assets", get(assets))
        .nest_service("/static", ServeDir::new(static_dir))
        // Span carries the path only: query strings may hold credentials.
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .with_state(state)
}

pub fn pipeline_status(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::MissingField(_) => StatusCode::BAD_REQUEST,
        PipelineError::Fetch(FetchError::InvalidDateFormat { .. }) => StatusCode::BAD_REQUEST,
        PipelineError::Fetch(FetchError::Fetch { .. }) => StatusCode::BAD_GATEWAY,
        PipelineError::Persist(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn render_status(error: &RenderError) -> StatusCode {
    match error {
        RenderError::MissingData { .. } => StatusCode::NOT_FOUND,
        RenderError::EmptyData { .. } | RenderError::Schema { .. } | RenderError::Parse { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn failure_page(status: StatusCode, message: &str) -> Response {
    (status, Html(result_page(message))).into_response()
}

fn error_json(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(index_page(&state.config.alpaca.default_asset))
}

async fn submit(State(state): State<AppState>, Form(form): Form<FetchForm>) -> Response {
    let outcome = match run_fetch_pipeline(&state.config, form).await {
        Ok(outcome) => outcome,
        Err(e) => return failure_page(pipeline_status(&e), &e.to_string()),
    };

    match serde_urlencoded::to_string([("asset", outcome.asset.as_str())]) {
        Ok(query) => Redirect::to(&format!("/plot?{query}")).into_response(),
        Err(e) => failure_page(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

async fn plot(State(state): State<AppState>, Query(query): Query<PlotQuery>) -> Response {
    let Some(asset) = non_blank(query.asset) else {
        return (StatusCode::BAD_REQUEST, "Asset not specified").into_response();
    };

    match render_chart(&state.config, &asset) {
        Ok(_) => {
            // The file name never changes, so bust browser caches per render.
            let url = format!(
                "{}?v={}",
                state.config.plot_url(),
                Utc::now().timestamp_millis()
            );
            Html(plot_page(&asset, &url)).into_response()
        }
        Err(e) => failure_page(render_status(&e), &e.to_string()),
    }
}

async fn assets(State(state): State<AppState>, Query(query): Query<AssetsQuery>) -> Response {
    let (Some(api_key), Some(api_secret)) = (non_blank(query.api_key), non_blank(query.api_secret))
    else {
        return error_json(StatusCode::BAD_REQUEST, "API key and secret are required");
    };

    let credentials = AlpacaCredentials::new(api_key, api_secret);
    match list_crypto_symbols(&state.config, &credentials).await {
        Ok(symbols) => Json(json!({ "symbols": symbols })).into_response(),
        Err(e) => {
            warn!(error = %e, "listing assets failed");
            error_json(StatusCode::BAD_GATEWAY, &format!("Error fetching assets: {e}"))
        }
    }
}
