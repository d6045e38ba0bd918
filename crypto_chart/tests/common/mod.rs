#![allow(dead_code)]

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use crypto_chart::config::AppConfig;
use serde_json::json;
use tempfile::TempDir;

pub const KEY: &str = "PKTEST";
pub const SECRET: &str = "s3cr3t";
pub const ETH_CLOSES: [f64; 5] = [2352.5, 2355.0, 2209.75, 2268.25, 2291.0];

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("APCA-API-KEY-ID").and_then(|v| v.to_str().ok()) == Some(KEY)
        && headers.get("APCA-API-SECRET-KEY").and_then(|v| v.to_str().ok()) == Some(SECRET)
}

async fn crypto_bars(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return (StatusCode::FORBIDDEN, Json(json!({"message": "forbidden."}))).into_response();
    }
    let symbol = q.get("symbols").cloned().unwrap_or_default();
    let bars: Vec<_> = ETH_CLOSES
        .iter()
        .enumerate()
        .map(|(i, close)| {
            json!({
                "t": format!("2024-01-{:02}T00:00:00Z", i + 1),
                "o": close - 10.0, "h": close + 15.0, "l": close - 20.0, "c": close,
                "v": 150.5, "n": 900, "vw": close - 1.0
            })
        })
        .collect();
    Json(json!({ "bars": { symbol: bars }, "next_page_token": null })).into_response()
}

async fn assets(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
    }
    Json(json!([
        {"symbol": "BTC/USD", "class": "crypto", "name": "Bitcoin", "tradable": true},
        {"symbol": "MSFT", "class": "us_equity", "name": "Microsoft", "tradable": true},
        {"symbol": "ETH/USD", "class": "crypto", "name": "Ether", "tradable": true}
    ]))
    .into_response()
}

/// Serves canned Alpaca data and trading endpoints on an ephemeral port.
pub async fn spawn_mock_alpaca() -> String {
    let app = Router::new()
        .route("/v1beta3/crypto/us/bars", get(crypto_bars))
        .route("/v2/assets", get(assets));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub struct TestApp {
    _dir: TempDir, // keep alive for the life of the test
    pub config: AppConfig,
}

/// Config with storage under a fresh temp dir and both Alpaca hosts pointing
/// at the mock.
pub async fn setup_app() -> TestApp {
    let dir = TempDir::new().expect("tempdir");
    let base = spawn_mock_alpaca().await;

    let mut config = AppConfig::default();
    config.storage.data_dir = dir.path().join("data");
    config.storage.static_dir = dir.path().join("static");
    config.alpaca.data_url = base.clone();
    config.alpaca.trading_url = base;

    TestApp { _dir: dir, config }
}
