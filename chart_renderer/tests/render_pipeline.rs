use std::fs;

use chart_renderer::{ChartRenderer, RenderError, load_chart_spec};
use chrono::{TimeZone, Utc};
use crypto_ingestor::{
    io::csv_sink::persist,
    models::{bar::Bar, bar_series::BarSeries, timeframe::TimeFrame},
};

const CLOSES: [f64; 5] = [2281.5, 2352.0, 2209.75, 2268.25, 2291.0];

fn eth_series() -> BarSeries {
    BarSeries {
        symbol: "ETH/USD".to_string(),
        timeframe: TimeFrame::day(),
        bars: CLOSES
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1 + i as u32, 0, 0, 0).unwrap(),
                open: close - 10.0,
                high: close + 25.0,
                low: close - 30.0,
                close,
                volume: 1500.0 + i as f64,
                trade_count: Some(900),
                vwap: Some(close),
            })
            .collect(),
    }
}

#[test]
fn persisted_bars_render_in_original_order() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("data").join("crypto_data.csv");
    let image_path = dir.path().join("static").join("plot.svg");

    persist(&eth_series(), &csv_path).unwrap();

    let spec = load_chart_spec(&csv_path).unwrap();
    assert_eq!(spec.len(), 5);
    assert_eq!(spec.closes, CLOSES.to_vec());
    let expected_dates: Vec<_> = (1..=5)
        .map(|d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap())
        .collect();
    assert_eq!(spec.dates, expected_dates);

    let written = ChartRenderer::new(&image_path)
        .render(&csv_path, "ETH/USD")
        .unwrap();
    assert_eq!(written, image_path);
    let svg = fs::read_to_string(&image_path).unwrap();
    assert!(svg.contains("ETH/USD Price Evolution"));
}

#[test]
fn empty_fetch_renders_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("crypto_data.csv");
    let image_path = dir.path().join("plot.svg");

    persist(&BarSeries::empty("ETH/USD", TimeFrame::day()), &csv_path).unwrap();

    let err = ChartRenderer::new(&image_path)
        .render(&csv_path, "ETH/USD")
        .unwrap_err();
    assert!(matches!(err, RenderError::EmptyData { .. }));
    assert!(!image_path.exists());
}

#[test]
fn render_before_any_fetch_is_missing_data() {
    let dir = tempfile::tempdir().unwrap();
    let err = ChartRenderer::new(dir.path().join("plot.svg"))
        .render(&dir.path().join("crypto_data.csv"), "BTC/USD")
        .unwrap_err();
    assert!(matches!(err, RenderError::MissingData { .. }));
}
