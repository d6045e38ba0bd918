//! SVG rendering of a [`ChartSpec`].

use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use plotters::{coord::types::RangedDateTime, prelude::*};
use snafu::ResultExt;
use tracing::info;

use crate::{
    chart_spec::{ChartSpec, load_chart_spec},
    error::{DrawSnafu, EmptyDataSnafu, IoSnafu, RenderError},
};

pub const DATE_LABEL: &str = "Date";
pub const CLOSE_LABEL: &str = "Closing prices (USD)";

const DEFAULT_SIZE: (u32, u32) = (1000, 600);
const MAX_X_LABELS: usize = 12;

fn draw_error(err: impl Display) -> RenderError {
    DrawSnafu {
        message: err.to_string(),
    }
    .build()
}

/// Renders closing-price charts to one fixed image path.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output: PathBuf,
    size: (u32, u32),
}

impl ChartRenderer {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            size: DEFAULT_SIZE,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Loads `csv_path` and draws it. Nothing is written if loading fails.
    pub fn render(&self, csv_path: &Path, asset: &str) -> Result<PathBuf, RenderError> {
        let spec = load_chart_spec(csv_path)?;
        self.draw(&spec, asset)?;
        info!(
            asset = %asset,
            points = spec.len(),
            path = %self.output.display(),
            "rendered chart"
        );
        Ok(self.output.clone())
    }

    /// Draws `spec` as a line with circular markers, overwriting the output file.
    pub fn draw(&self, spec: &ChartSpec, asset: &str) -> Result<(), RenderError> {
        let (Some((x0, x1)), Some((y0, y1))) = (spec.x_bounds(), spec.y_bounds()) else {
            return EmptyDataSnafu {
                path: self.output.clone(),
            }
            .fail();
        };

        if let Some(dir) = self.output.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).context(IoSnafu { path: dir })?;
        }

        let root = SVGBackend::new(&self.output, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("{asset} Price Evolution"), ("sans-serif", 26))
            .margin(20)
            .x_label_area_size(110)
            .y_label_area_size(80)
            .build_cartesian_2d(RangedDateTime::from(x0..x1), y0..y1)
            .map_err(draw_error)?;

        chart
            .configure_mesh()
            .bold_line_style(BLACK.mix(0.25))
            .light_line_style(BLACK.mix(0.08))
            .x_labels(spec.len().clamp(2, MAX_X_LABELS))
            .x_label_formatter(&|d: &DateTime<Utc>| d.format("%Y-%m-%d").to_string())
            .x_label_style(
                ("sans-serif", 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_desc(DATE_LABEL)
            .y_desc(CLOSE_LABEL)
            .draw()
            .map_err(draw_error)?;

        chart
            .draw_series(LineSeries::new(spec.points(), BLUE.stroke_width(2)).point_size(4))
            .map_err(draw_error)?
            .label(CLOSE_LABEL)
            .legend(|(x, y)| {
                EmptyElement::at((x, y))
                    + PathElement::new(vec![(0, 0), (20, 0)], BLUE.stroke_width(2))
                    + Circle::new((10, 0), 4, BLUE.filled())
            });

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn spec(days: u32) -> ChartSpec {
        ChartSpec {
            dates: (1..=days)
                .map(|d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap())
                .collect(),
            closes: (1..=days).map(|d| 100.0 + d as f64).collect(),
        }
    }

    #[test]
    fn draws_svg_with_labels() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("static").join("plot.svg");
        let renderer = ChartRenderer::new(&out);

        renderer.draw(&spec(5), "BTC/USD").unwrap();

        let svg = fs::read_to_string(&out).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("BTC/USD Price Evolution"));
        assert!(svg.contains(CLOSE_LABEL));
        assert!(svg.contains(DATE_LABEL));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn legend_sample_carries_the_point_marker() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("plot.svg");

        ChartRenderer::new(&out).draw(&spec(5), "BTC/USD").unwrap();

        let svg = fs::read_to_string(&out).unwrap();
        assert_eq!(svg.matches("<circle").count(), 5 + 1);
    }

    #[test]
    fn single_point_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("plot.svg");
        ChartRenderer::new(&out).draw(&spec(1), "SOL/USD").unwrap();
        assert!(out.exists());
    }

    #[test]
    fn redraw_overwrites_previous_image() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("plot.svg");
        let renderer = ChartRenderer::new(&out).with_size(640, 480);

        renderer.draw(&spec(3), "BTC/USD").unwrap();
        renderer.draw(&spec(3), "ETH/USD").unwrap();

        let svg = fs::read_to_string(&out).unwrap();
        assert!(svg.contains("ETH/USD Price Evolution"));
        assert!(!svg.contains("BTC/USD"));
    }

    #[test]
    fn empty_spec_is_rejected_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("plot.svg");
        let empty = ChartSpec {
            dates: vec![],
            closes: vec![],
        };
        let err = ChartRenderer::new(&out).draw(&empty, "BTC/USD").unwrap_err();
        assert!(matches!(err, RenderError::EmptyData { .. }));
        assert!(!out.exists());
    }
}
