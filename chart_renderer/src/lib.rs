//! Line charts of closing prices read back from the persisted bars CSV.

pub mod chart_spec;
pub mod error;
pub mod renderer;

pub use chart_spec::{ChartSpec, load_chart_spec};
pub use error::RenderError;
pub use renderer::ChartRenderer;
