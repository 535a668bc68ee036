//! Chart primitives for the SST report.
//!
//! Each render function is pure given its spec: numeric inputs and styling
//! in, a styled RGBA figure out. Nothing here touches the network or any
//! shared mutable state, so independent figures can render in parallel.

pub mod bullet;
pub mod canvas;
pub mod combo;
pub mod heatmap;
pub mod lollipop;
pub mod png;
pub mod style;
pub mod text;
pub mod waffle;

pub use bullet::{render_bullet, BulletSpec};
pub use combo::{render_combo, ComboSpec};
pub use heatmap::{render_colorbar, render_heatmap, HeatmapSpec, TwoSlopeNorm};
pub use lollipop::{render_lollipop, LollipopSpec};
pub use text::ChartFonts;
pub use waffle::{render_waffle, WaffleSpec};

/// Malformed chart input. These have no recovery path inside the
/// primitives and propagate to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("series length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("percentage {0} outside 0..=100")]
    PercentOutOfRange(f64),

    #[error("chart has no data")]
    EmptySeries,
}
