//! Common types shared by the SST dataset client and the chart renderer.

pub mod color;
pub mod grid;
pub mod time;
pub mod window;

pub use color::Color;
pub use grid::{DatasetGridSpec, GridShapeError, SstGrid};
pub use window::{LatLonWindow, WindowError};
