//! Waffle chart: a percentage as filled cells in a fixed grid.

use image::RgbaImage;
use sst_common::Color;

use crate::canvas::{self, Margins, PlotArea};
use crate::style::{self, rgba};
use crate::text::ChartFonts;
use crate::ChartError;

/// Inputs for one waffle figure.
#[derive(Debug, Clone)]
pub struct WaffleSpec {
    /// Percentage in 0..=100; out-of-range values are rejected
    pub percent: f64,
    pub rows: u32,
    pub cols: u32,
    pub on_color: Color,
    pub off_color: Color,
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl WaffleSpec {
    pub fn new(percent: f64, title: impl Into<String>) -> Self {
        Self {
            percent,
            rows: 10,
            cols: 10,
            on_color: style::WAFFLE_ON,
            off_color: style::TRACK,
            title: title.into(),
            width: 420,
            height: 440,
        }
    }
}

/// Number of filled cells: `round(percent / 100 * rows * cols)`.
pub fn filled_cells(percent: f64, rows: u32, cols: u32) -> usize {
    (percent / 100.0 * (rows * cols) as f64).round() as usize
}

/// Render a waffle figure, filling row-major from the top row.
pub fn render_waffle(spec: &WaffleSpec, fonts: &ChartFonts) -> Result<RgbaImage, ChartError> {
    if !(0.0..=100.0).contains(&spec.percent) {
        return Err(ChartError::PercentOutOfRange(spec.percent));
    }
    if spec.rows == 0 || spec.cols == 0 {
        return Err(ChartError::EmptySeries);
    }

    let mut img = RgbaImage::from_pixel(spec.width, spec.height, rgba(style::WHITE));
    let plot = PlotArea::inset(
        spec.width,
        spec.height,
        Margins {
            left: 20,
            right: 20,
            top: 50,
            bottom: 20,
        },
    );

    // Integer cell pitch keeps the grid exact; 95% fill leaves the white
    // gutter between cells.
    let pitch = (plot.w / spec.cols as f32)
        .min(plot.h / spec.rows as f32)
        .floor()
        .max(2.0);
    let side = ((pitch * 0.95) as u32).max(1);
    let grid_w = pitch * spec.cols as f32;
    let grid_h = pitch * spec.rows as f32;
    let ox = (plot.x0 + (plot.w - grid_w) / 2.0).round();
    let oy = (plot.y0 + (plot.h - grid_h) / 2.0).round();

    let total = (spec.rows * spec.cols) as usize;
    let on = filled_cells(spec.percent, spec.rows, spec.cols);

    for i in 0..total {
        let r = i / spec.cols as usize; // 0 = top row
        let c = i % spec.cols as usize;
        let color = if i < on { spec.on_color } else { spec.off_color };
        canvas::fill_rect(
            &mut img,
            (ox + c as f32 * pitch) as i32,
            (oy + r as f32 * pitch) as i32,
            side,
            side,
            color,
        );
    }

    fonts.draw_centered(
        &mut img,
        (spec.width / 2) as i32,
        (oy + grid_h / 2.0) as i32 - 14,
        28.0,
        style::INK,
        &format!("{:.0}%", spec.percent),
    );
    fonts.draw_centered(
        &mut img,
        (spec.width / 2) as i32,
        12,
        15.0,
        style::INK,
        &spec.title,
    );

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_cells_rule() {
        assert_eq!(filled_cells(0.0, 10, 10), 0);
        assert_eq!(filled_cells(50.0, 10, 10), 50);
        assert_eq!(filled_cells(59.0, 10, 10), 59);
        assert_eq!(filled_cells(100.0, 10, 10), 100);
        assert_eq!(filled_cells(45.0, 10, 10), 45);
        // Rounding, not truncation.
        assert_eq!(filled_cells(0.6, 10, 10), 1);
        assert_eq!(filled_cells(33.0, 5, 5), 8);
    }

    #[test]
    fn test_out_of_range_percent_rejected() {
        let spec = WaffleSpec::new(120.0, "t");
        assert!(matches!(
            render_waffle(&spec, &ChartFonts::none()),
            Err(ChartError::PercentOutOfRange(_))
        ));

        let spec = WaffleSpec::new(-1.0, "t");
        assert!(render_waffle(&spec, &ChartFonts::none()).is_err());

        let spec = WaffleSpec::new(f64::NAN, "t");
        assert!(render_waffle(&spec, &ChartFonts::none()).is_err());
    }

    #[test]
    fn test_degenerate_grid_rejected() {
        let mut spec = WaffleSpec::new(50.0, "t");
        spec.rows = 0;
        assert!(matches!(
            render_waffle(&spec, &ChartFonts::none()),
            Err(ChartError::EmptySeries)
        ));
    }
}
