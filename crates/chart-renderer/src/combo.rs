//! Dual-axis combo chart: categorical bars plus an independent line series.

use image::RgbaImage;
use imageproc::drawing::draw_filled_circle_mut;
use sst_common::Color;

use crate::canvas::{self, Margins, PlotArea};
use crate::style::{self, rgba};
use crate::text::ChartFonts;
use crate::ChartError;

/// Inputs for one bar+line figure.
#[derive(Debug, Clone)]
pub struct ComboSpec {
    pub x_labels: Vec<String>,
    pub bar_values: Vec<f64>,
    pub line_values: Vec<f64>,
    pub title: String,
    /// Primary (left) axis label, describing the bar quantity
    pub bar_axis_label: String,
    /// Secondary (right) axis label, drawn in the line color
    pub line_axis_label: String,
    pub bar_color: Color,
    pub line_color: Color,
    pub width: u32,
    pub height: u32,
}

impl ComboSpec {
    pub fn new(x_labels: Vec<String>, bar_values: Vec<f64>, line_values: Vec<f64>) -> Self {
        Self {
            x_labels,
            bar_values,
            line_values,
            title: String::new(),
            bar_axis_label: String::new(),
            line_axis_label: String::new(),
            bar_color: style::COMBO_BAR,
            line_color: style::COMBO_LINE,
            width: 800,
            height: 360,
        }
    }
}

/// Axis ceiling for one series: 10% headroom over the maximum.
pub fn axis_max(values: &[f64]) -> f64 {
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Render bars against the left axis and a marker line against an
/// independent right axis over the same category positions. The two
/// vertical scales never interact: rescaling one series leaves the
/// other's rendered geometry untouched.
pub fn render_combo(spec: &ComboSpec, fonts: &ChartFonts) -> Result<RgbaImage, ChartError> {
    if spec.bar_values.len() != spec.x_labels.len() {
        return Err(ChartError::LengthMismatch {
            left: spec.x_labels.len(),
            right: spec.bar_values.len(),
        });
    }
    if spec.line_values.len() != spec.x_labels.len() {
        return Err(ChartError::LengthMismatch {
            left: spec.x_labels.len(),
            right: spec.line_values.len(),
        });
    }
    if spec.x_labels.is_empty() {
        return Err(ChartError::EmptySeries);
    }

    let mut img = RgbaImage::from_pixel(spec.width, spec.height, rgba(style::WHITE));
    let plot = PlotArea::inset(
        spec.width,
        spec.height,
        Margins {
            left: 75,
            right: 75,
            top: 50,
            bottom: 55,
        },
    );

    let n = spec.x_labels.len();
    let bar_max = axis_max(&spec.bar_values);
    let line_max = axis_max(&spec.line_values);
    let slot = plot.w / n as f32;
    let bar_w = (slot * 0.55).max(1.0);

    // Bars on the primary scale.
    for (i, &v) in spec.bar_values.iter().enumerate() {
        let cx = plot.x0 + (i as f32 + 0.5) * slot;
        let top = plot.map_y(v, 0.0, bar_max);
        let h = plot.bottom() - top;
        if h >= 1.0 {
            canvas::fill_rect(
                &mut img,
                (cx - bar_w / 2.0) as i32,
                top as i32,
                bar_w as u32,
                h as u32,
                spec.bar_color,
            );
        }
    }

    // Connected markers on the secondary scale.
    let points: Vec<(f32, f32)> = spec
        .line_values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            (
                plot.x0 + (i as f32 + 0.5) * slot,
                plot.map_y(v, 0.0, line_max),
            )
        })
        .collect();
    for pair in points.windows(2) {
        canvas::thick_segment(&mut img, pair[0], pair[1], spec.line_color);
    }
    for &(x, y) in &points {
        draw_filled_circle_mut(&mut img, (x as i32, y as i32), 5, rgba(spec.line_color));
    }

    // Axes, ticks, category labels.
    canvas::hline(&mut img, plot.x0, plot.right(), plot.bottom(), 1, style::INK);
    canvas::vline(&mut img, plot.x0, plot.y0, plot.bottom(), 1, style::INK);
    canvas::vline(&mut img, plot.right(), plot.y0, plot.bottom(), 1, style::INK);

    for (i, label) in spec.x_labels.iter().enumerate() {
        let cx = plot.x0 + (i as f32 + 0.5) * slot;
        fonts.draw_centered(
            &mut img,
            cx as i32,
            plot.bottom() as i32 + 8,
            13.0,
            style::INK,
            label,
        );
    }

    let left_tick = tick_label(bar_max);
    let right_tick = tick_label(line_max);
    fonts.draw(&mut img, 6, plot.y0 as i32 - 8, 12.0, style::INK, &left_tick);
    fonts.draw(
        &mut img,
        plot.right() as i32 + 6,
        plot.y0 as i32 - 8,
        12.0,
        spec.line_color,
        &right_tick,
    );
    fonts.draw(&mut img, 6, 8, 13.0, style::INK, &spec.bar_axis_label);
    let right_w = fonts.text_width(13.0, &spec.line_axis_label);
    fonts.draw(
        &mut img,
        (spec.width as f32 - right_w - 6.0) as i32,
        8,
        13.0,
        spec.line_color,
        &spec.line_axis_label,
    );
    fonts.draw_centered(
        &mut img,
        (spec.width / 2) as i32,
        28,
        15.0,
        style::INK,
        &spec.title,
    );

    Ok(img)
}

fn tick_label(v: f64) -> String {
    if v.abs() >= 100.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}
