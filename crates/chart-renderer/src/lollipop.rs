//! Horizontal lollipop chart: one stem + dot per category, sorted by value.

use image::RgbaImage;
use imageproc::drawing::draw_filled_circle_mut;
use sst_common::Color;

use crate::canvas::{self, Margins, PlotArea};
use crate::style::{self, rgba};
use crate::text::ChartFonts;
use crate::ChartError;

/// Inputs for one lollipop figure.
#[derive(Debug, Clone)]
pub struct LollipopSpec {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub title: String,
    pub unit: String,
    pub color: Color,
    pub highlight_color: Color,
    pub width: u32,
    pub height: u32,
}

impl LollipopSpec {
    pub fn new(
        labels: Vec<String>,
        values: Vec<f64>,
        title: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            labels,
            values,
            title: title.into(),
            unit: unit.into(),
            color: style::LOLLIPOP_BASE,
            highlight_color: style::LOLLIPOP_HIGHLIGHT,
            width: 480,
            height: 300,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Indices ordered by value descending. The sort is stable: entries with
/// equal values keep their original order, so the first occurrence of the
/// maximum lands on row 0.
pub fn sorted_indices(values: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    idx
}

/// Value label formatting: rate units (per-year) carry two decimals,
/// everything else one.
pub fn format_value(v: f64, unit: &str) -> String {
    if unit.ends_with("/yr") {
        format!("{v:.2}{unit}")
    } else {
        format!("{v:.1}{unit}")
    }
}

/// Render a horizontal lollipop figure, largest value at the top.
pub fn render_lollipop(
    spec: &LollipopSpec,
    fonts: &ChartFonts,
) -> Result<RgbaImage, ChartError> {
    if spec.labels.len() != spec.values.len() {
        return Err(ChartError::LengthMismatch {
            left: spec.labels.len(),
            right: spec.values.len(),
        });
    }
    if spec.labels.is_empty() {
        return Err(ChartError::EmptySeries);
    }

    let mut img = RgbaImage::from_pixel(spec.width, spec.height, rgba(style::WHITE));
    let plot = PlotArea::inset(
        spec.width,
        spec.height,
        Margins {
            left: 95,
            right: 40,
            top: 40,
            bottom: 45,
        },
    );

    let max_val = spec.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let scale_max = if max_val > 0.0 { max_val * 1.15 } else { 1.0 };

    let order = sorted_indices(&spec.values);
    let row_h = plot.h / order.len() as f32;
    let x_zero = plot.map_x(0.0, 0.0, scale_max);

    for (row, &i) in order.iter().enumerate() {
        let v = spec.values[i];
        let y = plot.y0 + (row as f32 + 0.5) * row_h;
        let x = plot.map_x(v, 0.0, scale_max);
        let highlight = row == 0;
        let dot_color = if highlight {
            spec.highlight_color
        } else {
            spec.color
        };

        canvas::hline(&mut img, x_zero, x, y, 3, style::STEM);
        draw_filled_circle_mut(&mut img, (x as i32, y as i32), 6, rgba(dot_color));

        // Value label just beyond the dot, offset by 3% of the maximum.
        let label_x = plot.map_x(v + 0.03 * max_val.max(0.0), 0.0, scale_max);
        fonts.draw_weighted(
            &mut img,
            label_x as i32 + 4,
            y as i32 - 7,
            13.0,
            dot_color,
            &format_value(v, &spec.unit),
            highlight,
        );

        // Category label in the left gutter, right-aligned.
        let text = &spec.labels[i];
        let tw = fonts.text_width(13.0, text);
        fonts.draw_weighted(
            &mut img,
            (plot.x0 - 10.0 - tw) as i32,
            y as i32 - 7,
            13.0,
            style::INK,
            text,
            highlight,
        );
    }

    canvas::vline(&mut img, x_zero, plot.y0, plot.bottom(), 1, style::INK);
    canvas::hline(&mut img, plot.x0, plot.right(), plot.bottom(), 1, style::INK);
    fonts.draw_centered(
        &mut img,
        (spec.width / 2) as i32,
        10,
        15.0,
        style::INK,
        &spec.title,
    );
    fonts.draw_centered(
        &mut img,
        (spec.width / 2) as i32,
        plot.bottom() as i32 + 12,
        12.0,
        style::INK,
        &spec.unit,
    );

    Ok(img)
}
