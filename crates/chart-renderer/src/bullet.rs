//! Bullet chart: an actual value against a target on a bounded range.

use image::RgbaImage;
use sst_common::Color;

use crate::canvas::{self, Margins, PlotArea};
use crate::style::{self, rgba};
use crate::text::ChartFonts;

/// Inputs for one bullet figure.
#[derive(Debug, Clone)]
pub struct BulletSpec {
    pub value: f64,
    pub target: f64,
    pub label: String,
    pub unit: String,
    pub fill_color: Color,
    pub width: u32,
    pub height: u32,
}

impl BulletSpec {
    pub fn new(value: f64, target: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            target,
            label: label.into(),
            unit: "°C".to_string(),
            fill_color: style::BULLET_FILL,
            width: 500,
            height: 260,
        }
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill_color = color;
        self
    }
}

/// Axis range spanning both value and target with symmetric padding of
/// half their span plus a fixed margin, so the bar never clips either
/// point (nonzero margin even when they coincide).
pub fn axis_range(value: f64, target: f64) -> (f64, f64) {
    let lo = value.min(target);
    let hi = value.max(target);
    let pad = (hi - lo) * 0.5 + 0.5;
    (lo - pad, hi + pad)
}

/// Badge text and color for the value-target delta.
///
/// Sign-prefixed, one decimal; positive deltas use the positive badge
/// color, zero and negative the non-positive one.
pub fn delta_badge(value: f64, target: f64) -> (String, Color) {
    let delta = value - target;
    let color = if delta > 0.0 {
        style::BADGE_POSITIVE
    } else {
        style::BADGE_NON_POSITIVE
    };
    (format!("{delta:+.1}"), color)
}

/// Render a horizontal bullet figure.
pub fn render_bullet(spec: &BulletSpec, fonts: &ChartFonts) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(spec.width, spec.height, rgba(style::WHITE));
    let plot = PlotArea::inset(
        spec.width,
        spec.height,
        Margins {
            left: 25,
            right: 25,
            top: 70,
            bottom: 55,
        },
    );

    let (vmin, vmax) = axis_range(spec.value, spec.target);
    let yc = plot.y0 + plot.h / 2.0;
    let track_h = (plot.h * 0.36).max(8.0);

    // Full-range background track, then the value fill over it.
    canvas::fill_rect(
        &mut img,
        plot.x0 as i32,
        (yc - track_h / 2.0) as i32,
        plot.w as u32,
        track_h as u32,
        style::TRACK,
    );
    let value_x = plot.map_x(spec.value, vmin, vmax);
    canvas::fill_rect(
        &mut img,
        plot.x0 as i32,
        (yc - track_h / 2.0) as i32,
        (value_x - plot.x0).max(1.0) as u32,
        track_h as u32,
        spec.fill_color,
    );

    // Target marker.
    let target_x = plot.map_x(spec.target, vmin, vmax);
    canvas::vline(
        &mut img,
        target_x,
        yc - track_h * 0.8,
        yc + track_h * 0.8,
        3,
        style::INK,
    );

    // Value label just past the bar end.
    fonts.draw(
        &mut img,
        value_x as i32 + 5,
        (yc - track_h / 2.0) as i32 - 20,
        14.0,
        style::INK,
        &format!("{:.1}{}", spec.value, spec.unit),
    );

    // Delta badge, top-left inside the plot.
    let (delta_text, badge_color) = delta_badge(spec.value, spec.target);
    let badge_text = format!("{}{}", delta_text, spec.unit);
    let badge_w = fonts.text_width(14.0, &badge_text) + 14.0;
    canvas::fill_rect(
        &mut img,
        plot.x0 as i32,
        (plot.y0 - 32.0) as i32,
        badge_w as u32,
        24,
        badge_color,
    );
    fonts.draw(
        &mut img,
        plot.x0 as i32 + 7,
        (plot.y0 - 29.0) as i32,
        14.0,
        style::WHITE,
        &badge_text,
    );

    // Title, axis baseline, end-of-range ticks, unit label.
    fonts.draw_centered(
        &mut img,
        (spec.width / 2) as i32,
        10,
        16.0,
        style::INK,
        &spec.label,
    );
    canvas::hline(&mut img, plot.x0, plot.right(), plot.bottom(), 1, style::INK);
    fonts.draw_centered(
        &mut img,
        plot.x0 as i32,
        plot.bottom() as i32 + 8,
        12.0,
        style::INK,
        &format!("{vmin:.1}"),
    );
    fonts.draw_centered(
        &mut img,
        plot.right() as i32,
        plot.bottom() as i32 + 8,
        12.0,
        style::INK,
        &format!("{vmax:.1}"),
    );
    fonts.draw_centered(
        &mut img,
        (spec.width / 2) as i32,
        plot.bottom() as i32 + 26,
        12.0,
        style::INK,
        &spec.unit,
    );

    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_range_contains_both_points() {
        for (value, target) in [(23.2, 21.2), (19.8, 19.2), (5.0, 30.0), (-2.0, 1.5)] {
            let (vmin, vmax) = axis_range(value, target);
            assert!(vmin < value.min(target));
            assert!(vmax > value.max(target));
        }
    }

    #[test]
    fn test_axis_range_nonzero_margin_when_equal() {
        let (vmin, vmax) = axis_range(22.6, 22.6);
        assert!(vmin < 22.6 && vmax > 22.6);
        assert!((vmax - vmin - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_delta_badge_signs() {
        let (text, color) = delta_badge(23.2, 21.2);
        assert_eq!(text, "+2.0");
        assert_eq!(color, style::BADGE_POSITIVE);

        let (text, color) = delta_badge(19.2, 19.8);
        assert_eq!(text, "-0.6");
        assert_eq!(color, style::BADGE_NON_POSITIVE);

        let (text, color) = delta_badge(22.6, 22.6);
        assert_eq!(text, "+0.0");
        assert_eq!(color, style::BADGE_NON_POSITIVE);
    }
}
