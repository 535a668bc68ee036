//! Plot-area layout and primitive drawing helpers.

use image::RgbaImage;
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use sst_common::Color;

use crate::style::rgba;

/// Pixel margins around the plot area.
#[derive(Debug, Clone, Copy)]
pub struct Margins {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

/// The data region of a figure, in pixels.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub x0: f32,
    pub y0: f32,
    pub w: f32,
    pub h: f32,
}

impl PlotArea {
    /// Inset a plot area into an image by the given margins.
    pub fn inset(img_w: u32, img_h: u32, margins: Margins) -> Self {
        let w = img_w.saturating_sub(margins.left + margins.right).max(1);
        let h = img_h.saturating_sub(margins.top + margins.bottom).max(1);
        Self {
            x0: margins.left as f32,
            y0: margins.top as f32,
            w: w as f32,
            h: h as f32,
        }
    }

    /// Map a data value onto the horizontal axis.
    pub fn map_x(&self, v: f64, vmin: f64, vmax: f64) -> f32 {
        let span = vmax - vmin;
        let t = if span.abs() < f64::EPSILON {
            0.5
        } else {
            (v - vmin) / span
        };
        self.x0 + (t as f32) * self.w
    }

    /// Map a data value onto the vertical axis, `vmin` at the bottom.
    pub fn map_y(&self, v: f64, vmin: f64, vmax: f64) -> f32 {
        let span = vmax - vmin;
        let t = if span.abs() < f64::EPSILON {
            0.5
        } else {
            (v - vmin) / span
        };
        self.y0 + self.h - (t as f32) * self.h
    }

    pub fn right(&self) -> f32 {
        self.x0 + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y0 + self.h
    }
}

/// Fill the whole image with one color.
pub fn fill(img: &mut RgbaImage, color: Color) {
    let px = rgba(color);
    for p in img.pixels_mut() {
        *p = px;
    }
}

/// Axis-aligned filled rectangle, clipped to the image.
pub fn fill_rect(img: &mut RgbaImage, x: i32, y: i32, w: u32, h: u32, color: Color) {
    if w == 0 || h == 0 {
        return;
    }
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(w, h), rgba(color));
}

/// Horizontal line of the given thickness.
pub fn hline(img: &mut RgbaImage, x0: f32, x1: f32, y: f32, thickness: u32, color: Color) {
    let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
    let w = (x1 - x0).round().max(1.0) as u32;
    fill_rect(
        img,
        x0.round() as i32,
        (y - thickness as f32 / 2.0).round() as i32,
        w,
        thickness,
        color,
    );
}

/// Vertical line of the given thickness.
pub fn vline(img: &mut RgbaImage, x: f32, y0: f32, y1: f32, thickness: u32, color: Color) {
    let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
    let h = (y1 - y0).round().max(1.0) as u32;
    fill_rect(
        img,
        (x - thickness as f32 / 2.0).round() as i32,
        y0.round() as i32,
        thickness,
        h,
        color,
    );
}

/// A line segment thick enough to read as a chart stroke.
pub fn thick_segment(img: &mut RgbaImage, p0: (f32, f32), p1: (f32, f32), color: Color) {
    let px = rgba(color);
    for (dx, dy) in [(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (0.0, -1.0)] {
        draw_line_segment_mut(
            img,
            (p0.0 + dx, p0.1 + dy),
            (p1.0 + dx, p1.1 + dy),
            px,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::WHITE;

    #[test]
    fn test_inset() {
        let area = PlotArea::inset(
            100,
            60,
            Margins {
                left: 10,
                right: 5,
                top: 8,
                bottom: 12,
            },
        );
        assert_eq!(area.x0, 10.0);
        assert_eq!(area.y0, 8.0);
        assert_eq!(area.w, 85.0);
        assert_eq!(area.h, 40.0);
    }

    #[test]
    fn test_map_x_endpoints() {
        let area = PlotArea {
            x0: 10.0,
            y0: 0.0,
            w: 100.0,
            h: 50.0,
        };
        assert_eq!(area.map_x(0.0, 0.0, 10.0), 10.0);
        assert_eq!(area.map_x(10.0, 0.0, 10.0), 110.0);
        assert_eq!(area.map_x(5.0, 0.0, 10.0), 60.0);
    }

    #[test]
    fn test_map_y_inverted() {
        let area = PlotArea {
            x0: 0.0,
            y0: 10.0,
            w: 100.0,
            h: 50.0,
        };
        assert_eq!(area.map_y(0.0, 0.0, 10.0), 60.0);
        assert_eq!(area.map_y(10.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_degenerate_span_maps_to_midpoint() {
        let area = PlotArea {
            x0: 0.0,
            y0: 0.0,
            w: 100.0,
            h: 50.0,
        };
        assert_eq!(area.map_x(5.0, 5.0, 5.0), 50.0);
    }

    #[test]
    fn test_fill_rect_zero_size_is_noop() {
        let mut img = RgbaImage::new(10, 10);
        let before = img.clone();
        fill_rect(&mut img, 2, 2, 0, 5, WHITE);
        assert_eq!(img, before);
    }
}
