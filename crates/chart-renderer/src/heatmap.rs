//! SST heatmap: a diverging colormap over the fetched grid.

use image::RgbaImage;
use rayon::prelude::*;
use sst_common::{Color, SstGrid};

use crate::canvas::{Margins, PlotArea};
use crate::style::{self, rgba};
use crate::text::ChartFonts;

/// Piecewise-linear mapping of a value range to 0..1 with an off-center
/// anchor mapped to 0.5.
#[derive(Debug, Clone, Copy)]
pub struct TwoSlopeNorm {
    pub vmin: f32,
    pub vcenter: f32,
    pub vmax: f32,
}

impl TwoSlopeNorm {
    pub fn new(vmin: f32, vcenter: f32, vmax: f32) -> Self {
        debug_assert!(vmin < vcenter && vcenter < vmax);
        Self {
            vmin,
            vcenter,
            vmax,
        }
    }

    /// Normalize a value, clamping outside the range.
    pub fn normalize(&self, v: f32) -> f32 {
        if v <= self.vmin {
            0.0
        } else if v >= self.vmax {
            1.0
        } else if v < self.vcenter {
            0.5 * (v - self.vmin) / (self.vcenter - self.vmin)
        } else {
            0.5 + 0.5 * (v - self.vcenter) / (self.vmax - self.vcenter)
        }
    }
}

/// Yellow-orange-red ramp used for sea-surface temperature.
const RAMP: [Color; 7] = [
    Color { r: 0xFF, g: 0xFF, b: 0xCC, a: 0xFF },
    Color { r: 0xFE, g: 0xD9, b: 0x76, a: 0xFF },
    Color { r: 0xFE, g: 0xB2, b: 0x4C, a: 0xFF },
    Color { r: 0xFD, g: 0x8D, b: 0x3C, a: 0xFF },
    Color { r: 0xFC, g: 0x4E, b: 0x2A, a: 0xFF },
    Color { r: 0xE3, g: 0x1A, b: 0x1C, a: 0xFF },
    Color { r: 0xB1, g: 0x00, b: 0x26, a: 0xFF },
];

/// Interpolated ramp color for a normalized value.
pub fn ramp_color(t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (RAMP.len() - 1) as f32;
    let i = (scaled as usize).min(RAMP.len() - 2);
    RAMP[i].lerp(RAMP[i + 1], scaled - i as f32)
}

/// Options for one heatmap figure.
#[derive(Debug, Clone)]
pub struct HeatmapSpec {
    pub norm: TwoSlopeNorm,
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl HeatmapSpec {
    /// The report's SST normalization: 20..34 °C centered on 30.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            norm: TwoSlopeNorm::new(20.0, 30.0, 34.0),
            title: title.into(),
            width: 900,
            height: 600,
        }
    }
}

/// Render the grid as a colormapped image, north row on top.
///
/// Plain equirectangular pixel mapping with nearest-neighbor sampling;
/// missing samples render as the land color. Rows render in parallel.
pub fn render_heatmap(grid: &SstGrid, spec: &HeatmapSpec, fonts: &ChartFonts) -> RgbaImage {
    if grid.width == 0 || grid.height == 0 {
        return RgbaImage::from_pixel(spec.width.max(1), spec.height.max(1), rgba(style::WHITE));
    }
    let plot = PlotArea::inset(
        spec.width,
        spec.height,
        Margins {
            left: 10,
            right: 10,
            top: 40,
            bottom: 10,
        },
    );
    let norm = spec.norm;
    let white = rgba(style::WHITE);
    let land = rgba(style::LAND);

    let row_len = (spec.width * 4) as usize;
    let mut buf = vec![0u8; row_len * spec.height as usize];

    buf.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        for x in 0..spec.width as usize {
            let fx = x as f32;
            let fy = y as f32;
            let px = if fx >= plot.x0
                && fx < plot.right()
                && fy >= plot.y0
                && fy < plot.bottom()
            {
                let gx = (((fx - plot.x0) / plot.w) * grid.width as f32) as usize;
                let gy_from_top = (((fy - plot.y0) / plot.h) * grid.height as f32) as usize;
                let gx = gx.min(grid.width - 1);
                // Grid rows run south to north; the image runs top-down.
                let gy = grid.height - 1 - gy_from_top.min(grid.height - 1);
                match grid.get(gy, gx) {
                    Some(v) if !v.is_nan() => rgba(ramp_color(norm.normalize(v))),
                    _ => land,
                }
            } else {
                white
            };
            row[x * 4..x * 4 + 4].copy_from_slice(&px.0);
        }
    });

    let mut img = RgbaImage::from_raw(spec.width, spec.height, buf)
        .expect("buffer sized to image dimensions");

    fonts.draw_centered(
        &mut img,
        (spec.width / 2) as i32,
        10,
        16.0,
        style::INK,
        &spec.title,
    );

    img
}

/// Render a vertical colorbar for the given normalization, warm end up.
pub fn render_colorbar(
    norm: &TwoSlopeNorm,
    unit: &str,
    width: u32,
    height: u32,
    fonts: &ChartFonts,
) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, rgba(style::WHITE));
    if width == 0 || height == 0 {
        return img;
    }
    let bar_w = (width / 3).max(8).min(width);

    for y in 0..height {
        let t = 1.0 - y as f32 / (height - 1).max(1) as f32;
        let px = rgba(ramp_color(t));
        for x in 0..bar_w {
            img.put_pixel(x, y, px);
        }
    }

    for v in [norm.vmin, norm.vcenter, norm.vmax] {
        let t = norm.normalize(v);
        let y = ((1.0 - t) * (height - 1) as f32) as i32;
        fonts.draw(
            &mut img,
            bar_w as i32 + 6,
            (y - 7).clamp(0, height as i32 - 14),
            12.0,
            style::INK,
            &format!("{v:.0}{unit}"),
        );
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_slope_norm_anchors() {
        let norm = TwoSlopeNorm::new(20.0, 30.0, 34.0);
        assert_eq!(norm.normalize(20.0), 0.0);
        assert_eq!(norm.normalize(30.0), 0.5);
        assert_eq!(norm.normalize(34.0), 1.0);
        assert_eq!(norm.normalize(10.0), 0.0);
        assert_eq!(norm.normalize(40.0), 1.0);
        // Slopes differ on either side of the center.
        assert!((norm.normalize(25.0) - 0.25).abs() < 1e-6);
        assert!((norm.normalize(32.0) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(ramp_color(0.0), RAMP[0]);
        assert_eq!(ramp_color(1.0), RAMP[6]);
        assert_eq!(ramp_color(-1.0), RAMP[0]);
    }
}
