//! Halo text drawing shared by all chart primitives.
//!
//! Every label is bold text stroked with a white outline so it stays
//! legible over bars, dots and heatmap cells. Text needs a TrueType font;
//! one is loaded at startup from a configured path or a few well-known
//! system locations, and when none is found label drawing is skipped (the
//! chart geometry still renders).

use image::RgbaImage;
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};
use sst_common::Color;
use std::path::Path;
use tracing::{debug, warn};

use crate::style::{rgba, WHITE};

/// Candidate font files checked when no explicit path is given.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
];

/// The label font, if one could be loaded.
pub struct ChartFonts {
    font: Option<Font<'static>>,
}

impl ChartFonts {
    /// Load from an explicit path, falling back to well-known system
    /// locations. A missing font is not an error: charts render without
    /// labels.
    pub fn load(path: Option<&Path>) -> Self {
        if let Some(path) = path {
            match Self::try_load(path) {
                Some(font) => return Self { font: Some(font) },
                None => warn!(path = %path.display(), "could not load font, trying system fonts"),
            }
        }

        for candidate in SYSTEM_FONTS {
            if let Some(font) = Self::try_load(Path::new(candidate)) {
                debug!(path = candidate, "loaded label font");
                return Self { font: Some(font) };
            }
        }

        warn!("no label font available, charts will render without text");
        Self { font: None }
    }

    /// A font-less instance; all label drawing becomes a no-op.
    pub fn none() -> Self {
        Self { font: None }
    }

    fn try_load(path: &Path) -> Option<Font<'static>> {
        let data = std::fs::read(path).ok()?;
        Font::try_from_vec(data)
    }

    pub fn available(&self) -> bool {
        self.font.is_some()
    }

    /// Pixel width of `text` at `size`.
    pub fn text_width(&self, size: f32, text: &str) -> f32 {
        match &self.font {
            Some(font) => {
                let scale = Scale::uniform(size);
                font.layout(text, scale, point(0.0, 0.0))
                    .last()
                    .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
                    .unwrap_or(0.0)
            }
            // Rough monospace estimate keeps layout stable without a font.
            None => text.len() as f32 * size * 0.6,
        }
    }

    /// Draw bold halo text with its top-left corner at `(x, y)`.
    pub fn draw(&self, img: &mut RgbaImage, x: i32, y: i32, size: f32, color: Color, text: &str) {
        self.draw_weighted(img, x, y, size, color, text, true);
    }

    /// Draw halo text, optionally bold.
    ///
    /// Bold is emulated by a second pass offset one pixel horizontally.
    pub fn draw_weighted(
        &self,
        img: &mut RgbaImage,
        x: i32,
        y: i32,
        size: f32,
        color: Color,
        text: &str,
        bold: bool,
    ) {
        let Some(font) = &self.font else {
            return;
        };
        let scale = Scale::uniform(size);

        // White outline: the glyphs at the 8 neighbor offsets.
        for dx in -1..=1i32 {
            for dy in -1..=1i32 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                draw_text_mut(img, rgba(WHITE), x + dx, y + dy, scale, font, text);
                if bold {
                    draw_text_mut(img, rgba(WHITE), x + 1 + dx, y + dy, scale, font, text);
                }
            }
        }

        draw_text_mut(img, rgba(color), x, y, scale, font, text);
        if bold {
            draw_text_mut(img, rgba(color), x + 1, y, scale, font, text);
        }
    }

    /// Draw halo text horizontally centered on `cx`.
    pub fn draw_centered(
        &self,
        img: &mut RgbaImage,
        cx: i32,
        y: i32,
        size: f32,
        color: Color,
        text: &str,
    ) {
        let w = self.text_width(size, text);
        self.draw(img, cx - (w / 2.0) as i32, y, size, color, text);
    }
}
