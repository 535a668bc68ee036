//! Report palette and shared styling constants.

use image::Rgba;
use sst_common::Color;

/// Background track behind bars and waffle off-cells.
pub const TRACK: Color = Color { r: 0xEE, g: 0xEE, b: 0xEE, a: 0xFF };
/// Axis lines, tick labels, target markers.
pub const INK: Color = Color { r: 0x33, g: 0x33, b: 0x33, a: 0xFF };
/// Lollipop stems.
pub const STEM: Color = Color { r: 0xCC, g: 0xCC, b: 0xCC, a: 0xFF };
pub const WHITE: Color = Color { r: 0xFF, g: 0xFF, b: 0xFF, a: 0xFF };

/// Badge for a positive delta.
pub const BADGE_POSITIVE: Color = Color { r: 0xC1, g: 0x27, b: 0x2D, a: 0xFF };
/// Badge for a zero or negative delta.
pub const BADGE_NON_POSITIVE: Color = Color { r: 0x2B, g: 0x7A, b: 0x78, a: 0xFF };

pub const BULLET_FILL: Color = Color { r: 0xF2, g: 0x8E, b: 0x2B, a: 0xFF };
pub const LOLLIPOP_BASE: Color = Color { r: 0x4C, g: 0x78, b: 0xA8, a: 0xFF };
pub const LOLLIPOP_HIGHLIGHT: Color = Color { r: 0xE4, g: 0x57, b: 0x56, a: 0xFF };
pub const COMBO_BAR: Color = Color { r: 0xFD, g: 0xB8, b: 0x63, a: 0xFF };
pub const COMBO_LINE: Color = Color { r: 0xC1, g: 0x27, b: 0x2D, a: 0xFF };
pub const WAFFLE_ON: Color = Color { r: 0xF0, g: 0x3B, b: 0x20, a: 0xFF };
/// Land / missing cells in the heatmap.
pub const LAND: Color = Color { r: 0xD3, g: 0xD3, b: 0xD3, a: 0xFF };

/// Convert a palette color to an image pixel.
pub fn rgba(c: Color) -> Rgba<u8> {
    Rgba([c.r, c.g, c.b, c.a])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_matches_hex() {
        assert_eq!(Some(BULLET_FILL), Color::from_hex("#F28E2B"));
        assert_eq!(Some(BADGE_POSITIVE), Color::from_hex("#C1272D"));
        assert_eq!(Some(BADGE_NON_POSITIVE), Color::from_hex("#2B7A78"));
        assert_eq!(Some(WAFFLE_ON), Color::from_hex("#F03B20"));
    }
}
