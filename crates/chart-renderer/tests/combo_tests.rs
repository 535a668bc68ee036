//! Tests for dual-axis combo chart rendering.

use chart_renderer::combo::{render_combo, ComboSpec};
use chart_renderer::ChartFonts;
use image::RgbaImage;
use sst_common::Color;

fn pixels_of(img: &RgbaImage, color: Color) -> Vec<(u32, u32)> {
    let px = image::Rgba([color.r, color.g, color.b, color.a]);
    img.enumerate_pixels()
        .filter(|(_, _, p)| **p == px)
        .map(|(x, y, _)| (x, y))
        .collect()
}

fn years() -> Vec<String> {
    vec!["2022".to_string(), "2023".to_string(), "2024".to_string()]
}

/// Topmost bar pixel in one column, i.e. the rendered bar height.
fn bar_top(img: &RgbaImage, color: Color, x: u32) -> Option<u32> {
    let px = image::Rgba([color.r, color.g, color.b, color.a]);
    (0..img.height()).find(|&y| *img.get_pixel(x, y) == px)
}

#[test]
fn test_bars_unchanged_when_line_scale_changes() {
    let base = ComboSpec::new(years(), vec![1564.0, 2818.0, 3704.0], vec![30.0, 32.0, 9.0]);
    let mut rescaled = base.clone();
    rescaled.line_values = vec![300.0, 320.0, 90.0];

    let fonts = ChartFonts::none();
    let a = render_combo(&base, &fonts).unwrap();
    let b = render_combo(&rescaled, &fonts).unwrap();

    // The bar series renders against its own axis; the line scale change
    // must leave every bar's rendered height where it was. Category
    // centers for the default 800px layout with a 75px gutter each side.
    for cx in [183u32, 400, 616] {
        let top_a = bar_top(&a, base.bar_color, cx).expect("bar in column");
        let top_b = bar_top(&b, base.bar_color, cx).expect("bar in column");
        assert_eq!(top_a, top_b);
    }
}

#[test]
fn test_line_unchanged_when_bar_scale_changes() {
    let base = ComboSpec::new(years(), vec![1564.0, 2818.0, 3704.0], vec![9.0, 32.0, 34.0]);
    let mut rescaled = base.clone();
    rescaled.bar_values = vec![156.4, 281.8, 370.4];

    let fonts = ChartFonts::none();
    let a = render_combo(&base, &fonts).unwrap();
    let b = render_combo(&rescaled, &fonts).unwrap();

    assert_eq!(
        pixels_of(&a, base.line_color),
        pixels_of(&b, base.line_color)
    );
    assert!(!pixels_of(&a, base.line_color).is_empty());
}

#[test]
fn test_bar_heights_follow_values() {
    let spec = ComboSpec::new(years(), vec![1564.0, 2818.0, 3704.0], vec![9.0, 32.0, 34.0]);
    let img = render_combo(&spec, &ChartFonts::none()).unwrap();

    let bars = pixels_of(&img, spec.bar_color);
    // Tallest bar belongs to the last category: its topmost pixel is the
    // global topmost bar pixel, in the right third of the plot.
    let top = bars.iter().min_by_key(|(_, y)| y).unwrap();
    assert!(top.0 > 800 * 2 / 3);
}

#[test]
fn test_mismatched_line_series_rejected() {
    let spec = ComboSpec::new(years(), vec![1.0, 2.0, 3.0], vec![1.0, 2.0]);
    assert!(render_combo(&spec, &ChartFonts::none()).is_err());
}
