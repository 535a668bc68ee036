//! Tests for lollipop chart rendering.

use chart_renderer::lollipop::{render_lollipop, sorted_indices, LollipopSpec};
use chart_renderer::style;
use chart_renderer::ChartFonts;
use image::RgbaImage;
use sst_common::Color;

fn spec(values: Vec<f64>) -> LollipopSpec {
    let labels = (0..values.len()).map(|i| format!("region {i}")).collect();
    LollipopSpec::new(labels, values, "title", "°C")
}

/// Max x of any pixel in the given colors within a horizontal band.
fn max_colored_x(img: &RgbaImage, y0: u32, y1: u32, colors: &[Color]) -> Option<u32> {
    let wanted: Vec<image::Rgba<u8>> = colors
        .iter()
        .map(|c| image::Rgba([c.r, c.g, c.b, c.a]))
        .collect();
    let mut max_x = None;
    for y in y0..y1.min(img.height()) {
        for x in 0..img.width() {
            if wanted.contains(img.get_pixel(x, y)) {
                max_x = Some(max_x.map_or(x, |m: u32| m.max(x)));
            }
        }
    }
    max_x
}

fn band_has_color(img: &RgbaImage, y0: u32, y1: u32, color: Color) -> bool {
    let px = image::Rgba([color.r, color.g, color.b, color.a]);
    (y0..y1.min(img.height())).any(|y| (0..img.width()).any(|x| *img.get_pixel(x, y) == px))
}

#[test]
fn test_rows_ordered_by_value_descending() {
    let s = spec(vec![1.23, 1.39, 1.27]);
    let img = render_lollipop(&s, &ChartFonts::none()).unwrap();

    // Default layout: plot rows span y 40..255, three bands.
    let bands = [(40u32, 111u32), (112, 183), (184, 255)];
    let dots = [s.color, s.highlight_color];

    let xs: Vec<u32> = bands
        .iter()
        .map(|&(y0, y1)| max_colored_x(&img, y0, y1, &dots).expect("dot in band"))
        .collect();

    // Largest value renders nearest the top; extents never increase.
    assert!(xs[0] > xs[1]);
    assert!(xs[1] > xs[2]);
}

#[test]
fn test_maximum_highlighted_regardless_of_position() {
    for values in [
        vec![1.39, 1.23, 1.27],
        vec![1.23, 1.27, 1.39],
        vec![1.27, 1.39, 1.23],
    ] {
        let s = spec(values);
        let img = render_lollipop(&s, &ChartFonts::none()).unwrap();

        // Highlight only in the top band; base color in the others.
        assert!(band_has_color(&img, 40, 111, s.highlight_color));
        assert!(!band_has_color(&img, 112, 255, s.highlight_color));
        assert!(band_has_color(&img, 112, 255, s.color));
    }
}

#[test]
fn test_tie_breaks_keep_first_occurrence_on_top() {
    let order = sorted_indices(&[2.0, 3.0, 3.0, 1.0]);
    assert_eq!(order, vec![1, 2, 0, 3]);
}

#[test]
fn test_stems_drawn() {
    let s = spec(vec![0.36, 0.54, 0.38]);
    let img = render_lollipop(&s, &ChartFonts::none()).unwrap();
    assert!(band_has_color(&img, 40, 255, style::STEM));
}
