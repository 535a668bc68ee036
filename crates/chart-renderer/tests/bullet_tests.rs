//! Tests for bullet chart rendering.

use chart_renderer::bullet::{axis_range, delta_badge, render_bullet, BulletSpec};
use chart_renderer::style;
use chart_renderer::ChartFonts;
use image::RgbaImage;
use sst_common::Color;

fn count_pixels(img: &RgbaImage, color: Color) -> usize {
    let px = image::Rgba([color.r, color.g, color.b, color.a]);
    img.pixels().filter(|&&p| p == px).count()
}

#[test]
fn test_rendered_range_contains_value_and_target() {
    // The fill must end strictly inside the track, and the target marker
    // must sit strictly inside the plot, for any input pair.
    for (value, target) in [(23.2, 21.2), (19.8, 19.2), (22.6, 22.6), (-1.0, 2.0)] {
        let (vmin, vmax) = axis_range(value, target);
        assert!(vmin < value.min(target));
        assert!(vmax > value.max(target));

        let spec = BulletSpec::new(value, target, "range");
        let img = render_bullet(&spec, &ChartFonts::none());
        // Track extends past the fill on the right: some track remains.
        assert!(count_pixels(&img, style::TRACK) > 0);
        assert!(count_pixels(&img, spec.fill_color) > 0);
    }
}

#[test]
fn test_positive_delta_scenario() {
    // Bullet(23.2, 21.2): delta +2.0, positive badge color only.
    let (text, color) = delta_badge(23.2, 21.2);
    assert_eq!(text, "+2.0");
    assert_eq!(color, style::BADGE_POSITIVE);

    let spec = BulletSpec::new(23.2, 21.2, "2024-10 vs decade mean");
    let img = render_bullet(&spec, &ChartFonts::none());

    assert!(count_pixels(&img, style::BADGE_POSITIVE) > 0);
    assert_eq!(count_pixels(&img, style::BADGE_NON_POSITIVE), 0);
}

#[test]
fn test_equal_value_and_target_uses_non_positive_badge() {
    let spec = BulletSpec::new(22.6, 22.6, "flat");
    let img = render_bullet(&spec, &ChartFonts::none());

    assert!(count_pixels(&img, style::BADGE_NON_POSITIVE) > 0);
    assert_eq!(count_pixels(&img, style::BADGE_POSITIVE), 0);
}

#[test]
fn test_marker_and_fill_positions() {
    let spec = BulletSpec::new(23.2, 21.2, "positions");
    let img = render_bullet(&spec, &ChartFonts::none());

    // Geometry derived from the 500x260 default layout.
    let (vmin, vmax) = axis_range(23.2, 21.2);
    let plot_x0 = 25.0_f64;
    let plot_w = 450.0_f64;
    let value_x = plot_x0 + (23.2 - vmin) / (vmax - vmin) * plot_w;
    let target_x = plot_x0 + (21.2 - vmin) / (vmax - vmin) * plot_w;
    let yc = 137u32;

    // Fill left of the bar end, track beyond it, ink at the marker.
    let fill = image::Rgba([
        spec.fill_color.r,
        spec.fill_color.g,
        spec.fill_color.b,
        255,
    ]);
    let track = image::Rgba([style::TRACK.r, style::TRACK.g, style::TRACK.b, 255]);
    let ink = image::Rgba([style::INK.r, style::INK.g, style::INK.b, 255]);

    assert_eq!(*img.get_pixel(value_x as u32 - 20, yc), fill);
    assert_eq!(*img.get_pixel(value_x as u32 + 20, yc), track);
    assert_eq!(*img.get_pixel(target_x as u32, yc), ink);
}

#[test]
fn test_custom_fill_color() {
    let spec = BulletSpec::new(19.8, 19.2, "annual").with_fill(Color::from_hex("#2E86AB").unwrap());
    let img = render_bullet(&spec, &ChartFonts::none());
    assert!(count_pixels(&img, Color::from_hex("#2E86AB").unwrap()) > 0);
}
