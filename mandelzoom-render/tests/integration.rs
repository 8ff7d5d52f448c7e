use std::sync::Arc;

use mandelzoom_core::ViewportModel;
use mandelzoom_render::{builtin_palettes, render, ColorParams, Palette, RenderCancel};

#[test]
fn end_to_end_render_and_colorize() {
    let view = ViewportModel::default();
    let cancel = Arc::new(RenderCancel::new());

    let result = render(view, 200, 150, &cancel);

    assert!(!result.cancelled);
    assert_eq!(result.iterations.width, 200);
    assert_eq!(result.iterations.height, 150);
    assert_eq!(result.iterations.data.len(), 200 * 150);
    assert!(result.tiles_rendered > 0);
    assert!(result.elapsed.as_nanos() > 0);

    // Colorize and check the image is not entirely black.
    let palette = Palette::default();
    let params = ColorParams::for_budget(result.iterations.max_iterations, true);
    let buffer = palette.colorize(&result.iterations, &params);
    let has_non_black = buffer
        .pixels
        .chunks_exact(4)
        .any(|px| px[0] > 0 || px[1] > 0 || px[2] > 0);
    assert!(
        has_non_black,
        "rendered image should contain non-black pixels"
    );
}

#[test]
fn render_determinism() {
    let view = ViewportModel::default();
    let cancel = Arc::new(RenderCancel::new());

    let r1 = render(view, 128, 96, &cancel);
    let r2 = render(view, 128, 96, &cancel);

    assert_eq!(
        r1.iterations.data, r2.iterations.data,
        "renders must be deterministic"
    );
}

#[test]
fn zoomed_render_uses_grown_budget() {
    let mut view = ViewportModel::default();
    for _ in 0..10 {
        view.zoom(0.9, -0.5, 0.0).unwrap();
    }
    let cancel = Arc::new(RenderCancel::new());
    let result = render(view, 96, 96, &cancel);

    assert_eq!(result.iterations.max_iterations, view.max_iterations);
    assert!(result.iterations.max_iterations > ViewportModel::DEFAULT_MAX_ITERATIONS);
}

#[test]
fn snapshot_render_ignores_later_mutation() {
    // The render call takes the model by value; mutating the live model
    // afterwards must not change the result of the pass.
    let mut view = ViewportModel::default();
    let snapshot = view;
    let cancel = Arc::new(RenderCancel::new());

    let before = render(snapshot, 64, 64, &cancel);
    view.zoom(0.5, -0.5, 0.0).unwrap();
    let after = render(snapshot, 64, 64, &cancel);

    assert_eq!(before.iterations.data, after.iterations.data);
}

#[test]
fn palette_switch_without_recompute() {
    let view = ViewportModel::default();
    let cancel = Arc::new(RenderCancel::new());

    let result = render(view, 128, 96, &cancel);

    // Apply two different palettes to the same iteration data.
    let palettes = builtin_palettes();
    let params = ColorParams::for_budget(result.iterations.max_iterations, true);
    let buf_a = palettes[0].colorize(&result.iterations, &params);
    let buf_b = palettes[1].colorize(&result.iterations, &params);

    assert_eq!(buf_a.pixels.len(), 128 * 96 * 4);
    assert_eq!(buf_b.pixels.len(), 128 * 96 * 4);
    assert_ne!(
        buf_a.pixels, buf_b.pixels,
        "different palettes should produce different images"
    );
}
