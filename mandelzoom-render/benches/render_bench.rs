use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use mandelzoom_core::ViewportModel;
use mandelzoom_render::{render, ColorParams, Palette, RenderCancel};

fn bench_full_frame_render(c: &mut Criterion) {
    let view = ViewportModel::default();
    let cancel = Arc::new(RenderCancel::new());

    c.bench_function("full_frame_640x480", |b| {
        b.iter(|| render(view, 640, 480, &cancel));
    });
}

fn bench_deep_zoom_render(c: &mut Criterion) {
    // Twenty zoom-in steps: smaller window, much larger budget.
    let mut view = ViewportModel::default();
    for _ in 0..20 {
        view.zoom(0.9, -0.7436, 0.1318).unwrap();
    }
    let cancel = Arc::new(RenderCancel::new());

    c.bench_function("deep_zoom_256x256", |b| {
        b.iter(|| render(view, 256, 256, &cancel));
    });
}

fn bench_colorize(c: &mut Criterion) {
    let view = ViewportModel::default();
    let cancel = Arc::new(RenderCancel::new());
    let result = render(view, 640, 480, &cancel);
    let palette = Palette::default();
    let params = ColorParams::for_budget(result.iterations.max_iterations, true);

    c.bench_function("colorize_640x480", |b| {
        b.iter(|| palette.colorize(&result.iterations, &params));
    });
}

criterion_group!(
    benches,
    bench_full_frame_render,
    bench_deep_zoom_render,
    bench_colorize
);
criterion_main!(benches);
