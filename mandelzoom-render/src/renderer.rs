use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use mandelzoom_core::{escape_time, EscapeTime, ViewportModel};

use crate::iteration_buffer::IterationBuffer;
use crate::tile::{build_tile_grid, Tile};

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Tracks the current render generation for cancellation and progress.
///
/// Incrementing the generation signals all in-flight tiles to stop early.
/// The progress counters let a UI display a progress bar.
#[derive(Debug)]
pub struct RenderCancel {
    generation: AtomicU64,
    progress_done: AtomicUsize,
    progress_total: AtomicUsize,
}

impl RenderCancel {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            progress_done: AtomicUsize::new(0),
            progress_total: AtomicUsize::new(0),
        }
    }

    /// Cancel the current render by advancing the generation.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Read the current generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Reset progress for a new render with `total` tiles.
    pub fn reset_progress(&self, total: usize) {
        self.progress_total.store(total, Ordering::Relaxed);
        self.progress_done.store(0, Ordering::Relaxed);
    }

    /// Increment completed tiles by one.
    pub fn inc_progress(&self) {
        self.progress_done.fetch_add(1, Ordering::Relaxed);
    }

    /// Read the current progress as `(done, total)`.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.progress_done.load(Ordering::Relaxed),
            self.progress_total.load(Ordering::Relaxed),
        )
    }
}

impl Default for RenderCancel {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// The result of a full-frame evaluation pass.
///
/// Contains raw escape-time data (no coloring) — the caller applies a
/// `Palette` to produce displayable pixels.
pub struct RenderResult {
    pub iterations: IterationBuffer,
    pub elapsed: Duration,
    pub cancelled: bool,
    pub tiles_rendered: usize,
}

// ---------------------------------------------------------------------------
// Per-tile evaluation
// ---------------------------------------------------------------------------

/// Evaluate every pixel of one tile.
///
/// Pixels are sampled at their centers and mapped to normalized surface
/// coordinates; `v` is flipped so the top image row shows the top of the
/// viewport rectangle (positive imaginary axis up).
fn render_tile(view: &ViewportModel, tile: &Tile, surface_w: u32, surface_h: u32) -> Vec<EscapeTime> {
    let inv_w = 1.0 / surface_w as f64;
    let inv_h = 1.0 / surface_h as f64;

    let mut data = Vec::with_capacity(tile.pixel_count());
    for py in 0..tile.height {
        let v = 1.0 - ((tile.y + py) as f64 + 0.5) * inv_h;
        for px in 0..tile.width {
            let u = ((tile.x + px) as f64 + 0.5) * inv_w;
            let c = view.point_at(u, v);
            data.push(escape_time(c, view.max_iterations));
        }
    }
    data
}

// ---------------------------------------------------------------------------
// Full-frame render
// ---------------------------------------------------------------------------

/// Render a full `width × height` frame using the tiled, multithreaded
/// pipeline.
///
/// The viewport is taken **by value**: the pass runs against an immutable
/// snapshot, so a zoom applied while tiles are in flight can never tear
/// the frame. Tiles are processed in parallel via Rayon — every pixel is
/// an independent evaluation, so the only coordination is the cancellation
/// generation check between tiles.
///
/// Returns raw escape-time data — apply a `Palette` to get displayable
/// pixels.
pub fn render(
    view: ViewportModel,
    width: u32,
    height: u32,
    cancel: &Arc<RenderCancel>,
) -> RenderResult {
    let start = Instant::now();
    let gen = cancel.generation();

    let tiles = build_tile_grid(width, height);
    debug!(
        tile_count = tiles.len(),
        width,
        height,
        max_iterations = view.max_iterations,
        "Starting tiled render"
    );
    cancel.reset_progress(tiles.len());

    let tile_data: Vec<Option<Vec<EscapeTime>>> = tiles
        .par_iter()
        .map(|tile| {
            if cancel.generation() != gen {
                return None;
            }
            let data = render_tile(&view, tile, width, height);
            cancel.inc_progress();
            Some(data)
        })
        .collect();

    let cancelled = cancel.generation() != gen;
    let tiles_rendered = tile_data.iter().filter(|d| d.is_some()).count();

    let mut iterations = IterationBuffer::new(width, height, view.max_iterations);
    for (tile, data) in tiles.iter().zip(tile_data.iter()) {
        if let Some(d) = data {
            iterations.blit_tile(tile, d);
        }
    }

    let elapsed = start.elapsed();
    info!(
        elapsed_ms = elapsed.as_millis(),
        tiles_rendered, cancelled, "Render complete"
    );

    RenderResult {
        iterations,
        elapsed,
        cancelled,
        tiles_rendered,
    }
}
