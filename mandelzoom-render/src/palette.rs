use mandelzoom_core::EscapeTime;
use rayon::prelude::*;

use crate::buffer::RenderBuffer;
use crate::iteration_buffer::IterationBuffer;

const LUT_SIZE: usize = 256;

/// The one fixed color for bounded points.
pub const INTERIOR_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Parameters for mapping escape counts to palette colors.
///
/// `cycle_length` is the number of iterations one full palette sweep
/// covers. Deriving it from the frame's iteration budget keeps the
/// mapping continuous while zooming: as the budget grows the gradient
/// stretches with it instead of strobing.
#[derive(Debug, Clone, Copy)]
pub struct ColorParams {
    /// Use the renormalized fractional iteration count for band-free
    /// gradients.
    pub smooth: bool,
    /// Iterations per palette cycle.
    pub cycle_length: u32,
}

impl ColorParams {
    /// One palette sweep across the whole iteration budget.
    pub fn for_budget(max_iterations: u32, smooth: bool) -> Self {
        Self {
            smooth,
            cycle_length: max_iterations.max(1),
        }
    }
}

/// A color palette backed by a gradient lookup table.
///
/// Each palette is a ring of `LUT_SIZE` RGBA colors. Escape counts map to
/// a fractional index and the final color is linearly interpolated between
/// adjacent entries. The mapping is a pure function of the escape result
/// and the params — identical inputs always produce identical pixels.
#[derive(Clone)]
pub struct Palette {
    pub name: &'static str,
    colors: Vec<[u8; 4]>,
}

impl Palette {
    pub fn new(name: &'static str, colors: Vec<[u8; 4]>) -> Self {
        assert!(!colors.is_empty());
        Self { name, colors }
    }

    /// Map a single escape-time result to an RGBA color.
    pub fn color(&self, result: EscapeTime, params: &ColorParams) -> [u8; 4] {
        match result {
            EscapeTime::Bounded => INTERIOR_COLOR,
            EscapeTime::Escaped {
                iterations,
                norm_sq,
            } => {
                let t = if params.smooth {
                    smooth_iteration(iterations, norm_sq)
                } else {
                    iterations as f64
                };
                let cycle_len = params.cycle_length.max(1) as f64;
                let cycle_pos = (t % cycle_len) / cycle_len;
                self.sample(cycle_pos * self.colors.len() as f64)
            }
        }
    }

    /// Colorize an entire iteration buffer into an RGBA pixel buffer.
    ///
    /// Per-pixel and embarrassingly parallel, same as the evaluation pass.
    pub fn colorize(&self, iter_buf: &IterationBuffer, params: &ColorParams) -> RenderBuffer {
        let len = iter_buf.data.len();
        let mut pixels = vec![0u8; len * 4];
        pixels
            .par_chunks_mut(4)
            .zip(iter_buf.data.par_iter())
            .for_each(|(pixel, &result)| {
                pixel.copy_from_slice(&self.color(result, params));
            });
        RenderBuffer {
            width: iter_buf.width,
            height: iter_buf.height,
            pixels,
        }
    }

    fn sample(&self, t: f64) -> [u8; 4] {
        let len = self.colors.len() as f64;
        let idx = t.rem_euclid(len);
        let lo = idx.floor() as usize % self.colors.len();
        let hi = (lo + 1) % self.colors.len();
        let frac = idx - idx.floor();
        lerp_color(self.colors[lo], self.colors[hi], frac)
    }
}

impl Default for Palette {
    fn default() -> Self {
        classic()
    }
}

// ---------------------------------------------------------------------------
// Smooth coloring
// ---------------------------------------------------------------------------

/// Compute the smooth (continuous) iteration count.
///
/// Standard renormalization: ν = n + 1 − log₂(ln |zₙ|).
fn smooth_iteration(iterations: u32, norm_sq: f64) -> f64 {
    let log_zn = norm_sq.ln() * 0.5; // ln(|z_n|)
    if log_zn <= 0.0 {
        return iterations as f64;
    }
    iterations as f64 + 1.0 - log_zn.ln() / std::f64::consts::LN_2
}

fn lerp_color(a: [u8; 4], b: [u8; 4], t: f64) -> [u8; 4] {
    let inv = 1.0 - t;
    [
        (a[0] as f64 * inv + b[0] as f64 * t) as u8,
        (a[1] as f64 * inv + b[1] as f64 * t) as u8,
        (a[2] as f64 * inv + b[2] as f64 * t) as u8,
        255,
    ]
}

// ---------------------------------------------------------------------------
// Builtin palettes
// ---------------------------------------------------------------------------

pub fn builtin_palettes() -> Vec<Palette> {
    vec![classic(), fire(), grayscale()]
}

/// Build a gradient LUT by interpolating between color stops.
fn gradient_lut(stops: &[(f64, [u8; 3])]) -> Vec<[u8; 4]> {
    (0..LUT_SIZE)
        .map(|i| {
            let t = i as f64 / LUT_SIZE as f64;
            let mut lo = 0;
            for (j, &(pos, _)) in stops.iter().enumerate() {
                if pos <= t {
                    lo = j;
                }
            }
            let hi = (lo + 1).min(stops.len() - 1);
            let (lo_t, lo_c) = stops[lo];
            let (hi_t, hi_c) = stops[hi];
            let frac = if (hi_t - lo_t).abs() < 1e-10 {
                0.0
            } else {
                ((t - lo_t) / (hi_t - lo_t)).clamp(0.0, 1.0)
            };
            let inv = 1.0 - frac;
            [
                (lo_c[0] as f64 * inv + hi_c[0] as f64 * frac) as u8,
                (lo_c[1] as f64 * inv + hi_c[1] as f64 * frac) as u8,
                (lo_c[2] as f64 * inv + hi_c[2] as f64 * frac) as u8,
                255,
            ]
        })
        .collect()
}

fn classic() -> Palette {
    let stops = &[
        (0.0, [0, 7, 100]),
        (0.16, [32, 107, 203]),
        (0.42, [237, 255, 255]),
        (0.6425, [255, 170, 0]),
        (0.8575, [0, 2, 0]),
        (1.0, [0, 7, 100]),
    ];
    Palette::new("Classic", gradient_lut(stops))
}

fn fire() -> Palette {
    let stops = &[
        (0.0, [0, 0, 0]),
        (0.25, [128, 0, 0]),
        (0.5, [255, 128, 0]),
        (0.75, [255, 255, 0]),
        (1.0, [255, 255, 255]),
    ];
    Palette::new("Fire", gradient_lut(stops))
}

fn grayscale() -> Palette {
    let stops = &[(0.0, [0, 0, 0]), (1.0, [255, 255, 255])];
    Palette::new("Grayscale", gradient_lut(stops))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
