use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complex::Complex;
use crate::error::CoreError;

/// The visible rectangle of the complex plane plus the iteration budget.
///
/// This is the single source of truth the renderer reads each frame. Input
/// events mutate it between frames via [`zoom`](Self::zoom) and
/// [`reset`](Self::reset); an evaluation pass receives it **by value**, so a
/// pass can never observe a mutation mid-flight.
///
/// Invariants: `x_min < x_max`, `y_min < y_max`, `max_iterations >= 1`.
/// Bounds are plain `f64` — deep zoom sequences eventually exhaust double
/// precision relative to the span, which is an accepted limitation rather
/// than a bug (no arbitrary-precision fallback).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportModel {
    /// Left edge (real axis).
    pub x_min: f64,
    /// Right edge (real axis).
    pub x_max: f64,
    /// Bottom edge (imaginary axis).
    pub y_min: f64,
    /// Top edge (imaginary axis).
    pub y_max: f64,
    /// Escape-time budget per point.
    pub max_iterations: u32,
}

impl ViewportModel {
    pub const DEFAULT_X_MIN: f64 = -2.5;
    pub const DEFAULT_X_MAX: f64 = 1.5;
    pub const DEFAULT_Y_MIN: f64 = -2.0;
    pub const DEFAULT_Y_MAX: f64 = 2.0;
    pub const DEFAULT_MAX_ITERATIONS: u32 = 50;

    /// Create a viewport with explicit parameters.
    pub fn new(
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
        max_iterations: u32,
    ) -> crate::Result<Self> {
        if !(x_min < x_max) || !(y_min < y_max) {
            return Err(CoreError::InvalidBounds {
                reason: format!("degenerate rectangle [{x_min}, {x_max}] × [{y_min}, {y_max}]"),
            });
        }
        if max_iterations < 1 {
            return Err(CoreError::InvalidMaxIterations(max_iterations));
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
            max_iterations,
        })
    }

    /// Rescale the rectangle toward `(center_x, center_y)` by `factor`.
    ///
    /// A factor below 1 shrinks the rectangle (zoom in), above 1 grows it
    /// (zoom out). The iteration budget is rescaled by `1/factor` at the
    /// same time — boundary detail at higher magnification needs more
    /// iterations to resolve, and zooming back out drops the budget again
    /// to avoid wasted work. The budget truncates toward zero and is
    /// floored at 1: a zero budget would silently classify every point as
    /// bounded.
    ///
    /// A non-positive or non-finite factor is rejected and the model is
    /// left untouched.
    pub fn zoom(&mut self, factor: f64, center_x: f64, center_y: f64) -> crate::Result<()> {
        if !(factor > 0.0) || !factor.is_finite() {
            return Err(CoreError::InvalidZoomFactor(factor));
        }

        self.x_min = center_x - (center_x - self.x_min) * factor;
        self.x_max = center_x + (self.x_max - center_x) * factor;
        self.y_min = center_y - (center_y - self.y_min) * factor;
        self.y_max = center_y + (self.y_max - center_y) * factor;

        self.max_iterations = ((self.max_iterations as f64 * (1.0 / factor)) as u32).max(1);

        debug!(
            factor,
            x_min = self.x_min,
            x_max = self.x_max,
            y_min = self.y_min,
            y_max = self.y_max,
            max_iterations = self.max_iterations,
            "Zoom applied"
        );
        Ok(())
    }

    /// Restore the default rectangle and iteration budget unconditionally.
    pub fn reset(&mut self) {
        *self = Self::default();
        debug!("Viewport reset to defaults");
    }

    /// Width of the rectangle in complex-plane units.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height of the rectangle in complex-plane units.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Midpoint of the rectangle — the default zoom center.
    #[inline]
    pub fn center(&self) -> Complex {
        Complex::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Map a normalized pixel coordinate in `[0, 1]²` to the complex plane.
    ///
    /// `u = 0` maps to `x_min`, `u = 1` to `x_max`; likewise `v` along the
    /// imaginary axis. The mapping is linear and resolution-independent.
    #[inline]
    pub fn point_at(&self, u: f64, v: f64) -> Complex {
        Complex::new(self.x_min + u * self.width(), self.y_min + v * self.height())
    }
}

impl Default for ViewportModel {
    fn default() -> Self {
        Self {
            x_min: Self::DEFAULT_X_MIN,
            x_max: Self::DEFAULT_X_MAX,
            y_min: Self::DEFAULT_Y_MIN,
            y_max: Self::DEFAULT_Y_MAX,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }
}
