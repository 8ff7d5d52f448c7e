use crate::complex::Complex;
use crate::viewport::ViewportModel;

/// Escape radius of 2 — compared squared so the loop never takes a root.
const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// The classification of a single complex point.
///
/// Recomputed every frame; results have no identity beyond the
/// `(c, max_iterations)` pair that produced them. Coloring downstream
/// maps `Bounded` to one fixed interior color and `Escaped` through a
/// deterministic function of the iteration count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EscapeTime {
    /// The orbit left the disc of radius 2 on iteration `iterations`
    /// (1-based: a point with `|c| > 2` escapes on iteration 1).
    /// `norm_sq` is `|z|²` at the moment of escape, kept for smooth
    /// coloring.
    Escaped { iterations: u32, norm_sq: f64 },

    /// The orbit stayed bounded for the whole iteration budget.
    Bounded,
}

/// Returns `true` if `c` lies inside the main cardioid.
///
/// Closed-form membership test; such points never escape, so the loop
/// can be skipped entirely. At the default view this covers a large
/// fraction of interior pixels.
#[inline]
fn in_cardioid(re: f64, im: f64) -> bool {
    let im2 = im * im;
    let q = (re - 0.25) * (re - 0.25) + im2;
    q * (q + (re - 0.25)) <= 0.25 * im2
}

/// Returns `true` if `c` lies inside the period-2 bulb.
#[inline]
fn in_period2_bulb(re: f64, im: f64) -> bool {
    (re + 1.0) * (re + 1.0) + im * im <= 0.0625
}

/// Classify the point `c` by iterating `z ← z² + c` from `z₀ = 0`.
///
/// Stateless and total: always returns within `max_iterations` steps.
/// Every invocation is independent of every other, so callers are free
/// to evaluate pixels concurrently in any order.
pub fn escape_time(c: Complex, max_iterations: u32) -> EscapeTime {
    if in_cardioid(c.re, c.im) || in_period2_bulb(c.re, c.im) {
        return EscapeTime::Bounded;
    }

    let mut z = Complex::ZERO;
    for n in 1..=max_iterations {
        // z = z² + c, with the complex square written out.
        z = Complex::new(z.re * z.re - z.im * z.im + c.re, 2.0 * z.re * z.im + c.im);

        let norm_sq = z.norm_sq();
        if norm_sq > ESCAPE_RADIUS_SQ {
            return EscapeTime::Escaped {
                iterations: n,
                norm_sq,
            };
        }
    }

    EscapeTime::Bounded
}

/// Evaluate one normalized pixel coordinate against a viewport.
///
/// `u, v ∈ [0, 1]` are resolution-independent surface coordinates; the
/// viewport maps them linearly to the complex plane. Pure function of its
/// inputs — the data-parallel contract of the renderer rests on this.
#[inline]
pub fn evaluate(u: f64, v: f64, view: &ViewportModel) -> EscapeTime {
    escape_time(view.point_at(u, v), view.max_iterations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_bounded() {
        assert_eq!(escape_time(Complex::ZERO, 50), EscapeTime::Bounded);
    }

    #[test]
    fn minus_one_is_bounded() {
        // c = -1 gives the orbit 0 → -1 → 0 → -1 … (period 2)
        assert_eq!(escape_time(Complex::new(-1.0, 0.0), 50), EscapeTime::Bounded);
    }

    #[test]
    fn far_point_escapes_on_first_iteration() {
        // |2 + 2i| > 2, so z₁ = c already lies outside the escape disc.
        match escape_time(Complex::new(2.0, 2.0), 50) {
            EscapeTime::Escaped { iterations, norm_sq } => {
                assert_eq!(iterations, 1);
                assert!((norm_sq - 8.0).abs() < 1e-12);
            }
            EscapeTime::Bounded => panic!("|c| > 2 must escape immediately"),
        }
    }

    #[test]
    fn known_escape_count() {
        // c = 1: z₁ = 1 (|z|² = 1), z₂ = 2 (|z|² = 4, not > 4), z₃ = 5 → escapes on 3.
        match escape_time(Complex::new(1.0, 0.0), 50) {
            EscapeTime::Escaped { iterations, .. } => assert_eq!(iterations, 3),
            EscapeTime::Bounded => panic!("c = 1 must escape"),
        }
    }

    #[test]
    fn budget_of_one_still_catches_immediate_escapes() {
        assert!(matches!(
            escape_time(Complex::new(3.0, 0.0), 1),
            EscapeTime::Escaped { iterations: 1, .. }
        ));
        // A slow-escaping point is declared bounded under a budget of 1.
        assert_eq!(escape_time(Complex::new(0.3, 0.5), 1), EscapeTime::Bounded);
    }

    #[test]
    fn center_of_default_view_is_bounded() {
        // (0.5, 0.5) maps to c = -0.5 + 0i, deep inside the set.
        let vp = ViewportModel::default();
        assert_eq!(evaluate(0.5, 0.5, &vp), EscapeTime::Bounded);
    }

    #[test]
    fn far_corner_of_default_view_escapes_immediately() {
        // (1, 1) maps to c = 1.5 + 2i, |c|² = 6.25 > 4.
        let vp = ViewportModel::default();
        assert!(matches!(
            evaluate(1.0, 1.0, &vp),
            EscapeTime::Escaped { iterations: 1, .. }
        ));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let vp = ViewportModel::default();
        let coords = [
            (0.5, 0.5),
            (0.1, 0.9),
            (0.73, 0.21),
            (0.0, 0.0),
            (1.0, 1.0),
        ];
        let run1: Vec<_> = coords.iter().map(|&(u, v)| evaluate(u, v, &vp)).collect();
        let run2: Vec<_> = coords.iter().map(|&(u, v)| evaluate(u, v, &vp)).collect();
        assert_eq!(run1, run2, "identical inputs must produce identical results");
    }

    #[test]
    fn cardioid_shortcut_agrees_with_iteration() {
        // c = 0.2 is inside the cardioid; a long honest iteration agrees.
        let c = Complex::new(0.2, 0.0);
        assert!(in_cardioid(c.re, c.im));
        assert_eq!(escape_time(c, 10_000), EscapeTime::Bounded);
    }

    #[test]
    fn escape_count_independent_of_budget() {
        // A point just outside the set escapes late; the count must not
        // depend on the budget once it fits within it.
        let c = Complex::new(-0.75, 0.1);
        let a = escape_time(c, 100);
        let b = escape_time(c, 10_000);
        if let (
            EscapeTime::Escaped { iterations: ia, .. },
            EscapeTime::Escaped { iterations: ib, .. },
        ) = (a, b)
        {
            assert_eq!(ia, ib);
        } else {
            panic!("-0.75 + 0.1i should escape within 100 iterations");
        }
    }
}
