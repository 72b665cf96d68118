//! Cubic-bezier easing solver.
//!
//! The curve runs from (0,0) to (1,1) with handles (x1,y1) and (x2,y2).
//! Evaluating it at progress `x` means finding the parameter `t` with
//! `bx(t) == x` and returning `by(t)`. `t` is found from an 11-sample lookup
//! table, refined with Newton-Raphson when the slope is usable and by
//! bisection when it is nearly flat.

use log::trace;

use crate::error::{KeyframeError, Result};

const NEWTON_ITERATIONS: usize = 4;
const NEWTON_MIN_SLOPE: f64 = 0.001;
const SUBDIVISION_PRECISION: f64 = 1e-7;
const SUBDIVISION_MAX_ITERATIONS: usize = 10;

const SPLINE_TABLE_SIZE: usize = 11;
const SAMPLE_STEP_SIZE: f64 = 1.0 / (SPLINE_TABLE_SIZE as f64 - 1.0);

#[inline]
fn coeff_a(a1: f64, a2: f64) -> f64 {
    1.0 - 3.0 * a2 + 3.0 * a1
}

#[inline]
fn coeff_b(a1: f64, a2: f64) -> f64 {
    3.0 * a2 - 6.0 * a1
}

#[inline]
fn coeff_c(a1: f64) -> f64 {
    3.0 * a1
}

/// One coordinate of the curve at `t`, given that coordinate's two handles.
#[inline]
fn calc_bezier(t: f64, a1: f64, a2: f64) -> f64 {
    ((coeff_a(a1, a2) * t + coeff_b(a1, a2)) * t + coeff_c(a1)) * t
}

/// d/dt of [`calc_bezier`].
#[inline]
fn get_slope(t: f64, a1: f64, a2: f64) -> f64 {
    3.0 * coeff_a(a1, a2) * t * t + 2.0 * coeff_b(a1, a2) * t + coeff_c(a1)
}

fn binary_subdivide(x: f64, mut a: f64, mut b: f64, x1: f64, x2: f64) -> f64 {
    let mut current_t = a;
    for _ in 0..SUBDIVISION_MAX_ITERATIONS {
        current_t = a + (b - a) / 2.0;
        let current_x = calc_bezier(current_t, x1, x2) - x;
        if current_x > 0.0 {
            b = current_t;
        } else {
            a = current_t;
        }
        if current_x.abs() <= SUBDIVISION_PRECISION {
            break;
        }
    }
    current_t
}

fn newton_raphson_iterate(x: f64, mut guess_t: f64, x1: f64, x2: f64) -> f64 {
    for _ in 0..NEWTON_ITERATIONS {
        let slope = get_slope(guess_t, x1, x2);
        if slope == 0.0 {
            return guess_t;
        }
        let current_x = calc_bezier(guess_t, x1, x2) - x;
        guess_t -= current_x / slope;
    }
    guess_t
}

#[derive(Clone, Debug, PartialEq)]
enum Curve {
    /// Handles on the diagonal: the curve is the identity.
    Linear,
    Spline { samples: [f64; SPLINE_TABLE_SIZE] },
}

/// A cubic-bezier easing curve with precomputed sample table.
///
/// Immutable once built; cheap to clone and safe to share across threads.
#[derive(Clone, Debug, PartialEq)]
pub struct BezierEasing {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    curve: Curve,
}

impl BezierEasing {
    /// Build a curve from its handle positions.
    ///
    /// `x1` and `x2` must lie in `[0, 1]` so the curve stays a function of x.
    /// `y1`/`y2` are unconstrained, which allows overshoot.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self> {
        check_handle("x1", x1)?;
        check_handle("x2", x2)?;

        let curve = if x1 == y1 && x2 == y2 {
            Curve::Linear
        } else {
            let mut samples = [0.0; SPLINE_TABLE_SIZE];
            for (i, sample) in samples.iter_mut().enumerate() {
                *sample = calc_bezier(i as f64 * SAMPLE_STEP_SIZE, x1, x2);
            }
            Curve::Spline { samples }
        };

        Ok(Self {
            x1,
            y1,
            x2,
            y2,
            curve,
        })
    }

    /// The identity curve.
    pub fn linear() -> Self {
        Self {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
            curve: Curve::Linear,
        }
    }

    pub fn control_points(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    pub fn is_linear(&self) -> bool {
        matches!(self.curve, Curve::Linear)
    }

    /// Eased progress for linear progress `x`. Input is clamped to `[0, 1]`;
    /// the output may leave that range for overshooting handles.
    pub fn ease(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        match &self.curve {
            Curve::Linear => x,
            Curve::Spline { samples } => {
                // Exact endpoints, bypassing the table.
                if x == 0.0 || x == 1.0 {
                    return x;
                }
                let t = self.t_for_x(x, samples);
                calc_bezier(t, self.y1, self.y2)
            }
        }
    }

    fn t_for_x(&self, x: f64, samples: &[f64; SPLINE_TABLE_SIZE]) -> f64 {
        let last_sample = SPLINE_TABLE_SIZE - 1;
        // Greatest sample interval [i, i+1] whose start does not exceed x.
        let current = samples[1..last_sample].partition_point(|s| *s <= x);
        let interval_start = current as f64 * SAMPLE_STEP_SIZE;

        let dist = (x - samples[current]) / (samples[current + 1] - samples[current]);
        let guess_t = interval_start + dist * SAMPLE_STEP_SIZE;

        let initial_slope = get_slope(guess_t, self.x1, self.x2);
        if initial_slope >= NEWTON_MIN_SLOPE {
            newton_raphson_iterate(x, guess_t, self.x1, self.x2)
        } else if initial_slope == 0.0 {
            guess_t
        } else {
            trace!("bezier: flat slope {initial_slope} at t={guess_t}, bisecting");
            binary_subdivide(
                x,
                interval_start,
                interval_start + SAMPLE_STEP_SIZE,
                self.x1,
                self.x2,
            )
        }
    }
}

fn check_handle(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(KeyframeError::InvalidRange {
            name: name.to_string(),
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}

/// Build an easing function for handles `(x1, y1)` and `(x2, y2)`.
pub fn make_easing(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
) -> Result<impl Fn(f64) -> f64 + Clone + Send + Sync> {
    let easing = BezierEasing::new(x1, y1, x2, y2)?;
    Ok(move |x: f64| easing.ease(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_handles_collapse_to_linear() {
        assert!(BezierEasing::new(0.3, 0.3, 0.7, 0.7).unwrap().is_linear());
        assert!(!BezierEasing::new(0.42, 0.0, 0.58, 1.0).unwrap().is_linear());
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let e = BezierEasing::new(0.42, 0.0, 0.58, 1.0).unwrap();
        assert!((e.ease(0.5) - 0.5).abs() < 1e-6);
        let a = e.ease(0.2);
        let b = e.ease(0.8);
        assert!((a + b - 1.0).abs() < 1e-5, "{a} + {b}");
    }

    #[test]
    fn flat_start_uses_bisection_and_still_converges() {
        // x1 = x2 = 0 gives bx(t) = t^3, flat near t = 0.
        let e = BezierEasing::new(0.0, 0.0, 0.0, 1.0).unwrap();
        let x = 1e-6;
        let Curve::Spline { samples } = &e.curve else {
            panic!("expected spline");
        };
        let t = e.t_for_x(x, samples);
        assert!((t - 0.01).abs() < 1e-3, "t = {t}");
        assert!((calc_bezier(t, 0.0, 0.0) - x).abs() < 1e-6);
    }
}
