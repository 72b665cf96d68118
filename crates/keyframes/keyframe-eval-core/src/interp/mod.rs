//! Easing and interpolation.
//!
//! Each segment between two keyframes is timed by a cubic-bezier curve built
//! from the first keyframe's outgoing handle and the second keyframe's
//! incoming handle. A caller-supplied [`Interpolator`] can replace the curve.

pub mod bezier;
pub mod functions;
pub mod presets;

use std::sync::Arc;

use crate::data::Keyframe;
use crate::error::Result;

pub use bezier::{make_easing, BezierEasing};
pub use presets::{EasingPreset, SegmentHandles};

/// Strategy that maps a segment's linear progress to eased progress,
/// replacing Bezier construction entirely.
///
/// Receives the linear progress in `[0, 1]`, the current keyframe's
/// `ease_out` and the next keyframe's `ease_in` (both raw percentages).
pub trait Interpolator {
    fn ease(&self, progress: f64, ease_out: f64, ease_in: f64) -> f64;
}

impl<F> Interpolator for F
where
    F: Fn(f64, f64, f64) -> f64,
{
    #[inline]
    fn ease(&self, progress: f64, ease_out: f64, ease_in: f64) -> f64 {
        self(progress, ease_out, ease_in)
    }
}

/// An interpolator that can be stored in a shared evaluator.
pub type SharedInterpolator = Arc<dyn Interpolator + Send + Sync>;

/// Bezier control points `[x1, y1, x2, y2]` for the segment `cur -> next`.
#[inline]
pub fn segment_control_points(cur: &Keyframe, next: &Keyframe) -> [f64; 4] {
    [
        cur.ease_out / 100.0,
        cur.velocity_out / 100.0,
        1.0 - next.ease_in / 100.0,
        1.0 - next.velocity_in / 100.0,
    ]
}

/// Build the easing curve for the segment `cur -> next`.
pub fn segment_easing(cur: &Keyframe, next: &Keyframe) -> Result<BezierEasing> {
    let [x1, y1, x2, y2] = segment_control_points(cur, next);
    BezierEasing::new(x1, y1, x2, y2)
}
