//! Value interpolation helpers:
//! - lerp (scalar)
//! - interpolate (scalar or element-wise vector, shape-checked)

use crate::data::KeyValue;
use crate::error::{KeyframeError, Location, Result};

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Blend two keyframe values by `progress`.
///
/// Both values must have the same shape. `segment` is the index of the
/// segment's first keyframe and is only used in error reports.
pub fn interpolate(
    start: &KeyValue,
    end: &KeyValue,
    progress: f64,
    segment: usize,
) -> Result<KeyValue> {
    match (start, end) {
        (KeyValue::Scalar(a), KeyValue::Scalar(b)) => Ok(KeyValue::Scalar(lerp(*a, *b, progress))),
        (KeyValue::Vector(a), KeyValue::Vector(b)) => {
            if a.len() != b.len() {
                return Err(KeyframeError::DimensionMismatch {
                    left: a.len(),
                    right: b.len(),
                    at: Location::Segment(segment),
                });
            }
            Ok(KeyValue::Vector(
                a.iter()
                    .zip(b.iter())
                    .map(|(aa, bb)| lerp(*aa, *bb, progress))
                    .collect(),
            ))
        }
        // No coercion between a scalar and a vector.
        _ => Err(KeyframeError::type_mismatch(
            "keyValue",
            start.kind().to_string(),
            end.kind().to_string(),
            Location::Segment(segment),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(v: &[f64]) -> KeyValue {
        KeyValue::Vector(v.to_vec())
    }

    #[test]
    fn scalar_and_vector_blend() {
        let v = interpolate(&KeyValue::Scalar(0.0), &KeyValue::Scalar(100.0), 0.25, 0).unwrap();
        assert_eq!(v, KeyValue::Scalar(25.0));

        let v = interpolate(&vector(&[0.0, 0.0]), &vector(&[10.0, 20.0]), 0.5, 0).unwrap();
        assert_eq!(v, vector(&[5.0, 10.0]));
    }

    #[test]
    fn mixed_shapes_are_rejected() {
        let err = interpolate(&KeyValue::Scalar(1.0), &vector(&[1.0, 2.0]), 0.5, 3).unwrap_err();
        assert_eq!(err.category(), "TypeMismatch");
        assert!(err.to_string().contains("segment 3"), "{err}");
    }

    #[test]
    fn vector_length_mismatch_names_both_lengths() {
        let err = interpolate(&vector(&[0.0, 0.0]), &vector(&[0.0, 0.0, 0.0]), 0.5, 1).unwrap_err();
        assert_eq!(
            err,
            KeyframeError::DimensionMismatch {
                left: 2,
                right: 3,
                at: Location::Segment(1)
            }
        );
    }
}
