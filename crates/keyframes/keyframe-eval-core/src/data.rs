//! Canonical keyframe data model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::KeyframeDefaults;

/// Shape of a [`KeyValue`], reported in type-mismatch errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Scalar,
    Vector { len: usize },
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Scalar => write!(f, "number"),
            ValueKind::Vector { len } => write!(f, "array of {len} numbers"),
        }
    }
}

/// Animated value anchored by a keyframe: a number or a fixed-length vector.
///
/// Serialises untagged so the wire form is a bare number or array.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum KeyValue {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl KeyValue {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            KeyValue::Scalar(_) => ValueKind::Scalar,
            KeyValue::Vector(v) => ValueKind::Vector { len: v.len() },
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            KeyValue::Scalar(v) => Some(*v),
            KeyValue::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            KeyValue::Scalar(_) => None,
            KeyValue::Vector(v) => Some(v),
        }
    }
}

impl From<f64> for KeyValue {
    fn from(v: f64) -> Self {
        KeyValue::Scalar(v)
    }
}

impl From<Vec<f64>> for KeyValue {
    fn from(v: Vec<f64>) -> Self {
        KeyValue::Vector(v)
    }
}

impl<const N: usize> From<[f64; N]> for KeyValue {
    fn from(v: [f64; N]) -> Self {
        KeyValue::Vector(v.to_vec())
    }
}

/// A single keyframe: time, value, and the Bezier handle percentages on
/// either side of it.
///
/// `ease_*` set the handle's horizontal reach (percent of the segment
/// duration); `velocity_*` set its vertical offset (percent of the value
/// change), which allows overshoot.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    pub key_time: f64,
    pub key_value: KeyValue,
    pub ease_in: f64,
    pub ease_out: f64,
    pub velocity_in: f64,
    pub velocity_out: f64,
}

impl Keyframe {
    /// Keyframe with the standard handle defaults (33/33/0/0).
    pub fn new(key_time: f64, key_value: impl Into<KeyValue>) -> Self {
        Self::with_defaults(key_time, key_value, &KeyframeDefaults::default())
    }

    pub fn with_defaults(
        key_time: f64,
        key_value: impl Into<KeyValue>,
        defaults: &KeyframeDefaults,
    ) -> Self {
        Self {
            key_time,
            key_value: key_value.into(),
            ease_in: defaults.ease_in,
            ease_out: defaults.ease_out,
            velocity_in: defaults.velocity_in,
            velocity_out: defaults.velocity_out,
        }
    }

    pub fn with_ease(mut self, ease_in: f64, ease_out: f64) -> Self {
        self.ease_in = ease_in;
        self.ease_out = ease_out;
        self
    }

    pub fn with_velocity(mut self, velocity_in: f64, velocity_out: f64) -> Self {
        self.velocity_in = velocity_in;
        self.velocity_out = velocity_out;
        self
    }

    /// Zero-length handles on both sides; segments between two linear
    /// keyframes interpolate without easing.
    pub fn linear(key_time: f64, key_value: impl Into<KeyValue>) -> Self {
        Self::new(key_time, key_value)
            .with_ease(0.0, 0.0)
            .with_velocity(0.0, 0.0)
    }
}
