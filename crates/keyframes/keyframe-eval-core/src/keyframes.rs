//! Canonical, time-sorted keyframe sequence.

use std::cmp::Ordering;
use std::ops::Deref;
use std::sync::Arc;

use log::debug;

use crate::data::Keyframe;
use crate::error::{KeyframeError, Location, Result};

/// Validated keyframes ordered by `key_time` ascending.
///
/// Keyframes sharing a time keep the order they were supplied in. The
/// sequence is immutable; replace it wholesale to change the animation.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframes {
    keys: Arc<[Keyframe]>,
}

impl Keyframes {
    /// Validate and sort typed keyframes.
    ///
    /// Fails on an empty list or a non-finite `key_time`. Nothing is sorted
    /// unless every keyframe passes.
    pub fn new(keys: Vec<Keyframe>) -> Result<Self> {
        if keys.is_empty() {
            return Err(KeyframeError::missing("keyframes", Location::Argument));
        }
        for (index, key) in keys.iter().enumerate() {
            check_finite_time(key.key_time, index)?;
        }
        Ok(Self::sorted(keys))
    }

    /// Sort already-validated keyframes. Stable, so ties keep input order.
    pub(crate) fn sorted(mut keys: Vec<Keyframe>) -> Self {
        // Times are finite here; -0.0 and 0.0 compare equal and keep input order.
        keys.sort_by(|a, b| {
            a.key_time
                .partial_cmp(&b.key_time)
                .unwrap_or(Ordering::Equal)
        });

        let duplicates = keys
            .windows(2)
            .filter(|w| w[0].key_time == w[1].key_time)
            .count();
        if duplicates > 0 {
            debug!(
                "keyframes: {} keys, {duplicates} share a time with their predecessor",
                keys.len()
            );
        } else {
            debug!("keyframes: {} keys validated", keys.len());
        }

        Self { keys: keys.into() }
    }

    pub fn first(&self) -> &Keyframe {
        &self.keys[0]
    }

    pub fn last(&self) -> &Keyframe {
        &self.keys[self.keys.len() - 1]
    }

    /// Time span `(first.key_time, last.key_time)`.
    pub fn time_range(&self) -> (f64, f64) {
        (self.first().key_time, self.last().key_time)
    }

    pub fn as_slice(&self) -> &[Keyframe] {
        &self.keys
    }
}

fn check_finite_time(time: f64, index: usize) -> Result<()> {
    if time.is_finite() {
        return Ok(());
    }
    Err(KeyframeError::type_mismatch(
        "keyTime",
        "finite number",
        time.to_string(),
        Location::Keyframe(index),
    ))
}

impl Deref for Keyframes {
    type Target = [Keyframe];

    fn deref(&self) -> &[Keyframe] {
        &self.keys
    }
}

impl TryFrom<Vec<Keyframe>> for Keyframes {
    type Error = KeyframeError;

    fn try_from(keys: Vec<Keyframe>) -> Result<Self> {
        Self::new(keys)
    }
}
