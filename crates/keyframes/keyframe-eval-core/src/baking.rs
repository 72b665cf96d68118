//! Baking API: sample an evaluator at a fixed frame rate over a time window.

use serde::{Deserialize, Serialize};

use crate::data::KeyValue;
use crate::error::{KeyframeError, Location, Result};
use crate::evaluator::KeyframeEvaluator;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BakingConfig {
    /// Samples per time unit.
    pub frame_rate: f64,
    /// Start time; if None, the first keyframe's time.
    pub start_time: Option<f64>,
    /// End time (inclusive); if None, the last keyframe's time.
    pub end_time: Option<f64>,
}

impl Default for BakingConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            start_time: None,
            end_time: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BakedKeyframes {
    pub frame_rate: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub values: Vec<KeyValue>,
}

/// Largest number of frames a single bake may produce.
pub const MAX_BAKED_FRAMES: usize = 1_000_000;

/// Frames covering `span` at `frame_rate`, inclusive of both ends.
fn frame_count(span: f64, frame_rate: f64) -> Result<usize> {
    let intervals = (span * frame_rate).ceil();
    let too_many = KeyframeError::InvalidRange {
        name: "frameCount".into(),
        value: intervals + 1.0,
        min: 1.0,
        max: MAX_BAKED_FRAMES as f64,
    };
    if !intervals.is_finite() || intervals >= MAX_BAKED_FRAMES as f64 {
        return Err(too_many);
    }
    (intervals as usize).checked_add(1).ok_or(too_many)
}

/// Bake `evaluator` using the provided config.
pub fn bake(evaluator: &KeyframeEvaluator, cfg: &BakingConfig) -> Result<BakedKeyframes> {
    if !(cfg.frame_rate.is_finite() && cfg.frame_rate > 0.0) {
        return Err(KeyframeError::type_mismatch(
            "frameRate",
            "positive finite number",
            cfg.frame_rate.to_string(),
            Location::Argument,
        ));
    }
    let (first, last) = evaluator.keyframes().time_range();
    let start = cfg.start_time.filter(|t| t.is_finite()).unwrap_or(first);
    let end = cfg
        .end_time
        .filter(|t| t.is_finite())
        .unwrap_or(last)
        .max(start);

    let frames = frame_count(end - start, cfg.frame_rate)?;
    let values = (0..frames)
        .map(|f| (start + f as f64 / cfg.frame_rate).min(end))
        .map(|t| evaluator.evaluate(t))
        .collect::<Result<Vec<_>>>()?;

    Ok(BakedKeyframes {
        frame_rate: cfg.frame_rate,
        start_time: start,
        end_time: end,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Keyframe;
    use crate::keyframes::Keyframes;

    #[test]
    fn bakes_inclusive_of_end() {
        let keys = Keyframes::new(vec![Keyframe::linear(0.0, 0.0), Keyframe::linear(1.0, 10.0)])
            .unwrap();
        let eval = KeyframeEvaluator::new(keys);
        let baked = bake(
            &eval,
            &BakingConfig {
                frame_rate: 4.0,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(baked.values.len(), 5);
        assert_eq!(baked.values[2], KeyValue::Scalar(5.0));
        assert_eq!(baked.values[4], KeyValue::Scalar(10.0));
    }

    #[test]
    fn rejects_non_positive_frame_rate() {
        let keys = Keyframes::new(vec![Keyframe::new(0.0, 0.0)]).unwrap();
        let eval = KeyframeEvaluator::new(keys);
        let cfg = BakingConfig {
            frame_rate: 0.0,
            ..Default::default()
        };
        assert_eq!(bake(&eval, &cfg).unwrap_err().category(), "TypeMismatch");
    }

    #[test]
    fn oversized_frame_counts_are_rejected() {
        let keys = Keyframes::new(vec![Keyframe::linear(0.0, 0.0), Keyframe::linear(1.0, 1.0)])
            .unwrap();
        let eval = KeyframeEvaluator::new(keys);

        let huge_rate = BakingConfig {
            frame_rate: 1e300,
            ..Default::default()
        };
        let err = bake(&eval, &huge_rate).unwrap_err();
        assert!(
            matches!(err, KeyframeError::InvalidRange { ref name, .. } if name == "frameCount"),
            "{err}"
        );

        let wide_window = BakingConfig {
            frame_rate: 60.0,
            start_time: Some(0.0),
            end_time: Some(1e9),
        };
        assert_eq!(bake(&eval, &wide_window).unwrap_err().category(), "InvalidRange");

        let at_limit = BakingConfig {
            frame_rate: (MAX_BAKED_FRAMES - 1) as f64,
            ..Default::default()
        };
        assert_eq!(bake(&eval, &at_limit).unwrap().values.len(), MAX_BAKED_FRAMES);
    }
}
