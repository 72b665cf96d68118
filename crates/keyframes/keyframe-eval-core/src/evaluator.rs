//! Keyframe evaluator: validated keyframes plus per-segment easing.

use std::fmt;
use std::sync::Arc;

use log::trace;
use once_cell::sync::OnceCell;
use serde_json::Value as JsonValue;

use crate::config::Config;
use crate::data::{KeyValue, Keyframe};
use crate::error::{KeyframeError, Location, Result};
use crate::interp::bezier::BezierEasing;
use crate::interp::functions::interpolate;
use crate::interp::{segment_easing, Interpolator, SharedInterpolator};
use crate::keyframes::Keyframes;
use crate::sampling::{locate, segment_progress, Bracket};
use crate::stored_keyframes::{json_type_name, keyframes_from_json, parse_keyframes_json};

/// Options for [`evaluate_once`].
#[derive(Clone, Default)]
pub struct EvaluateOptions {
    /// Replaces Bezier easing for the evaluation when set.
    pub interpolator: Option<SharedInterpolator>,
}

impl fmt::Debug for EvaluateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluateOptions")
            .field("interpolator", &self.interpolator.is_some())
            .finish()
    }
}

/// Evaluates an animated value at arbitrary times.
///
/// Keyframes are validated once at construction. Evaluation never mutates
/// anything visible; segment curves are built lazily and cached, and the
/// evaluator can be shared across threads.
pub struct KeyframeEvaluator {
    keys: Keyframes,
    config: Config,
    /// One slot per segment `[i, i+1]`.
    easings: Box<[OnceCell<BezierEasing>]>,
    interpolator: Option<SharedInterpolator>,
}

impl fmt::Debug for KeyframeEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyframeEvaluator")
            .field("keys", &self.keys)
            .field("config", &self.config)
            .field("custom_interpolator", &self.interpolator.is_some())
            .finish()
    }
}

impl KeyframeEvaluator {
    pub fn new(keys: Keyframes) -> Self {
        Self::with_config(keys, Config::default())
    }

    pub fn with_config(keys: Keyframes, config: Config) -> Self {
        let segments = keys.len().saturating_sub(1);
        let easings = (0..segments).map(|_| OnceCell::new()).collect();
        Self {
            keys,
            config,
            easings,
            interpolator: None,
        }
    }

    /// Build from untyped host input (a JSON array of keyframe descriptors),
    /// applying `config.defaults` to omitted handles.
    pub fn from_json(raw: &JsonValue, config: Config) -> Result<Self> {
        let keys = keyframes_from_json(raw, &config.defaults)?;
        Ok(Self::with_config(keys, config))
    }

    pub fn from_json_str(s: &str, config: Config) -> Result<Self> {
        let keys = parse_keyframes_json(s, &config.defaults)?;
        Ok(Self::with_config(keys, config))
    }

    /// Replace Bezier easing with a custom strategy for every segment.
    pub fn with_interpolator(
        self,
        interpolator: impl Interpolator + Send + Sync + 'static,
    ) -> Self {
        self.with_shared_interpolator(Arc::new(interpolator))
    }

    pub fn with_shared_interpolator(mut self, interpolator: SharedInterpolator) -> Self {
        self.interpolator = Some(interpolator);
        self
    }

    pub fn keyframes(&self) -> &Keyframes {
        &self.keys
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Value at `time`. Times outside the keyframe range hold the nearest end
    /// key.
    pub fn evaluate(&self, time: f64) -> Result<KeyValue> {
        let custom = self
            .interpolator
            .as_deref()
            .map(|i| i as &dyn Interpolator);
        self.evaluate_inner(time, custom)
    }

    /// Evaluate with a caller-held interpolator in place of Bezier easing,
    /// for strategies that cannot be stored in a shared evaluator.
    pub fn evaluate_with(&self, time: f64, interpolator: &dyn Interpolator) -> Result<KeyValue> {
        self.evaluate_inner(time, Some(interpolator))
    }

    fn evaluate_inner(&self, time: f64, custom: Option<&dyn Interpolator>) -> Result<KeyValue> {
        if time.is_nan() {
            return Err(KeyframeError::type_mismatch(
                "time",
                "number",
                "NaN",
                Location::Argument,
            ));
        }

        let keys: &[Keyframe] = &self.keys;
        let index = match locate(keys, time) {
            Bracket::Between(i) => i,
            held => {
                let i = held.held_index(keys.len()).unwrap_or(0);
                return Ok(keys[i].key_value.clone());
            }
        };

        let cur = &keys[index];
        let next = &keys[index + 1];
        if cur.key_value == next.key_value {
            return Ok(cur.key_value.clone());
        }

        let progress = segment_progress(keys, index, time);
        let eased = match custom {
            Some(custom) => custom.ease(progress, cur.ease_out, next.ease_in),
            None => self.ease_segment(index, progress)?,
        };
        interpolate(&cur.key_value, &next.key_value, eased, index)
    }

    /// [`evaluate`](Self::evaluate) for an untyped host time value.
    pub fn evaluate_json(&self, time: &JsonValue) -> Result<KeyValue> {
        match time {
            JsonValue::Null => Err(KeyframeError::missing("time", Location::Argument)),
            JsonValue::Number(n) => match n.as_f64() {
                Some(t) => self.evaluate(t),
                None => Err(KeyframeError::type_mismatch(
                    "time",
                    "number",
                    n.to_string(),
                    Location::Argument,
                )),
            },
            other => Err(KeyframeError::type_mismatch(
                "time",
                "number",
                json_type_name(other),
                Location::Argument,
            )),
        }
    }

    /// Evaluate at each time in order, stopping at the first error.
    pub fn evaluate_many<I>(&self, times: I) -> Result<Vec<KeyValue>>
    where
        I: IntoIterator<Item = f64>,
    {
        times.into_iter().map(|t| self.evaluate(t)).collect()
    }

    fn ease_segment(&self, index: usize, progress: f64) -> Result<f64> {
        let cur = &self.keys[index];
        let next = &self.keys[index + 1];
        if !self.config.cache_easing {
            return Ok(segment_easing(cur, next)?.ease(progress));
        }
        let easing = self.easings[index].get_or_try_init(|| {
            let easing = segment_easing(cur, next)?;
            trace!(
                "segment {index}: built easing {:?}",
                easing.control_points()
            );
            Ok::<_, KeyframeError>(easing)
        })?;
        Ok(easing.ease(progress))
    }
}

/// Construction + repeated-query form: validate once, then call
/// [`KeyframeEvaluator::evaluate`] per sample.
pub fn create(keys: Vec<Keyframe>) -> Result<KeyframeEvaluator> {
    Ok(KeyframeEvaluator::new(Keyframes::new(keys)?))
}

/// One-shot form: validate, evaluate a single time, discard.
pub fn evaluate_once(
    keys: Vec<Keyframe>,
    time: f64,
    options: EvaluateOptions,
) -> Result<KeyValue> {
    let config = Config {
        cache_easing: false,
        ..Config::default()
    };
    one_shot(Keyframes::new(keys)?, config, options).evaluate(time)
}

/// One-shot form over untyped host input.
pub fn evaluate_once_json(
    raw: &JsonValue,
    time: &JsonValue,
    options: EvaluateOptions,
) -> Result<KeyValue> {
    let config = Config {
        cache_easing: false,
        ..Config::default()
    };
    let keys = keyframes_from_json(raw, &config.defaults)?;
    one_shot(keys, config, options).evaluate_json(time)
}

fn one_shot(keys: Keyframes, config: Config, options: EvaluateOptions) -> KeyframeEvaluator {
    let evaluator = KeyframeEvaluator::with_config(keys, config);
    match options.interpolator {
        Some(custom) => evaluator.with_shared_interpolator(custom),
        None => evaluator,
    }
}
