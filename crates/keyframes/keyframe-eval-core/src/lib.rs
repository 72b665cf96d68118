//! Keyframe Evaluation Core (engine-agnostic)
//!
//! Computes an animated value at any time from a sparse set of keyframes.
//! Adjacent keyframes are joined by cubic-bezier easing built from their
//! ease/velocity handles; values are numbers or fixed-length vectors.
//!
//! Two call shapes are supported:
//! - [`create`] validates keyframes once and returns a [`KeyframeEvaluator`]
//!   for repeated queries.
//! - [`evaluate_once`] validates and evaluates a single time, optionally with a
//!   custom [`Interpolator`].
//!
//! Untyped host input (JSON) goes through [`parse_keyframes_json`] /
//! [`KeyframeEvaluator::from_json`], which report missing, mistyped and
//! unknown fields by keyframe index.

pub mod baking;
pub mod config;
pub mod data;
pub mod error;
pub mod evaluator;
pub mod interp;
pub mod keyframes;
pub mod sampling;
pub mod stored_keyframes;

// Re-exports for consumers (adapters)
pub use baking::{bake, BakedKeyframes, BakingConfig, MAX_BAKED_FRAMES};
pub use config::{Config, KeyframeDefaults};
pub use data::{KeyValue, Keyframe, ValueKind};
pub use error::{KeyframeError, Location, Result};
pub use evaluator::{
    create, evaluate_once, evaluate_once_json, EvaluateOptions, KeyframeEvaluator,
};
pub use interp::{
    make_easing, BezierEasing, EasingPreset, Interpolator, SegmentHandles, SharedInterpolator,
};
pub use keyframes::Keyframes;
pub use sampling::{locate, Bracket};
pub use stored_keyframes::{keyframes_from_json, parse_keyframes_json, validate_keyframe};
