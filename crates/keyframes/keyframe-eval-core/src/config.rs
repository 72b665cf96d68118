//! Configuration for keyframe evaluation.

use serde::{Deserialize, Serialize};

/// Handle values applied when a raw keyframe omits them.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyframeDefaults {
    pub ease_in: f64,
    pub ease_out: f64,
    pub velocity_in: f64,
    pub velocity_out: f64,
}

impl Default for KeyframeDefaults {
    fn default() -> Self {
        Self {
            ease_in: 33.0,
            ease_out: 33.0,
            velocity_in: 0.0,
            velocity_out: 0.0,
        }
    }
}

/// Evaluator configuration: handle values for keyframes that omit them, and
/// whether segment curves are cached between queries.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub defaults: KeyframeDefaults,

    /// Build each segment's Bezier curve once and reuse it across queries.
    pub cache_easing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: KeyframeDefaults::default(),
            cache_easing: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: Config = serde_json::from_str(r#"{ "defaults": { "easeIn": 50 } }"#).unwrap();
        assert_eq!(cfg.defaults.ease_in, 50.0);
        assert_eq!(cfg.defaults.ease_out, 33.0);
        assert!(cfg.cache_easing);
    }
}
