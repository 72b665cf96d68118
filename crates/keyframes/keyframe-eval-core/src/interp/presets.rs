//! Named easing curves (CSS keywords and the Penner family as cubic-bezier
//! approximations).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{KeyframeError, Location, Result};
use crate::interp::bezier::BezierEasing;

macro_rules! easing_presets {
    ($($variant:ident => $name:tt, [$x1:expr, $y1:expr, $x2:expr, $y2:expr];)*) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum EasingPreset {
            $(
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl EasingPreset {
            pub const ALL: &'static [EasingPreset] = &[$(EasingPreset::$variant),*];

            /// Control points `[x1, y1, x2, y2]`.
            pub fn control_points(self) -> [f64; 4] {
                match self {
                    $(EasingPreset::$variant => [$x1, $y1, $x2, $y2],)*
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(EasingPreset::$variant => $name,)*
                }
            }
        }
    };
}

easing_presets! {
    Linear => "linear", [0.0, 0.0, 1.0, 1.0];
    Ease => "ease", [0.25, 0.1, 0.25, 1.0];
    EaseIn => "easeIn", [0.42, 0.0, 1.0, 1.0];
    EaseOut => "easeOut", [0.0, 0.0, 0.58, 1.0];
    EaseInOut => "easeInOut", [0.42, 0.0, 0.58, 1.0];
    EaseInSine => "easeInSine", [0.12, 0.0, 0.39, 0.0];
    EaseOutSine => "easeOutSine", [0.61, 1.0, 0.88, 1.0];
    EaseInOutSine => "easeInOutSine", [0.37, 0.0, 0.63, 1.0];
    EaseInQuad => "easeInQuad", [0.11, 0.0, 0.5, 0.0];
    EaseOutQuad => "easeOutQuad", [0.5, 1.0, 0.89, 1.0];
    EaseInOutQuad => "easeInOutQuad", [0.45, 0.0, 0.55, 1.0];
    EaseInCubic => "easeInCubic", [0.32, 0.0, 0.67, 0.0];
    EaseOutCubic => "easeOutCubic", [0.33, 1.0, 0.68, 1.0];
    EaseInOutCubic => "easeInOutCubic", [0.65, 0.0, 0.35, 1.0];
    EaseInQuart => "easeInQuart", [0.5, 0.0, 0.75, 0.0];
    EaseOutQuart => "easeOutQuart", [0.25, 1.0, 0.5, 1.0];
    EaseInOutQuart => "easeInOutQuart", [0.76, 0.0, 0.24, 1.0];
    EaseInQuint => "easeInQuint", [0.64, 0.0, 0.78, 0.0];
    EaseOutQuint => "easeOutQuint", [0.22, 1.0, 0.36, 1.0];
    EaseInOutQuint => "easeInOutQuint", [0.83, 0.0, 0.17, 1.0];
    EaseInExpo => "easeInExpo", [0.7, 0.0, 0.84, 0.0];
    EaseOutExpo => "easeOutExpo", [0.16, 1.0, 0.3, 1.0];
    EaseInOutExpo => "easeInOutExpo", [0.87, 0.0, 0.13, 1.0];
    EaseInCirc => "easeInCirc", [0.55, 0.0, 1.0, 0.45];
    EaseOutCirc => "easeOutCirc", [0.0, 0.55, 0.45, 1.0];
    EaseInOutCirc => "easeInOutCirc", [0.85, 0.0, 0.15, 1.0];
    EaseInBack => "easeInBack", [0.36, 0.0, 0.66, -0.56];
    EaseOutBack => "easeOutBack", [0.34, 1.56, 0.64, 1.0];
    EaseInOutBack => "easeInOutBack", [0.68, -0.6, 0.32, 1.6];
}

/// Keyframe handle percentages equivalent to a preset curve.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SegmentHandles {
    /// Outgoing handle of the segment's first keyframe.
    pub ease_out: f64,
    pub velocity_out: f64,
    /// Incoming handle of the segment's second keyframe.
    pub ease_in: f64,
    pub velocity_in: f64,
}

impl EasingPreset {
    pub fn easing(self) -> BezierEasing {
        let [x1, y1, x2, y2] = self.control_points();
        // Every table entry keeps x1/x2 inside [0, 1].
        BezierEasing::new(x1, y1, x2, y2).unwrap_or_else(|_| BezierEasing::linear())
    }

    /// Convert the curve into the percentages a keyframe pair would carry.
    pub fn handles(self) -> SegmentHandles {
        let [x1, y1, x2, y2] = self.control_points();
        SegmentHandles {
            ease_out: x1 * 100.0,
            velocity_out: y1 * 100.0,
            ease_in: (1.0 - x2) * 100.0,
            velocity_in: (1.0 - y2) * 100.0,
        }
    }
}

impl fmt::Display for EasingPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EasingPreset {
    type Err = KeyframeError;

    fn from_str(s: &str) -> Result<Self> {
        EasingPreset::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| KeyframeError::UnknownField {
                name: s.to_string(),
                hint: EasingPreset::ALL
                    .iter()
                    .find(|p| p.name().eq_ignore_ascii_case(s))
                    .map(|p| p.name().to_string()),
                at: Location::Argument,
            })
    }
}
