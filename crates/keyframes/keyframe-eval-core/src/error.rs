//! Error types for keyframe validation and evaluation.
//!
//! Every error is fatal: nothing in the core catches or downgrades them.

use std::fmt;

use thiserror::Error;

/// Where a problem was detected, used to make messages point at the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// A call argument (e.g. the query time or the keyframe list itself).
    Argument,
    /// A keyframe, by its index in the caller's (unsorted) input list.
    Keyframe(usize),
    /// The segment starting at this index of the sorted sequence.
    Segment(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Argument => write!(f, "arguments"),
            Location::Keyframe(i) => write!(f, "keyframe {i}"),
            Location::Segment(i) => write!(f, "segment {i}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KeyframeError {
    #[error("{at}: missing required field `{name}`")]
    MissingArgument { name: String, at: Location },

    #[error("{at}: `{name}` must be {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
        at: Location,
    },

    #[error("{at}: unknown field `{name}`{}", hint_suffix(.hint))]
    UnknownField {
        name: String,
        hint: Option<String>,
        at: Location,
    },

    #[error("{at}: cannot interpolate vectors of length {left} and {right}")]
    DimensionMismatch {
        left: usize,
        right: usize,
        at: Location,
    },

    #[error("`{name}` must be within [{min}, {max}], got {value}")]
    InvalidRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("keyframe json parse error: {0}")]
    Parse(String),
}

fn hint_suffix(hint: &Option<String>) -> String {
    match hint {
        Some(h) => format!(" (did you mean `{h}`?)"),
        None => String::new(),
    }
}

impl KeyframeError {
    pub fn missing(name: impl Into<String>, at: Location) -> Self {
        Self::MissingArgument {
            name: name.into(),
            at,
        }
    }

    pub fn type_mismatch(
        name: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
        at: Location,
    ) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected: expected.into(),
            actual: actual.into(),
            at,
        }
    }

    /// Short category name, stable across message wording changes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingArgument { .. } => "MissingArgument",
            Self::TypeMismatch { .. } => "TypeMismatch",
            Self::UnknownField { .. } => "UnknownField",
            Self::DimensionMismatch { .. } => "DimensionMismatch",
            Self::InvalidRange { .. } => "InvalidRange",
            Self::Parse(_) => "Parse",
        }
    }
}

pub type Result<T> = std::result::Result<T, KeyframeError>;
