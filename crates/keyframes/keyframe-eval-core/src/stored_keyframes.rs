use serde_json::{Map, Value as JsonValue};

use crate::config::KeyframeDefaults;
use crate::data::{KeyValue, Keyframe};
use crate::error::{KeyframeError, Location, Result};
use crate::keyframes::Keyframes;

const KEY_TIME: &str = "keyTime";
const KEY_VALUE: &str = "keyValue";
const EASE_IN: &str = "easeIn";
const EASE_OUT: &str = "easeOut";
const VELOCITY_IN: &str = "velocityIn";
const VELOCITY_OUT: &str = "velocityOut";

const KNOWN_FIELDS: [&str; 6] = [
    KEY_TIME,
    KEY_VALUE,
    EASE_IN,
    EASE_OUT,
    VELOCITY_IN,
    VELOCITY_OUT,
];

/// Public API: parse a JSON array of keyframe descriptors into the canonical
/// sorted sequence.
///
/// Notes:
/// - `keyTime` and `keyValue` are required; `null` counts as absent.
/// - `easeIn`/`easeOut`/`velocityIn`/`velocityOut` fall back to `defaults`.
/// - Any other field is rejected, with a hint when it looks like a known one.
pub fn parse_keyframes_json(s: &str, defaults: &KeyframeDefaults) -> Result<Keyframes> {
    let raw: JsonValue =
        serde_json::from_str(s).map_err(|e| KeyframeError::Parse(e.to_string()))?;
    keyframes_from_json(&raw, defaults)
}

/// Validate an already-parsed JSON keyframe list. Every descriptor is checked
/// before the sequence is sorted.
pub fn keyframes_from_json(raw: &JsonValue, defaults: &KeyframeDefaults) -> Result<Keyframes> {
    let items = match raw {
        JsonValue::Null => return Err(KeyframeError::missing("keyframes", Location::Argument)),
        JsonValue::Array(items) => items,
        other => {
            return Err(KeyframeError::type_mismatch(
                "keyframes",
                "array",
                json_type_name(other),
                Location::Argument,
            ))
        }
    };
    if items.is_empty() {
        return Err(KeyframeError::missing("keyframes", Location::Argument));
    }

    let keys = items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_keyframe(item, index, defaults))
        .collect::<Result<Vec<_>>>()?;
    Ok(Keyframes::sorted(keys))
}

/// Validate a single raw keyframe descriptor. `index` is its position in the
/// caller's list and appears in every error.
pub fn validate_keyframe(
    raw: &JsonValue,
    index: usize,
    defaults: &KeyframeDefaults,
) -> Result<Keyframe> {
    let at = Location::Keyframe(index);
    let JsonValue::Object(map) = raw else {
        return Err(KeyframeError::type_mismatch(
            "keyframe",
            "object",
            json_type_name(raw),
            at,
        ));
    };

    // Unknown fields first so a misspelt `time`/`value` gets its hint rather
    // than a bare missing-field error.
    if let Some(name) = map.keys().find(|k| !KNOWN_FIELDS.contains(&k.as_str())) {
        return Err(KeyframeError::UnknownField {
            name: name.clone(),
            hint: field_hint(name).map(str::to_string),
            at,
        });
    }

    let key_time = number_field(map, KEY_TIME, at)?
        .ok_or_else(|| KeyframeError::missing(KEY_TIME, at))?;
    let key_value =
        key_value_field(map, at)?.ok_or_else(|| KeyframeError::missing(KEY_VALUE, at))?;

    Ok(Keyframe {
        key_time,
        key_value,
        ease_in: number_field(map, EASE_IN, at)?.unwrap_or(defaults.ease_in),
        ease_out: number_field(map, EASE_OUT, at)?.unwrap_or(defaults.ease_out),
        velocity_in: number_field(map, VELOCITY_IN, at)?.unwrap_or(defaults.velocity_in),
        velocity_out: number_field(map, VELOCITY_OUT, at)?.unwrap_or(defaults.velocity_out),
    })
}

fn number_field(map: &Map<String, JsonValue>, name: &str, at: Location) -> Result<Option<f64>> {
    match map.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| KeyframeError::type_mismatch(name, "number", json_type_name(v), at)),
    }
}

fn key_value_field(map: &Map<String, JsonValue>, at: Location) -> Result<Option<KeyValue>> {
    const EXPECTED: &str = "number or array of numbers";
    match map.get(KEY_VALUE) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => n
            .as_f64()
            .map(|v| Some(KeyValue::Scalar(v)))
            .ok_or_else(|| KeyframeError::type_mismatch(KEY_VALUE, EXPECTED, "number", at)),
        Some(v @ JsonValue::Array(items)) => items
            .iter()
            .map(JsonValue::as_f64)
            .collect::<Option<Vec<f64>>>()
            .map(|values| Some(KeyValue::Vector(values)))
            .ok_or_else(|| {
                KeyframeError::type_mismatch(KEY_VALUE, EXPECTED, json_type_name(v), at)
            }),
        Some(other) => Err(KeyframeError::type_mismatch(
            KEY_VALUE,
            EXPECTED,
            json_type_name(other),
            at,
        )),
    }
}

/// Runtime type name of untyped host input, for error messages.
pub fn json_type_name(v: &JsonValue) -> String {
    match v {
        JsonValue::Null => "null".into(),
        JsonValue::Bool(_) => "boolean".into(),
        JsonValue::Number(_) => "number".into(),
        JsonValue::String(_) => "string".into(),
        JsonValue::Object(_) => "object".into(),
        JsonValue::Array(items) => match items.iter().find(|x| !x.is_number()) {
            Some(item) => format!("array containing {}", json_type_name(item)),
            None => "array".into(),
        },
    }
}

/// Suggest the recognised field an unknown one was probably meant to be.
fn field_hint(name: &str) -> Option<&'static str> {
    match name {
        "time" | "t" => return Some(KEY_TIME),
        "value" | "v" => return Some(KEY_VALUE),
        _ => {}
    }
    let normalized = normalize_field(name);
    KNOWN_FIELDS
        .iter()
        .copied()
        .find(|known| normalize_field(known) == normalized)
}

fn normalize_field(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
