use keyframe_eval_core::{
    keyframes_from_json, parse_keyframes_json, validate_keyframe, KeyValue, Keyframe,
    KeyframeDefaults, KeyframeError, Keyframes, Location,
};
use keyframe_test_fixtures::{invalid_keyframes, keyframes};
use serde_json::json;

fn defaults() -> KeyframeDefaults {
    KeyframeDefaults::default()
}

#[test]
fn missing_key_time_names_field_and_index() {
    let raw = json!([{ "keyTime": 0, "keyValue": 1 }, { "keyValue": 5 }]);
    let err = keyframes_from_json(&raw, &defaults()).unwrap_err();
    assert_eq!(
        err,
        KeyframeError::MissingArgument {
            name: "keyTime".into(),
            at: Location::Keyframe(1),
        }
    );
}

#[test]
fn missing_key_value_is_never_defaulted() {
    let err = validate_keyframe(&json!({ "keyTime": 3 }), 0, &defaults()).unwrap_err();
    assert!(matches!(err, KeyframeError::MissingArgument { ref name, .. } if name == "keyValue"));

    let err = validate_keyframe(&json!({ "keyTime": 3, "keyValue": null }), 4, &defaults())
        .unwrap_err();
    assert_eq!(err.to_string(), "keyframe 4: missing required field `keyValue`");
}

#[test]
fn wrong_types_report_expected_and_actual() {
    let err = validate_keyframe(&json!({ "keyTime": "0", "keyValue": 1 }), 2, &defaults())
        .unwrap_err();
    assert_eq!(
        err,
        KeyframeError::TypeMismatch {
            name: "keyTime".into(),
            expected: "number".into(),
            actual: "string".into(),
            at: Location::Keyframe(2),
        }
    );

    let err = validate_keyframe(&json!({ "keyTime": 0, "keyValue": [1, "x"] }), 0, &defaults())
        .unwrap_err();
    match err {
        KeyframeError::TypeMismatch {
            expected, actual, ..
        } => {
            assert_eq!(expected, "number or array of numbers");
            assert_eq!(actual, "array containing string");
        }
        other => panic!("unexpected {other:?}"),
    }

    let err = validate_keyframe(
        &json!({ "keyTime": 0, "keyValue": 1, "easeIn": true }),
        0,
        &defaults(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("`easeIn` must be number, got boolean"), "{err}");

    let err = validate_keyframe(&json!(7), 0, &defaults()).unwrap_err();
    assert_eq!(err.category(), "TypeMismatch");
}

#[test]
fn unknown_fields_are_rejected_with_hints() {
    let err =
        validate_keyframe(&json!({ "time": 0, "keyValue": 1 }), 0, &defaults()).unwrap_err();
    assert_eq!(
        err,
        KeyframeError::UnknownField {
            name: "time".into(),
            hint: Some("keyTime".into()),
            at: Location::Keyframe(0),
        }
    );

    let err = validate_keyframe(
        &json!({ "keyTime": 0, "keyValue": 1, "color": "red" }),
        1,
        &defaults(),
    )
    .unwrap_err();
    assert!(matches!(err, KeyframeError::UnknownField { hint: None, .. }));
}

#[test]
fn handle_defaults_fill_only_optional_fields() {
    let key =
        validate_keyframe(&json!({ "keyTime": 1, "keyValue": [1, 2] }), 0, &defaults()).unwrap();
    assert_eq!(key, Keyframe::new(1.0, vec![1.0, 2.0]));
    assert_eq!((key.ease_in, key.ease_out), (33.0, 33.0));
    assert_eq!((key.velocity_in, key.velocity_out), (0.0, 0.0));

    let custom = KeyframeDefaults {
        ease_in: 10.0,
        ..KeyframeDefaults::default()
    };
    let key = validate_keyframe(
        &json!({ "keyTime": 1, "keyValue": 2, "easeOut": 80, "velocityIn": 5 }),
        0,
        &custom,
    )
    .unwrap();
    assert_eq!(key.ease_in, 10.0);
    assert_eq!(key.ease_out, 80.0);
    assert_eq!(key.velocity_in, 5.0);
    assert_eq!(key.key_value, KeyValue::Scalar(2.0));
}

#[test]
fn list_level_errors() {
    assert_eq!(
        keyframes_from_json(&json!([]), &defaults()).unwrap_err().category(),
        "MissingArgument"
    );
    assert_eq!(
        keyframes_from_json(&json!(null), &defaults()).unwrap_err().category(),
        "MissingArgument"
    );
    assert_eq!(
        parse_keyframes_json("[{", &defaults()).unwrap_err().category(),
        "Parse"
    );
}

#[test]
fn validation_failure_anywhere_prevents_construction() {
    // The bad key is last; nothing is returned for the earlier good ones.
    let raw = json!([
        { "keyTime": 5, "keyValue": 1 },
        { "keyTime": 0, "keyValue": 1 },
        { "keyTime": 2, "keyValue": 1, "velocity": 3 },
    ]);
    let err = keyframes_from_json(&raw, &defaults()).unwrap_err();
    assert!(matches!(err, KeyframeError::UnknownField { at: Location::Keyframe(2), .. }));
}

#[test]
fn sorting_matches_presorted_input() {
    let text = keyframes::json("unsorted").unwrap();
    let unsorted = parse_keyframes_json(&text, &defaults()).unwrap();
    let mut raw: Vec<serde_json::Value> = keyframes::load("unsorted").unwrap();
    raw.sort_by(|a, b| {
        a["keyTime"]
            .as_f64()
            .unwrap()
            .total_cmp(&b["keyTime"].as_f64().unwrap())
    });
    let presorted = keyframes_from_json(&serde_json::Value::Array(raw), &defaults()).unwrap();
    assert_eq!(unsorted, presorted);
    let times: Vec<f64> = unsorted.iter().map(|k| k.key_time).collect();
    assert_eq!(times, vec![0.0, 2.0, 4.0]);
}

#[test]
fn typed_construction_sorts_stably() {
    let keys = Keyframes::new(vec![
        Keyframe::new(1.0, 10.0),
        Keyframe::new(1.0, 20.0),
        Keyframe::new(0.0, 0.0),
    ])
    .unwrap();
    assert_eq!(keys[1].key_value, KeyValue::Scalar(10.0));
    assert_eq!(keys[2].key_value, KeyValue::Scalar(20.0));
}

#[test]
fn invalid_fixtures_fail_with_expected_category() {
    for name in invalid_keyframes::keys() {
        let text = invalid_keyframes::json(&name).unwrap();
        let expected = invalid_keyframes::expected_error(&name).unwrap();
        let err = parse_keyframes_json(&text, &defaults()).unwrap_err();
        assert_eq!(err.category(), expected, "fixture {name}: {err}");
    }
}

#[test]
fn keyframes_serialize_with_host_field_names() {
    let key = Keyframe::new(0.5, vec![1.0]).with_velocity(2.0, 3.0);
    let v = serde_json::to_value(&key).unwrap();
    assert_eq!(
        v,
        json!({
            "keyTime": 0.5,
            "keyValue": [1.0],
            "easeIn": 33.0,
            "easeOut": 33.0,
            "velocityIn": 2.0,
            "velocityOut": 3.0
        })
    );
}
