use std::cell::RefCell;

use js_sys::{Array, Function, Reflect};
use serde_json::Value as JsonValue;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use keyframe_eval_core::{
    keyframes_from_json, BezierEasing, Config, EasingPreset, Interpolator, KeyValue,
    KeyframeError, KeyframeEvaluator, Location,
};

const NUMERIC_FIELDS: [&str; 5] = ["keyTime", "easeIn", "easeOut", "velocityIn", "velocityOut"];

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn core_error(e: KeyframeError) -> JsError {
    JsError::new(&format!("{}: {e}", e.category()))
}

/// Convert untyped JS input into JSON for the core validators.
/// undefined/null map to `null` so the core reports them as missing.
fn to_json(v: JsValue, what: &str) -> Result<JsonValue, JsError> {
    if jsvalue_is_undefined_or_null(&v) {
        return Ok(JsonValue::Null);
    }
    swb::from_value(v).map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

fn is_non_finite(v: &JsValue) -> bool {
    v.as_f64().is_some_and(|n| !n.is_finite())
}

fn reflect_get(target: &JsValue, key: &str) -> Result<JsValue, JsError> {
    Reflect::get(target, &JsValue::from_str(key))
        .map_err(|e| JsError::new(&format!("keyframes error: {e:?}")))
}

/// NaN and +/-Infinity have no JSON form and would arrive at the validator as
/// `null`. Report them here, by keyframe index, before conversion.
fn check_finite_numbers(keyframes: &JsValue) -> Result<(), JsError> {
    if !Array::is_array(keyframes) {
        return Ok(());
    }
    for (index, item) in Array::from(keyframes).iter().enumerate() {
        if !item.is_object() {
            continue;
        }
        let at = Location::Keyframe(index);
        for name in NUMERIC_FIELDS {
            let field = reflect_get(&item, name)?;
            if let Some(n) = field.as_f64().filter(|n| !n.is_finite()) {
                let err = KeyframeError::type_mismatch(name, "finite number", n.to_string(), at);
                return Err(core_error(err));
            }
        }
        let value = reflect_get(&item, "keyValue")?;
        let non_finite_element =
            Array::is_array(&value) && Array::from(&value).iter().any(|x| is_non_finite(&x));
        if is_non_finite(&value) || non_finite_element {
            return Err(core_error(KeyframeError::type_mismatch(
                "keyValue",
                "finite number or array of finite numbers",
                "non-finite number",
                at,
            )));
        }
    }
    Ok(())
}

fn to_js(value: &KeyValue) -> Result<JsValue, JsError> {
    swb::to_value(value).map_err(|e| JsError::new(&format!("output error: {e}")))
}

/// Custom easing supplied as `fn(progress, easeOut, easeIn) -> number`.
/// The first failure is kept and reported after evaluation.
struct JsInterpolator {
    f: Function,
    error: RefCell<Option<String>>,
}

impl JsInterpolator {
    fn new(f: Function) -> Self {
        Self {
            f,
            error: RefCell::new(None),
        }
    }

    fn fail(&self, message: String) -> f64 {
        self.error.borrow_mut().get_or_insert(message);
        f64::NAN
    }

    fn take_error(&self) -> Result<(), JsError> {
        match self.error.borrow_mut().take() {
            Some(message) => Err(JsError::new(&message)),
            None => Ok(()),
        }
    }
}

impl Interpolator for JsInterpolator {
    fn ease(&self, progress: f64, ease_out: f64, ease_in: f64) -> f64 {
        let result = self.f.call3(
            &JsValue::UNDEFINED,
            &JsValue::from_f64(progress),
            &JsValue::from_f64(ease_out),
            &JsValue::from_f64(ease_in),
        );
        match result {
            Ok(val) => match val.as_f64() {
                Some(eased) => eased,
                None => self.fail("interpolator must return a number".into()),
            },
            Err(e) => self.fail(format!("interpolator threw: {e:?}")),
        }
    }
}

/// Keyframes validated once, evaluated many times.
#[wasm_bindgen]
pub struct KeyframeAnimation {
    core: KeyframeEvaluator,
    interpolator: Option<JsInterpolator>,
}

#[wasm_bindgen]
impl KeyframeAnimation {
    /// Validate `keyframes` (array of `{ keyTime, keyValue, easeIn?, easeOut?,
    /// velocityIn?, velocityOut? }`). Pass a config object or undefined/null for
    /// defaults.
    /// Example:
    ///   new KeyframeAnimation([{ keyTime: 0, keyValue: 0 }, { keyTime: 1, keyValue: 1 }])
    #[wasm_bindgen(constructor)]
    pub fn new(keyframes: JsValue, config: JsValue) -> Result<KeyframeAnimation, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        check_finite_numbers(&keyframes)?;
        let raw = to_json(keyframes, "keyframes")?;
        let core = KeyframeEvaluator::from_json(&raw, cfg).map_err(core_error)?;
        Ok(KeyframeAnimation {
            core,
            interpolator: None,
        })
    }

    /// Value at `time`: a number or an array of numbers.
    /// Times outside the keyframe range (including +/-Infinity) hold the
    /// nearest end value; NaN is rejected.
    #[wasm_bindgen]
    pub fn evaluate(&self, time: JsValue) -> Result<JsValue, JsError> {
        let value = match time.as_f64() {
            Some(t) => self.evaluate_at(t)?,
            // Not a number: let the core name what it got.
            None => {
                let time = to_json(time, "time")?;
                self.core.evaluate_json(&time).map_err(core_error)?
            }
        };
        to_js(&value)
    }

    /// Replace Bezier easing with `interpolator(progress, easeOut, easeIn)`.
    /// Pass undefined/null to restore Bezier easing.
    #[wasm_bindgen(js_name = setInterpolator)]
    pub fn set_interpolator(&mut self, interpolator: JsValue) -> Result<(), JsError> {
        self.interpolator = parse_interpolator(interpolator)?;
        Ok(())
    }

    /// Canonical keyframes (sorted, defaults applied).
    #[wasm_bindgen]
    pub fn keyframes(&self) -> Result<JsValue, JsError> {
        swb::to_value(self.core.keyframes().as_slice())
            .map_err(|e| JsError::new(&format!("keyframes error: {e}")))
    }
}

impl KeyframeAnimation {
    fn evaluate_at(&self, time: f64) -> Result<KeyValue, JsError> {
        match &self.interpolator {
            Some(js) => {
                let value = self.core.evaluate_with(time, js);
                js.take_error()?;
                value.map_err(core_error)
            }
            None => self.core.evaluate(time).map_err(core_error),
        }
    }
}

fn parse_interpolator(v: JsValue) -> Result<Option<JsInterpolator>, JsError> {
    if jsvalue_is_undefined_or_null(&v) {
        return Ok(None);
    }
    v.dyn_into::<Function>()
        .map(|f| Some(JsInterpolator::new(f)))
        .map_err(|_| JsError::new("TypeMismatch: `interpolator` must be a function"))
}

/// One-shot evaluation. `options` may carry `{ interpolator }`.
#[wasm_bindgen(js_name = evaluateOnce)]
pub fn evaluate_once(
    keyframes: JsValue,
    time: JsValue,
    options: JsValue,
) -> Result<JsValue, JsError> {
    let interpolator = if jsvalue_is_undefined_or_null(&options) {
        None
    } else {
        let f = Reflect::get(&options, &JsValue::from_str("interpolator"))
            .map_err(|e| JsError::new(&format!("options error: {e:?}")))?;
        parse_interpolator(f)?
    };

    let mut anim = KeyframeAnimation::new(keyframes, JsValue::UNDEFINED)?;
    anim.interpolator = interpolator;
    anim.evaluate(time)
}

/// Validate a keyframe list without building an evaluator. Returns the
/// canonical keyframes.
#[wasm_bindgen(js_name = normalizeKeyframes)]
pub fn normalize_keyframes(keyframes: JsValue) -> Result<JsValue, JsError> {
    check_finite_numbers(&keyframes)?;
    let raw = to_json(keyframes, "keyframes")?;
    let keys = keyframes_from_json(&raw, &Config::default().defaults).map_err(core_error)?;
    swb::to_value(keys.as_slice()).map_err(|e| JsError::new(&format!("keyframes error: {e}")))
}

/// Standalone cubic-bezier easing curve.
#[wasm_bindgen]
pub struct Easing {
    inner: BezierEasing,
}

#[wasm_bindgen]
impl Easing {
    #[wasm_bindgen(constructor)]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Easing, JsError> {
        let inner = BezierEasing::new(x1, y1, x2, y2).map_err(core_error)?;
        Ok(Easing { inner })
    }

    /// Curve for a named preset such as `"easeInOutCubic"`.
    #[wasm_bindgen(js_name = fromPreset)]
    pub fn from_preset(name: &str) -> Result<Easing, JsError> {
        let preset: EasingPreset = name.parse().map_err(core_error)?;
        Ok(Easing {
            inner: preset.easing(),
        })
    }

    #[wasm_bindgen]
    pub fn ease(&self, progress: f64) -> f64 {
        self.inner.ease(progress)
    }

    #[wasm_bindgen(js_name = controlPoints)]
    pub fn control_points(&self) -> Vec<f64> {
        self.inner.control_points().to_vec()
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
