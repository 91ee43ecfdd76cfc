use chrono::NaiveDate;
use planting_engine::date_utils;
use wasm_bindgen::JsValue;

pub fn set_panic_hook() {
    // When the `console_error_panic_hook` feature is enabled, we can call the
    // `set_panic_hook` function at least once during initialization, and then
    // we will get better error messages if our code ever panics.
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Convert any displayable error into a JS string value
pub fn to_js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

/// Parse an optional "YYYY-MM-DD" argument, defaulting to today
pub fn parse_as_of(as_of: Option<String>) -> Result<NaiveDate, JsValue> {
    match as_of {
        Some(s) if !s.trim().is_empty() => {
            date_utils::parse_date(&s).map_err(|e| to_js_error("Invalid asOf date", e))
        }
        _ => Ok(date_utils::today()),
    }
}
