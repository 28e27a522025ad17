//! Food endpoint WASM bindings.
//!
//! The page performs the `fetch` calls; these helpers build the request
//! bodies from the form state and pick the message to show on failure.
//!
//! # Example
//!
//! ```typescript
//! import { create_food_body, api_error_message } from '@nutrition-llama/wasm';
//!
//! const response = await fetch('/api/foods', {
//!   method: 'POST',
//!   headers: { 'Content-Type': 'application/json' },
//!   body: JSON.stringify(create_food_body(form)),
//! });
//! if (!response.ok) {
//!   setError(api_error_message(await response.json(), 'Failed to create food'));
//! }
//! ```

use nutrition_core::api::{self, ApiErrorBody, FoodForm, FormError, LogForm};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn form_error(err: FormError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Serialize as a plain JSON-compatible object (no `Map`s, no `undefined`).
fn to_json_value<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).map_err(JsValue::from)
}

/// Build the body of `POST /api/foods` from the create form.
///
/// # Arguments
///
/// * `form` - Object with the form's string fields (`name`, `servingSizeValue`,
///   `servingSizeUnit`, `calories`, `protein`, ..., `upcCode`)
///
/// # Errors
///
/// Returns an error message if a required field is blank or a number does
/// not parse.
#[wasm_bindgen]
pub fn create_food_body(form: JsValue) -> Result<JsValue, JsValue> {
    let form: FoodForm = serde_wasm_bindgen::from_value(form)?;
    let request = form.to_request().map_err(form_error)?;
    to_json_value(&request)
}

/// Build the body of `POST /api/log` from the log form.
///
/// # Errors
///
/// Returns an error message if the record id is missing, servings is not a
/// number, or the date is not `YYYY-MM-DD`.
#[wasm_bindgen]
pub fn log_food_body(form: JsValue) -> Result<JsValue, JsValue> {
    let form: LogForm = serde_wasm_bindgen::from_value(form)?;
    let request = form.to_request().map_err(form_error)?;
    to_json_value(&request)
}

/// Message to display for a failed request.
///
/// Uses the `error` field of the response body, or `fallback` when the body
/// has none or is not an object.
#[wasm_bindgen]
pub fn api_error_message(body: JsValue, fallback: &str) -> String {
    serde_wasm_bindgen::from_value::<ApiErrorBody>(body)
        .unwrap_or_default()
        .message_or(fallback)
}

/// Page to open after logging a food on `date`.
#[wasm_bindgen]
pub fn log_redirect_path(date: &str) -> String {
    api::log_redirect_path(date)
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use js_sys::Reflect;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn get(object: &JsValue, key: &str) -> JsValue {
        Reflect::get(object, &JsValue::from_str(key)).unwrap()
    }

    fn parse(json: &str) -> JsValue {
        js_sys::JSON::parse(json).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_create_food_body() {
        let form = parse(r#"{ "name": "Oatmeal", "calories": "150", "upcCode": "012345678905" }"#);
        let body = create_food_body(form).unwrap();

        assert_eq!(get(&body, "calories").as_f64(), Some(150.0));
        assert_eq!(get(&body, "servingSizeUnit").as_string().as_deref(), Some("g"));
        assert_eq!(get(&body, "upcCode").as_string().as_deref(), Some("012345678905"));
        assert_eq!(get(&body, "source").as_string().as_deref(), Some("manual"));
        assert!(!Reflect::has(&body, &JsValue::from_str("protein")).unwrap());
    }

    #[wasm_bindgen_test]
    fn test_create_food_body_missing_calories() {
        let err = create_food_body(parse(r#"{ "name": "Oatmeal" }"#)).unwrap_err();
        assert_eq!(
            err.as_string().as_deref(),
            Some("Missing required field: calories")
        );
    }

    #[wasm_bindgen_test]
    fn test_log_food_body() {
        let form = parse(
            r#"{ "nutritionRecordId": "rec_1", "servings": "2", "mealType": "lunch", "loggedDate": "2024-03-09" }"#,
        );
        let body = log_food_body(form).unwrap();

        assert_eq!(get(&body, "servings").as_f64(), Some(2.0));
        assert_eq!(get(&body, "mealType").as_string().as_deref(), Some("lunch"));
    }

    #[wasm_bindgen_test]
    fn test_api_error_message() {
        let body = parse(r#"{ "error": "Food not found" }"#);
        assert_eq!(api_error_message(body, "Failed to log food"), "Food not found");
        assert_eq!(
            api_error_message(JsValue::NULL, "Failed to log food"),
            "Failed to log food"
        );
    }
}
