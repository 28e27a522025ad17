//! Payloads for the food creation and food logging endpoints.
//!
//! The HTTP calls themselves belong to the page; this module owns the JSON
//! shapes and the conversion from the string-valued form state into them.
//!
//! # Endpoints
//!
//! - `POST /api/foods` - body [`CreateFoodRequest`], redirect to `/foods`
//! - `POST /api/log` - body [`LogFoodRequest`], redirect to `/log/{date}`
//!
//! Both return [`ApiErrorBody`] on failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Food creation endpoint.
pub const FOODS_ENDPOINT: &str = "/api/foods";

/// Food logging endpoint.
pub const LOG_ENDPOINT: &str = "/api/log";

/// Page shown after a food is created.
pub const FOODS_PAGE: &str = "/foods";

pub const CREATE_FOOD_FAILED: &str = "Failed to create food";
pub const LOG_FOOD_FAILED: &str = "Failed to log food";

/// Errors raised while turning form input into a request payload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    /// A numeric field could not be parsed
    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// A required field was left blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The log date is not in `YYYY-MM-DD` form
    #[error("Invalid date: {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// Unit of the serving size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ServingSizeUnit {
    #[default]
    #[serde(rename = "g")]
    Grams,
    #[serde(rename = "ml")]
    Milliliters,
}

/// Meal a log entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    #[default]
    Snack,
}

/// Where a food record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodSource {
    #[default]
    Manual,
}

/// Body of `POST /api/foods`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodRequest {
    pub name: String,
    pub serving_size_value: f64,
    pub serving_size_unit: ServingSizeUnit,
    pub calories: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbohydrates: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugars: Option<f64>,
    /// Milligrams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
    /// Milligrams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upc_code: Option<String>,
    pub source: FoodSource,
}

/// Body of `POST /api/log`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFoodRequest {
    pub nutrition_record_id: String,
    pub servings: f64,
    pub meal_type: MealType,
    /// `YYYY-MM-DD`
    pub logged_date: String,
}

impl LogFoodRequest {
    /// Page to show once the entry is saved.
    pub fn redirect_path(&self) -> String {
        log_redirect_path(&self.logged_date)
    }
}

/// Error payload returned by both endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// The server's message, or `fallback` when none was sent.
    pub fn message_or(&self, fallback: &str) -> String {
        match self.error.as_deref() {
            Some(message) if !message.trim().is_empty() => message.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Daily log page for `date`.
pub fn log_redirect_path(date: &str) -> String {
    format!("/log/{}", date)
}

/// Form state for creating a food, as typed by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FoodForm {
    pub name: String,
    pub serving_size_value: String,
    pub serving_size_unit: ServingSizeUnit,
    pub calories: String,
    pub protein: String,
    pub carbohydrates: String,
    pub total_fat: String,
    pub fiber: String,
    pub sugars: String,
    pub sodium: String,
    pub cholesterol: String,
    pub upc_code: String,
}

impl Default for FoodForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            serving_size_value: "100".to_string(),
            serving_size_unit: ServingSizeUnit::Grams,
            calories: String::new(),
            protein: String::new(),
            carbohydrates: String::new(),
            total_fat: String::new(),
            fiber: String::new(),
            sugars: String::new(),
            sodium: String::new(),
            cholesterol: String::new(),
            upc_code: String::new(),
        }
    }
}

impl FoodForm {
    /// Empty form, optionally prefilled with a UPC from the page URL.
    pub fn new(initial_upc: Option<&str>) -> Self {
        Self {
            upc_code: initial_upc.unwrap_or_default().to_string(),
            ..Self::default()
        }
    }

    /// Fill the UPC field with a value read by the barcode scanner.
    pub fn with_scanned_upc(mut self, code: impl Into<String>) -> Self {
        self.upc_code = code.into();
        self
    }

    /// Build the request body.
    ///
    /// # Errors
    ///
    /// Fails if the name is blank, if serving size or calories do not parse,
    /// or if a filled-in optional nutrient is not a number.
    pub fn to_request(&self) -> Result<CreateFoodRequest, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingField("name"));
        }

        let upc_code = self.upc_code.trim();

        Ok(CreateFoodRequest {
            name: name.to_string(),
            serving_size_value: parse_required("servingSizeValue", &self.serving_size_value)?,
            serving_size_unit: self.serving_size_unit,
            calories: parse_required("calories", &self.calories)?,
            protein: parse_optional("protein", &self.protein)?,
            carbohydrates: parse_optional("carbohydrates", &self.carbohydrates)?,
            total_fat: parse_optional("totalFat", &self.total_fat)?,
            fiber: parse_optional("fiber", &self.fiber)?,
            sugars: parse_optional("sugars", &self.sugars)?,
            sodium: parse_optional("sodium", &self.sodium)?,
            cholesterol: parse_optional("cholesterol", &self.cholesterol)?,
            upc_code: (!upc_code.is_empty()).then(|| upc_code.to_string()),
            source: FoodSource::Manual,
        })
    }
}

/// Form state for logging an existing food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogForm {
    #[serde(default)]
    pub nutrition_record_id: Option<String>,
    #[serde(default = "default_servings")]
    pub servings: String,
    #[serde(default)]
    pub meal_type: MealType,
    pub logged_date: String,
}

fn default_servings() -> String {
    "1".to_string()
}

impl LogForm {
    /// Form for `food_id` dated `today` (`YYYY-MM-DD`), one snack serving.
    pub fn new(food_id: Option<&str>, today: &str) -> Self {
        Self {
            nutrition_record_id: food_id.map(str::to_string),
            servings: default_servings(),
            meal_type: MealType::default(),
            logged_date: today.to_string(),
        }
    }

    /// Build the request body.
    ///
    /// # Errors
    ///
    /// Fails without a record id, if servings is not a number, or if the
    /// date is not `YYYY-MM-DD`.
    pub fn to_request(&self) -> Result<LogFoodRequest, FormError> {
        let nutrition_record_id = self
            .nutrition_record_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(FormError::MissingField("nutritionRecordId"))?;

        if !is_iso_date(&self.logged_date) {
            return Err(FormError::InvalidDate(self.logged_date.clone()));
        }

        Ok(LogFoodRequest {
            nutrition_record_id: nutrition_record_id.to_string(),
            servings: parse_required("servings", &self.servings)?,
            meal_type: self.meal_type,
            logged_date: self.logged_date.clone(),
        })
    }
}

fn parse_required(field: &'static str, value: &str) -> Result<f64, FormError> {
    parse_optional(field, value)?.ok_or(FormError::MissingField(field))
}

fn parse_optional(field: &'static str, value: &str) -> Result<Option<f64>, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(FormError::InvalidNumber {
            field,
            value: value.to_string(),
        }),
    }
}

/// Checks the `YYYY-MM-DD` shape with a plausible month and day.
fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    if !value.is_ascii() || bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    let digits = |range: std::ops::Range<usize>| -> Option<u32> {
        let part = &value[range];
        if part.bytes().all(|b| b.is_ascii_digit()) {
            part.parse().ok()
        } else {
            None
        }
    };
    match (digits(0..4), digits(5..7), digits(8..10)) {
        (Some(_), Some(month), Some(day)) => (1..=12).contains(&month) && (1..=31).contains(&day),
        _ => false,
    }
}
