//! Nutrition Core - Barcode detection and food logging model
//!
//! This crate provides the platform-agnostic pieces of the Nutrition Llama
//! food tracker: the barcode recognition shim that picks between a native
//! detector and a software fallback, and the payloads exchanged with the
//! food creation and food logging endpoints.
//!
//! # Module Structure
//!
//! - `barcode` - Barcode formats, the detector abstraction and the lazily
//!   initialized detector holder
//! - `api` - Request/response payloads and form parsing for the food endpoints

pub mod api;
pub mod barcode;

pub use api::{
    ApiErrorBody, CreateFoodRequest, FoodForm, FoodSource, FormError, LogFoodRequest, LogForm,
    MealType, ServingSizeUnit,
};
pub use barcode::{
    select_strategy, BarcodeDetector, BarcodeFormat, DetectedBarcode, DetectorBackend,
    DetectorCache, DetectorOptions, DetectorStrategy, StrategyKind, UnknownFormat, UPC_FORMATS,
};
