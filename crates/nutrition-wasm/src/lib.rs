//! Nutrition WASM - WebAssembly bindings for the Nutrition Llama food tracker
//!
//! This crate wires the platform-agnostic `nutrition-core` shim to the
//! browser: the native `BarcodeDetector` global, the `barcode-detector`
//! polyfill, and the food endpoint payloads used by the logging form.
//!
//! # Module Structure
//!
//! - `detector` - Barcode detection bindings and the per-thread detector
//! - `food` - Request bodies and error messages for the food endpoints
//!
//! # Usage
//!
//! ```typescript
//! import init, { detect_barcodes } from '@nutrition-llama/wasm';
//!
//! await init();
//!
//! const bitmap = await createImageBitmap(video);
//! const codes = await detect_barcodes(bitmap);
//! if (codes.length > 0) form.upcCode = codes[0];
//! ```

use wasm_bindgen::prelude::*;

mod detector;
mod food;

// Re-export public types
pub use detector::{
    detect_barcodes, get_barcode_detector, has_native_barcode_detector, upc_formats,
    BrowserBackend, JsBarcodeDetector, NativeDetector, PolyfillDetector,
};
pub use food::{api_error_message, create_food_body, log_food_body, log_redirect_path};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
