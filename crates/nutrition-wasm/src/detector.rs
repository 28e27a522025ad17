//! Barcode detection WASM bindings.
//!
//! This module backs the core detector shim with the browser:
//! - The native `BarcodeDetector` global, when the platform provides one
//! - The `barcode-detector` package (a WASM build of ZXing) otherwise,
//!   imported the first time a detector is needed
//!
//! # Functions
//!
//! - [`has_native_barcode_detector`] - Probe for the native detector
//! - [`upc_formats`] - The formats every detector is bound to
//! - [`get_barcode_detector`] - The shared detector object
//! - [`detect_barcodes`] - Raw values of the barcodes in an image source
//!
//! # Example
//!
//! ```typescript
//! import { detect_barcodes } from '@nutrition-llama/wasm';
//!
//! // Any ImageBitmapSource: <video>, <canvas>, ImageBitmap, Blob, ImageData...
//! const codes = await detect_barcodes(videoElement);
//! ```

use std::rc::Rc;

use js_sys::{Array, Function, Promise, Reflect};
use nutrition_core::barcode::{
    BarcodeDetector, BarcodeFormat, DetectedBarcode, DetectorBackend, DetectorCache,
    DetectorOptions, DetectorStrategy, UPC_FORMATS,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Name of the platform constructor on `globalThis`.
const NATIVE_DETECTOR_GLOBAL: &str = "BarcodeDetector";

#[wasm_bindgen(module = "/js/barcode_polyfill.js")]
extern "C" {
    #[wasm_bindgen(js_name = loadBarcodeDetectorPolyfill)]
    fn load_barcode_detector_polyfill() -> Promise;
}

#[wasm_bindgen]
extern "C" {
    /// Any JavaScript object implementing the `BarcodeDetector` interface.
    ///
    /// Both the native detector and the polyfill are used through this type.
    #[derive(Debug, Clone)]
    pub type JsBarcodeDetector;

    #[wasm_bindgen(method, catch)]
    fn detect(this: &JsBarcodeDetector, source: &JsValue) -> Result<Promise, JsValue>;
}

/// One entry of the array resolved by `detect()`.
///
/// Other fields (`boundingBox`, `cornerPoints`) are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsDetectedBarcode {
    raw_value: String,
    #[serde(default)]
    format: Option<String>,
}

impl From<JsDetectedBarcode> for DetectedBarcode {
    fn from(result: JsDetectedBarcode) -> Self {
        let format = result
            .format
            .and_then(|tag| tag.parse::<BarcodeFormat>().ok());
        DetectedBarcode::new(result.raw_value, format)
    }
}

/// Run `detect()` on a JS detector and convert its results.
///
/// Exceptions and rejections are returned as thrown.
async fn detect_with(
    detector: &JsBarcodeDetector,
    source: &JsValue,
) -> Result<Vec<DetectedBarcode>, JsValue> {
    let promise = detector.detect(source)?;
    let results = JsFuture::from(promise).await?;
    let results: Vec<JsDetectedBarcode> = serde_wasm_bindgen::from_value(results)?;
    Ok(results.into_iter().map(DetectedBarcode::from).collect())
}

/// Detector built from the platform's `BarcodeDetector`.
#[derive(Debug, Clone)]
pub struct NativeDetector(JsBarcodeDetector);

/// Detector built from the `barcode-detector` polyfill.
#[derive(Debug, Clone)]
pub struct PolyfillDetector(JsBarcodeDetector);

impl NativeDetector {
    pub fn as_js(&self) -> &JsBarcodeDetector {
        &self.0
    }
}

impl PolyfillDetector {
    pub fn as_js(&self) -> &JsBarcodeDetector {
        &self.0
    }
}

impl BarcodeDetector for NativeDetector {
    type Source = JsValue;
    type Error = JsValue;

    async fn detect(&self, source: &JsValue) -> Result<Vec<DetectedBarcode>, JsValue> {
        detect_with(&self.0, source).await
    }
}

impl BarcodeDetector for PolyfillDetector {
    type Source = JsValue;
    type Error = JsValue;

    async fn detect(&self, source: &JsValue) -> Result<Vec<DetectedBarcode>, JsValue> {
        detect_with(&self.0, source).await
    }
}

/// The browser environment: native detector if present, polyfill otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserBackend;

impl DetectorBackend for BrowserBackend {
    type Source = JsValue;
    type Error = JsValue;
    type Native = NativeDetector;
    type Fallback = PolyfillDetector;

    fn has_native_detector(&self) -> bool {
        native_constructor().is_some()
    }

    fn create_native(&self, options: &DetectorOptions) -> Result<NativeDetector, JsValue> {
        let constructor = native_constructor()
            .ok_or_else(|| JsValue::from_str("BarcodeDetector is not available"))?;
        construct(&constructor, options).map(NativeDetector)
    }

    async fn load_fallback(
        &self,
        options: &DetectorOptions,
    ) -> Result<PolyfillDetector, JsValue> {
        log::debug!("Loading barcode-detector polyfill");
        let constructor: Function = JsFuture::from(load_barcode_detector_polyfill())
            .await?
            .dyn_into()?;
        construct(&constructor, options).map(PolyfillDetector)
    }
}

/// `globalThis.BarcodeDetector`, if it is a constructor.
fn native_constructor() -> Option<Function> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(NATIVE_DETECTOR_GLOBAL))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok())
}

/// `new constructor({ formats })`
fn construct(
    constructor: &Function,
    options: &DetectorOptions,
) -> Result<JsBarcodeDetector, JsValue> {
    let options = serde_wasm_bindgen::to_value(options)?;
    let instance = Reflect::construct(constructor, &Array::of1(&options))?;
    Ok(instance.unchecked_into())
}

type SharedDetector = DetectorStrategy<NativeDetector, PolyfillDetector>;

fn detector_object(detector: &SharedDetector) -> &JsBarcodeDetector {
    match detector {
        DetectorStrategy::Native(native) => native.as_js(),
        DetectorStrategy::Fallback(polyfill) => polyfill.as_js(),
    }
}

thread_local! {
    static DETECTOR: Rc<DetectorCache<BrowserBackend>> =
        Rc::new(DetectorCache::new(BrowserBackend));
}

fn shared_cache() -> Rc<DetectorCache<BrowserBackend>> {
    DETECTOR.with(Rc::clone)
}

/// Check whether the browser provides a native `BarcodeDetector`.
#[wasm_bindgen]
pub fn has_native_barcode_detector() -> bool {
    BrowserBackend.has_native_detector()
}

/// The barcode formats detectors are bound to (`upc_a`, `upc_e`, `ean_13`, `ean_8`).
#[wasm_bindgen]
pub fn upc_formats() -> Vec<String> {
    UPC_FORMATS.iter().map(|f| f.as_str().to_string()).collect()
}

/// Get the shared detector object, creating it on first use.
///
/// The same object is returned on every call. When the browser has no
/// native detector, the first call loads the polyfill.
///
/// # Errors
///
/// Returns the exception thrown by the detector constructor or by the
/// polyfill import, unmodified. A failed import is retried on the next call.
#[wasm_bindgen]
pub async fn get_barcode_detector() -> Result<JsValue, JsValue> {
    let cache = shared_cache();
    let detector = cache.get_detector().await?;
    Ok(detector_object(&detector).clone().into())
}

/// Detect barcodes in an image source and return their raw values.
///
/// Values are in the order reported by the detector; repeated readings of
/// the same code are kept.
///
/// # Arguments
///
/// * `source` - Any `ImageBitmapSource` accepted by `BarcodeDetector.detect()`
///
/// # Errors
///
/// Returns the detector's exception unmodified. The shared detector is kept
/// after a failed detection.
///
/// # Example
///
/// ```typescript
/// const codes = await detect_barcodes(canvas);
/// // ["012345678905"]
/// ```
#[wasm_bindgen]
pub async fn detect_barcodes(source: JsValue) -> Result<Array, JsValue> {
    let cache = shared_cache();
    let values = cache.detect_barcodes(&source).await?;
    Ok(values.iter().map(|value| JsValue::from_str(value)).collect())
}


/// WASM-specific tests that require a browser.
///
/// A fake `BarcodeDetector` class is installed on `globalThis`; every test
/// uses its own `DetectorCache` so the shared one is never touched. Use
/// `wasm-pack test --headless --chrome` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use nutrition_core::barcode::StrategyKind;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const FAKE_DETECTOR: &str = r#"
        globalThis.BarcodeDetector = class {
            constructor(options) {
                globalThis.__detectorOptions = options;
                globalThis.__detectorCount = (globalThis.__detectorCount || 0) + 1;
            }
            async detect(source) {
                if (source === "broken") {
                    throw new TypeError("decode failed");
                }
                if (source === "empty") {
                    return [];
                }
                return [
                    { rawValue: "012345678905", format: "upc_a", cornerPoints: [] },
                    { rawValue: "012345678905", format: "upc_a", cornerPoints: [] },
                ];
            }
        };
        globalThis.__detectorCount = 0;
    "#;

    fn install_fake_detector() {
        Function::new_no_args(FAKE_DETECTOR)
            .call0(&JsValue::NULL)
            .unwrap();
    }

    fn global(name: &str) -> JsValue {
        Reflect::get(&js_sys::global(), &JsValue::from_str(name)).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_probe_sees_installed_detector() {
        install_fake_detector();
        assert!(has_native_barcode_detector());
    }

    #[wasm_bindgen_test]
    async fn test_native_detector_bound_to_upc_formats() {
        install_fake_detector();
        let cache = DetectorCache::new(BrowserBackend);

        let detector = cache.get_detector().await.unwrap();
        assert_eq!(detector.kind(), StrategyKind::Native);

        let options: DetectorOptions =
            serde_wasm_bindgen::from_value(global("__detectorOptions")).unwrap();
        assert_eq!(options, DetectorOptions::upc());
    }

    #[wasm_bindgen_test]
    async fn test_native_detector_created_once() {
        install_fake_detector();
        let cache = DetectorCache::new(BrowserBackend);

        let first = cache.get_detector().await.unwrap();
        let second = cache.get_detector().await.unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(global("__detectorCount").as_f64(), Some(1.0));
    }

    #[wasm_bindgen_test]
    async fn test_detect_keeps_duplicates() {
        install_fake_detector();
        let cache = DetectorCache::new(BrowserBackend);

        let values = cache
            .detect_barcodes(&JsValue::from_str("frame"))
            .await
            .unwrap();
        assert_eq!(values, vec!["012345678905", "012345678905"]);
    }

    #[wasm_bindgen_test]
    async fn test_detect_empty() {
        install_fake_detector();
        let cache = DetectorCache::new(BrowserBackend);

        let values = cache
            .detect_barcodes(&JsValue::from_str("empty"))
            .await
            .unwrap();
        assert!(values.is_empty());
    }

    #[wasm_bindgen_test]
    async fn test_detect_error_is_passed_through() {
        install_fake_detector();
        let cache = DetectorCache::new(BrowserBackend);

        let err = cache
            .detect_barcodes(&JsValue::from_str("broken"))
            .await
            .unwrap_err();
        assert!(err.is_instance_of::<js_sys::TypeError>());
        let message = Reflect::get(&err, &JsValue::from_str("message")).unwrap();
        assert_eq!(message.as_string().as_deref(), Some("decode failed"));

        // The handle survives a failed detection.
        assert!(cache.is_initialized());
    }

    #[wasm_bindgen_test]
    async fn test_exported_detect_returns_strings() {
        install_fake_detector();
        let values = detect_barcodes(JsValue::from_str("frame")).await.unwrap();

        assert_eq!(values.length(), 2);
        assert_eq!(values.get(0).as_string().as_deref(), Some("012345678905"));
    }
}
