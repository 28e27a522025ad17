//! Barcode recognition shim.
//!
//! This module exposes a single operation, "detect the barcodes of interest in
//! an image", regardless of which implementation the host provides:
//! - A **native** detector built into the platform (preferred, no load cost)
//! - A **fallback** software detector loaded on demand the first time it is
//!   needed
//!
//! # Architecture
//!
//! The environment is abstracted behind [`DetectorBackend`], which probes for
//! the native capability and constructs either implementation. The choice is
//! captured in the [`DetectorStrategy`] sum type, and [`DetectorCache`] holds
//! the one handle shared by every caller.
//!
//! Everything here is single-threaded and cooperative: the only suspension
//! points are the fallback load and the detection call itself.
//!
//! # Examples
//!
//! ```ignore
//! use nutrition_core::barcode::DetectorCache;
//!
//! let cache = DetectorCache::new(backend);
//! let codes = cache.detect_barcodes(&frame).await?;
//! ```

mod cache;
mod detector;
mod format;

pub use cache::DetectorCache;
pub use detector::{
    select_strategy, BarcodeDetector, DetectedBarcode, DetectorBackend, DetectorStrategy,
    StrategyKind,
};
pub use format::{BarcodeFormat, DetectorOptions, UnknownFormat, UPC_FORMATS};
