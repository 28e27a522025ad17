//! Detector abstraction: the detection interface, the native/fallback
//! strategy and the environment backend that builds them.

// The traits are consumed from a single-threaded executor, so the futures
// returned by their async methods are not required to be `Send`.
#![allow(async_fn_in_trait)]

use serde::{Deserialize, Serialize};

use super::format::{BarcodeFormat, DetectorOptions};

/// A single barcode found in an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedBarcode {
    /// The decoded payload, before any product lookup.
    pub raw_value: String,
    /// Symbology of the result. `None` when the implementation reports a
    /// format outside the known set.
    #[serde(default)]
    pub format: Option<BarcodeFormat>,
}

impl DetectedBarcode {
    pub fn new(raw_value: impl Into<String>, format: Option<BarcodeFormat>) -> Self {
        Self {
            raw_value: raw_value.into(),
            format,
        }
    }
}

/// Anything that can find barcodes in an image source.
///
/// Results are returned in the order the underlying implementation produced
/// them.
pub trait BarcodeDetector {
    /// The image representation accepted by `detect`.
    type Source: ?Sized;
    /// Failure reported by the implementation.
    type Error;

    async fn detect(&self, source: &Self::Source) -> Result<Vec<DetectedBarcode>, Self::Error>;
}

/// Which implementation backs a detector handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Native,
    Fallback,
}

/// Pick the implementation for an environment.
pub fn select_strategy(native_available: bool) -> StrategyKind {
    if native_available {
        StrategyKind::Native
    } else {
        StrategyKind::Fallback
    }
}

/// A detector handle backed by either the native or the fallback
/// implementation. Both variants satisfy the same contract.
#[derive(Debug)]
pub enum DetectorStrategy<N, F> {
    Native(N),
    Fallback(F),
}

impl<N, F> DetectorStrategy<N, F> {
    pub fn kind(&self) -> StrategyKind {
        match self {
            DetectorStrategy::Native(_) => StrategyKind::Native,
            DetectorStrategy::Fallback(_) => StrategyKind::Fallback,
        }
    }
}

impl<N, F> BarcodeDetector for DetectorStrategy<N, F>
where
    N: BarcodeDetector,
    F: BarcodeDetector<Source = N::Source, Error = N::Error>,
{
    type Source = N::Source;
    type Error = N::Error;

    async fn detect(&self, source: &Self::Source) -> Result<Vec<DetectedBarcode>, Self::Error> {
        match self {
            DetectorStrategy::Native(detector) => detector.detect(source).await,
            DetectorStrategy::Fallback(detector) => detector.detect(source).await,
        }
    }
}

/// The host environment as seen by the shim.
///
/// A backend answers whether a native detector exists and knows how to
/// build each implementation. Construction errors share the detectors'
/// error type so they reach the caller unmodified.
pub trait DetectorBackend {
    type Source: ?Sized;
    type Error;
    type Native: BarcodeDetector<Source = Self::Source, Error = Self::Error>;
    type Fallback: BarcodeDetector<Source = Self::Source, Error = Self::Error>;

    /// Pure capability probe, no side effects.
    fn has_native_detector(&self) -> bool;

    /// Build the platform detector.
    fn create_native(&self, options: &DetectorOptions) -> Result<Self::Native, Self::Error>;

    /// Load the software implementation and build a detector from it.
    async fn load_fallback(&self, options: &DetectorOptions)
        -> Result<Self::Fallback, Self::Error>;
}
