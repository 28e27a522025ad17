//! Lazily initialized, shared detector handle.

use std::cell::RefCell;
use std::rc::Rc;

use super::detector::{
    select_strategy, BarcodeDetector, DetectorBackend, DetectorStrategy, StrategyKind,
};
use super::format::DetectorOptions;

type Handle<B> = DetectorStrategy<<B as DetectorBackend>::Native, <B as DetectorBackend>::Fallback>;

/// Holder for the single detector handle of a process (or browser thread).
///
/// The handle is created on first use and then shared by every caller for
/// the lifetime of the cache. Construction runs outside any borrow of the
/// slot, so overlapping first calls may each build a handle; the first one to
/// finish is stored and the others are dropped.
///
/// A failed construction leaves the slot empty, so the next call tries
/// again. A failed detection leaves the cached handle untouched.
pub struct DetectorCache<B: DetectorBackend> {
    backend: B,
    options: DetectorOptions,
    slot: RefCell<Option<Rc<Handle<B>>>>,
}

impl<B: DetectorBackend> DetectorCache<B> {
    /// Create an empty cache whose detector will be bound to the UPC formats.
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, DetectorOptions::upc())
    }

    /// Create an empty cache with explicit construction options.
    pub fn with_options(backend: B, options: DetectorOptions) -> Self {
        Self {
            backend,
            options,
            slot: RefCell::new(None),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn options(&self) -> &DetectorOptions {
        &self.options
    }

    /// Whether the environment exposes a native detector.
    pub fn has_native_detector(&self) -> bool {
        self.backend.has_native_detector()
    }

    /// Whether a handle has been created yet.
    pub fn is_initialized(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Return the shared handle, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns the backend's error unmodified if the native constructor or
    /// the fallback load fails. Nothing is cached in that case.
    pub async fn get_detector(&self) -> Result<Rc<Handle<B>>, B::Error> {
        if let Some(detector) = self.slot.borrow().as_ref() {
            return Ok(Rc::clone(detector));
        }

        let kind = select_strategy(self.backend.has_native_detector());
        log::debug!("Creating {:?} barcode detector", kind);

        let built = match kind {
            StrategyKind::Native => {
                DetectorStrategy::Native(self.backend.create_native(&self.options)?)
            }
            StrategyKind::Fallback => {
                DetectorStrategy::Fallback(self.backend.load_fallback(&self.options).await?)
            }
        };

        let mut slot = self.slot.borrow_mut();
        Ok(Rc::clone(slot.get_or_insert_with(|| Rc::new(built))))
    }

    /// Detect barcodes in `source` and return their raw values.
    ///
    /// Values keep the detector's order and are neither filtered nor
    /// deduplicated.
    ///
    /// # Errors
    ///
    /// Construction and detection failures are returned unmodified.
    pub async fn detect_barcodes(&self, source: &B::Source) -> Result<Vec<String>, B::Error> {
        let detector = self.get_detector().await?;
        let results = detector.detect(source).await?;
        Ok(results.into_iter().map(|result| result.raw_value).collect())
    }
}
