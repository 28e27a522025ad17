//! Barcode symbologies and detector construction options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A barcode symbology relevant to retail product codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarcodeFormat {
    /// UPC-A, 12 digits.
    #[serde(rename = "upc_a")]
    UpcA,
    /// UPC-E, the zero-suppressed 8 digit form of UPC-A.
    #[serde(rename = "upc_e")]
    UpcE,
    /// EAN-13, 13 digits.
    #[serde(rename = "ean_13")]
    Ean13,
    /// EAN-8, 8 digits.
    #[serde(rename = "ean_8")]
    Ean8,
}

/// The fixed set of formats every detector is bound to.
pub const UPC_FORMATS: [BarcodeFormat; 4] = [
    BarcodeFormat::UpcA,
    BarcodeFormat::UpcE,
    BarcodeFormat::Ean13,
    BarcodeFormat::Ean8,
];

impl BarcodeFormat {
    /// The tag used by the detector APIs (e.g. `"ean_13"`).
    pub fn as_str(self) -> &'static str {
        match self {
            BarcodeFormat::UpcA => "upc_a",
            BarcodeFormat::UpcE => "upc_e",
            BarcodeFormat::Ean13 => "ean_13",
            BarcodeFormat::Ean8 => "ean_8",
        }
    }
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a format tag is not one of the known symbologies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown barcode format: {0}")]
pub struct UnknownFormat(pub String);

impl FromStr for BarcodeFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upc_a" => Ok(BarcodeFormat::UpcA),
            "upc_e" => Ok(BarcodeFormat::UpcE),
            "ean_13" => Ok(BarcodeFormat::Ean13),
            "ean_8" => Ok(BarcodeFormat::Ean8),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

/// Configuration passed to a detector constructor.
///
/// Serializes as `{ "formats": ["upc_a", ...] }`, which is the options
/// object both the native detector and the fallback accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorOptions {
    pub formats: Vec<BarcodeFormat>,
}

impl DetectorOptions {
    /// Options bound to [`UPC_FORMATS`].
    pub fn upc() -> Self {
        Self {
            formats: UPC_FORMATS.to_vec(),
        }
    }
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self::upc()
    }
}
