use serde::{Deserialize, Serialize};
use stag_core::DEFAULT_ERROR_CORRECTION;

fn default_error_correction() -> i32 {
    DEFAULT_ERROR_CORRECTION
}

/// Parameters forwarded to the engine's detect call.
///
/// Neither field is validated here. An unsupported `library_hd` or an
/// `error_correction` outside `0..=(library_hd - 1) / 2` surfaces as an
/// engine error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectParams {
    /// Library HD; engines ship 11, 13, 15, 17, 19, 21 and 23.
    pub library_hd: i32,
    /// Maximum corrected bit errors per marker, `-1` for the library maximum.
    #[serde(default = "default_error_correction")]
    pub error_correction: i32,
}

impl DetectParams {
    /// Parameters for `library_hd` with the maximum error correction.
    pub fn new(library_hd: i32) -> Self {
        Self {
            library_hd,
            error_correction: DEFAULT_ERROR_CORRECTION,
        }
    }

    pub fn with_error_correction(mut self, error_correction: i32) -> Self {
        self.error_correction = error_correction;
        self
    }
}
