//! STag library HD table.
//!
//! The marshaling layer passes `libraryHD` and `errorCorrection` through to
//! the engine untouched. These helpers exist for engines and for callers that
//! want to check their inputs up front.

/// HD values an engine is expected to ship dictionaries for.
pub const SUPPORTED_LIBRARY_HDS: [i32; 7] = [11, 13, 15, 17, 19, 21, 23];

/// Sentinel for "use the maximum correction the library HD allows".
pub const DEFAULT_ERROR_CORRECTION: i32 = -1;

#[inline]
pub fn is_supported_library_hd(library_hd: i32) -> bool {
    SUPPORTED_LIBRARY_HDS.contains(&library_hd)
}

/// Largest valid `errorCorrection` for a library: `(hd - 1) / 2`.
#[inline]
pub fn max_error_correction(library_hd: i32) -> i32 {
    (library_hd - 1) / 2
}
