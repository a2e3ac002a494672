//! Engine-native types for STag marker detection bindings.
//!
//! This crate is intentionally small. It does *not* detect markers; it only
//! describes the values a marker engine exchanges with the marshaling layer
//! (`stag-bridge`) and the [`MarkerEngine`] interface the engine implements.

mod color;
mod engine;
mod library;
mod logger;
mod marker;

pub use color::{BorderColor, DEFAULT_BORDER_COLOR};
pub use engine::MarkerEngine;
pub use library::{
    is_supported_library_hd, max_error_correction, DEFAULT_ERROR_CORRECTION, SUPPORTED_LIBRARY_HDS,
};
pub use marker::{Marker, PointGroup, RawDetection, CORNERS_PER_MARKER};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
