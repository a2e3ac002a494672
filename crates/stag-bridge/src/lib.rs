//! Marshaling layer between array-oriented clients and a STag marker engine.
//!
//! This crate provides:
//! - codecs between engine point groups / ids and fixed-shape `ndarray`s
//!   (`(N, 4, 2)` `f32` corners, `(N, 1)` `i32` ids),
//! - a border color parser for `(b, g, r)` sequences,
//! - orchestrators that run an engine's detect and draw calls through those
//!   codecs.
//!
//! The engine itself is any [`stag_core::MarkerEngine`]. Its errors are
//! returned unchanged inside [`BridgeError::Engine`].
//!
//! ## Quickstart
//!
//! ```no_run
//! # use stag_bridge::{detect_markers_default, draw_detected_markers, MarkerEngine};
//! # fn run<E: MarkerEngine>(engine: &E, image: &mut E::Image) -> Result<(), stag_bridge::BridgeError<E::Error>> {
//! let detection = detect_markers_default(engine, image, 21)?;
//! println!("{} markers", detection.len());
//!
//! draw_detected_markers(
//!     engine,
//!     image,
//!     detection.corners.outer_iter(),
//!     detection.ids.iter(),
//!     &[50, 255, 50],
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! Coordinates are truncated toward zero when converted to arrays, so
//! `(3.9, 4.2)` is reported as `(3.0, 4.0)`.

mod color;
mod convert;
mod detect;
mod error;
mod ids;
mod params;
mod points;

pub use stag_core as core;
pub use stag_core::{BorderColor, MarkerEngine, PointGroup, RawDetection, DEFAULT_BORDER_COLOR};

pub use color::{parse_border_color, INVALID_BORDER_COLOR};
pub use convert::IntegerValue;
pub use detect::{
    detect_markers, detect_markers_default, draw_detected_markers, draw_detected_markers_default,
    Detection,
};
pub use error::{BridgeError, ConvertError};
pub use ids::{decode_id_array, decode_ids, encode_ids};
pub use params::DetectParams;
pub use points::{
    decode_corner_array, decode_point_group, decode_point_groups, encode_point_groups,
    VALUES_PER_GROUP,
};
