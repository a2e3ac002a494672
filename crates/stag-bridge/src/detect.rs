use std::borrow::Borrow;

use log::debug;
use ndarray::{Array2, Array3, Axis};
use stag_core::{BorderColor, MarkerEngine, CORNERS_PER_MARKER, DEFAULT_BORDER_COLOR};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::color::parse_border_color;
use crate::convert::IntegerValue;
use crate::error::{BridgeError, ConvertError};
use crate::ids::{decode_ids, encode_ids};
use crate::params::DetectParams;
use crate::points::{decode_point_groups, encode_point_groups};

/// Detection result in array form.
///
/// `corners` is `(N, 4, 2)` `f32`, `ids` is `(N, 1)` `i32` and `rejected` is
/// `(M, 4, 2)` `f32`. Shapes hold for `N == 0` and `M == 0` as well.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub corners: Array3<f32>,
    pub ids: Array2<i32>,
    pub rejected: Array3<f32>,
}

impl Detection {
    /// A result with no markers and no rejected candidates.
    pub fn empty() -> Self {
        Self {
            corners: Array3::zeros((0, CORNERS_PER_MARKER, 2)),
            ids: Array2::zeros((0, 1)),
            rejected: Array3::zeros((0, CORNERS_PER_MARKER, 2)),
        }
    }

    /// Number of decoded markers.
    pub fn len(&self) -> usize {
        self.ids.len_of(Axis(0))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of rejected candidate quads.
    pub fn rejected_len(&self) -> usize {
        self.rejected.len_of(Axis(0))
    }

    pub fn into_tuple(self) -> (Array3<f32>, Array2<i32>, Array3<f32>) {
        (self.corners, self.ids, self.rejected)
    }
}

/// Run the engine on `image` and convert its output to arrays.
///
/// Engine failures come back as [`BridgeError::Engine`] untouched. The only
/// conversion failure possible here is an engine that breaks its own
/// contract (a group without four corners, or ids not matching groups).
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(engine, image),
        fields(library_hd = params.library_hd, error_correction = params.error_correction)
    )
)]
pub fn detect_markers<E: MarkerEngine>(
    engine: &E,
    image: &E::Image,
    params: &DetectParams,
) -> Result<Detection, BridgeError<E::Error>> {
    debug!(
        "detect_markers: libraryHD={} errorCorrection={}",
        params.library_hd, params.error_correction
    );
    let raw = engine
        .detect(image, params.library_hd, params.error_correction)
        .map_err(BridgeError::Engine)?;

    if raw.ids.len() != raw.corners.len() {
        return Err(ConvertError::ShapeMismatch {
            what: "engine ids".to_string(),
            expected: raw.corners.len(),
            got: raw.ids.len(),
        }
        .into());
    }

    let detection = Detection {
        corners: encode_point_groups(&raw.corners)?,
        ids: encode_ids(&raw.ids),
        rejected: encode_point_groups(&raw.rejected)?,
    };
    debug!(
        "detect_markers: {} markers, {} rejected",
        detection.len(),
        detection.rejected_len()
    );
    Ok(detection)
}

/// Convenience overload with `errorCorrection = -1`.
pub fn detect_markers_default<E: MarkerEngine>(
    engine: &E,
    image: &E::Image,
    library_hd: i32,
) -> Result<Detection, BridgeError<E::Error>> {
    detect_markers(engine, image, &DetectParams::new(library_hd))
}

/// Decode client corners, ids and color, then let the engine draw into `image`.
///
/// `corners` yields one group per marker, each flattening to eight values.
/// `ids` may be empty. All decoding happens before the engine is called, so a
/// conversion failure leaves `image` untouched. The number of ids is not
/// checked against the number of groups; the engine decides what a mismatch
/// means.
///
/// Returns the same `image` reference that was passed in.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(engine, image, corners, ids, border_color))
)]
pub fn draw_detected_markers<'a, E, G, V, I, C>(
    engine: &E,
    image: &'a mut E::Image,
    corners: G,
    ids: I,
    border_color: &[C],
) -> Result<&'a mut E::Image, BridgeError<E::Error>>
where
    E: MarkerEngine,
    G: IntoIterator<Item = V>,
    V: IntoIterator,
    V::Item: Borrow<f32>,
    I: IntoIterator,
    I::Item: IntegerValue,
    C: IntegerValue,
{
    let groups = decode_point_groups(corners)?;
    let ids = decode_ids(ids)?;
    let color = parse_border_color(border_color)?;
    draw_decoded(engine, image, &groups, &ids, color)
}

/// Convenience overload: no ids and the default border color.
pub fn draw_detected_markers_default<'a, E, G, V>(
    engine: &E,
    image: &'a mut E::Image,
    corners: G,
) -> Result<&'a mut E::Image, BridgeError<E::Error>>
where
    E: MarkerEngine,
    G: IntoIterator<Item = V>,
    V: IntoIterator,
    V::Item: Borrow<f32>,
{
    draw_detected_markers(
        engine,
        image,
        corners,
        std::iter::empty::<i32>(),
        &DEFAULT_BORDER_COLOR.to_array(),
    )
}

fn draw_decoded<'a, E: MarkerEngine>(
    engine: &E,
    image: &'a mut E::Image,
    groups: &[stag_core::PointGroup],
    ids: &[i32],
    color: BorderColor,
) -> Result<&'a mut E::Image, BridgeError<E::Error>> {
    debug!(
        "draw_detected_markers: {} groups, {} ids, color={:?}",
        groups.len(),
        ids.len(),
        color.to_array()
    );
    engine
        .draw_overlay(image, groups, ids, color)
        .map_err(BridgeError::Engine)?;
    Ok(image)
}
