//! Point codec: engine point groups <-> `(N, 4, 2)` `f32` arrays.

use std::borrow::Borrow;

use log::trace;
use nalgebra::Point2;
use ndarray::{Array3, ArrayView, Axis, RemoveAxis};
use stag_core::{PointGroup, CORNERS_PER_MARKER};

use crate::error::ConvertError;

/// Scalar values making up one encoded group: 4 corners x 2 coordinates.
pub const VALUES_PER_GROUP: usize = CORNERS_PER_MARKER * 2;

/// Integer part of a coordinate, stored back as `f32`.
///
/// Sub-pixel precision from the engine is dropped on purpose, matching the
/// arrays clients already consume. NaN maps to `0.0` and out-of-range values
/// saturate at the `i32` bounds.
#[inline]
fn truncate_coord(v: f32) -> f32 {
    (v as i32) as f32
}

/// Encode engine point groups into an `(N, 4, 2)` array.
///
/// Every group must hold exactly four points; anything else is a broken
/// engine contract and fails with `ShapeMismatch`.
pub fn encode_point_groups(groups: &[PointGroup]) -> Result<Array3<f32>, ConvertError> {
    let mut out = Array3::<f32>::zeros((groups.len(), CORNERS_PER_MARKER, 2));
    for (index, (group, mut block)) in groups.iter().zip(out.outer_iter_mut()).enumerate() {
        if group.len() != CORNERS_PER_MARKER {
            return Err(ConvertError::ShapeMismatch {
                what: format!("engine point group {index}"),
                expected: VALUES_PER_GROUP,
                got: group.len() * 2,
            });
        }
        for (pt, mut row) in group.iter().zip(block.outer_iter_mut()) {
            row[0] = truncate_coord(pt.x);
            row[1] = truncate_coord(pt.y);
        }
    }
    Ok(out)
}

/// Decode one client group holding exactly eight values `x0 y0 x1 y1 ...`.
///
/// Any source layout is fine as long as it flattens to eight values in
/// row-major order: `(4, 2)`, `(1, 4, 2)`, `(8,)`.
pub fn decode_point_group<V>(index: usize, values: V) -> Result<PointGroup, ConvertError>
where
    V: IntoIterator,
    V::Item: Borrow<f32>,
{
    let flat: Vec<f32> = values.into_iter().map(|v| *v.borrow()).collect();
    if flat.len() != VALUES_PER_GROUP {
        return Err(ConvertError::ShapeMismatch {
            what: format!("corner group {index}"),
            expected: VALUES_PER_GROUP,
            got: flat.len(),
        });
    }
    Ok(flat
        .chunks_exact(2)
        .map(|xy| Point2::new(xy[0], xy[1]))
        .collect())
}

/// Decode a sequence of client groups into engine point groups.
///
/// Fails on the first group that does not hold exactly eight values.
pub fn decode_point_groups<I, V>(groups: I) -> Result<Vec<PointGroup>, ConvertError>
where
    I: IntoIterator<Item = V>,
    V: IntoIterator,
    V::Item: Borrow<f32>,
{
    let decoded = groups
        .into_iter()
        .enumerate()
        .map(|(index, values)| decode_point_group(index, values))
        .collect::<Result<Vec<_>, _>>()?;
    trace!("decoded {} corner groups", decoded.len());
    Ok(decoded)
}

/// Decode an array whose first axis enumerates groups, e.g. `(N, 4, 2)`.
pub fn decode_corner_array<D>(corners: ArrayView<'_, f32, D>) -> Result<Vec<PointGroup>, ConvertError>
where
    D: RemoveAxis,
{
    decode_point_groups(corners.axis_iter(Axis(0)))
}
