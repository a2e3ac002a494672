//! Identifier codec: engine ids <-> `(N, 1)` `i32` column arrays.

use log::trace;
use ndarray::{Array1, Array2, ArrayView, Axis, Dimension};

use crate::convert::IntegerValue;
use crate::error::ConvertError;

/// Encode engine ids as an `(N, 1)` column.
pub fn encode_ids(ids: &[i32]) -> Array2<i32> {
    Array1::from(ids.to_vec()).insert_axis(Axis(1))
}

/// Decode a flat sequence of client ids.
///
/// Each element must be integer-representable (`3` or `3.0`, not `3.5`).
pub fn decode_ids<I>(ids: I) -> Result<Vec<i32>, ConvertError>
where
    I: IntoIterator,
    I::Item: IntegerValue,
{
    let decoded = ids
        .into_iter()
        .enumerate()
        .map(|(index, v)| {
            v.to_i32_exact()
                .map_err(|reason| ConvertError::TypeConversion { index, reason })
        })
        .collect::<Result<Vec<_>, _>>()?;
    trace!("decoded {} ids", decoded.len());
    Ok(decoded)
}

/// Decode an id array of any shape, flattened in row-major order.
///
/// `(N, 1)`, `(1, N)` and `(N,)` all yield the same `N` ids.
pub fn decode_id_array<T, D>(ids: ArrayView<'_, T, D>) -> Result<Vec<i32>, ConvertError>
where
    T: IntegerValue,
    D: Dimension,
{
    decode_ids(ids.iter())
}
