//! Color parser for overlay borders.

use stag_core::BorderColor;

use crate::convert::IntegerValue;
use crate::error::ConvertError;

/// Message reported for a border color that is not a `(b, g, r)` triple.
pub const INVALID_BORDER_COLOR: &str = "Invalid value for border color.";

/// Parse a `(b, g, r)` sequence into a [`BorderColor`].
///
/// The length check runs first; a sequence of the wrong length is an
/// `InvalidArgument` regardless of its contents. Components must then be
/// integer-representable.
pub fn parse_border_color<T: IntegerValue>(values: &[T]) -> Result<BorderColor, ConvertError> {
    let [b, g, r] = values else {
        return Err(ConvertError::InvalidArgument(INVALID_BORDER_COLOR.to_string()));
    };
    let component = |index: usize, v: &T| {
        v.to_i32_exact()
            .map_err(|reason| ConvertError::TypeConversion { index, reason })
    };
    Ok(BorderColor::new(
        component(0, b)?,
        component(1, g)?,
        component(2, r)?,
    ))
}
