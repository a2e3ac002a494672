use crate::color::BorderColor;
use crate::marker::{PointGroup, RawDetection};

/// A marker detection and overlay engine.
///
/// The engine is a black box to the marshaling layer: it owns the image
/// representation, validates channel counts, `library_hd` membership and the
/// `error_correction` range, and reports failures through its own error type.
/// Callers receive that error unchanged.
///
/// Implementations that are reentrant may be shared across threads for
/// `detect`; `draw_overlay` mutates its image and needs exclusive access.
pub trait MarkerEngine {
    /// Image buffer the engine reads from and draws into.
    type Image: ?Sized;
    /// Failure reported by the engine.
    type Error;

    /// Detect markers in `image`.
    ///
    /// `error_correction == -1` selects the engine maximum for `library_hd`.
    fn detect(
        &self,
        image: &Self::Image,
        library_hd: i32,
        error_correction: i32,
    ) -> Result<RawDetection, Self::Error>;

    /// Draw marker borders (and ids, if any) into `image` in place.
    fn draw_overlay(
        &self,
        image: &mut Self::Image,
        corners: &[PointGroup],
        ids: &[i32],
        color: BorderColor,
    ) -> Result<(), Self::Error>;
}
