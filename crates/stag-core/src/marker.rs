use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Number of corners an engine reports per marker or rejected candidate.
pub const CORNERS_PER_MARKER: usize = 4;

/// Ordered corner points of one marker or candidate quad, in image pixels.
///
/// The order is the engine's own winding and is never changed downstream.
pub type PointGroup = Vec<Point2<f32>>;

/// A decoded marker: identifier plus its four corners.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: i32,
    pub corners: [Point2<f32>; CORNERS_PER_MARKER],
}

/// Everything an engine returns from a single detection call.
///
/// `corners[i]` belongs to `ids[i]`. `rejected` holds quads that were
/// examined but failed to decode; they carry no identifiers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub corners: Vec<PointGroup>,
    pub ids: Vec<i32>,
    pub rejected: Vec<PointGroup>,
}

impl RawDetection {
    /// Pair each decoded id with its corner group.
    ///
    /// Groups that do not have exactly four points are skipped, as are
    /// trailing groups or ids without a counterpart.
    pub fn markers(&self) -> impl Iterator<Item = Marker> + '_ {
        self.corners
            .iter()
            .zip(self.ids.iter())
            .filter_map(|(group, &id)| {
                let corners: [Point2<f32>; CORNERS_PER_MARKER] = group.as_slice().try_into().ok()?;
                Some(Marker { id, corners })
            })
    }
}

impl From<Vec<Marker>> for RawDetection {
    fn from(markers: Vec<Marker>) -> Self {
        let mut out = RawDetection::default();
        for m in markers {
            out.corners.push(m.corners.to_vec());
            out.ids.push(m.id);
        }
        out
    }
}
