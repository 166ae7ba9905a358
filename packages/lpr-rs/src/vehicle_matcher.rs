//! Assigns a plate to the tracked vehicle whose box fully contains it.
use crate::geometry::BoundingBox;
use crate::tracker::TrackedVehicle;

/// First vehicle, in the given order, whose box strictly contains `plate`.
///
/// Overlapping vehicles that both contain the plate resolve to whichever
/// comes first; no distance or area tie-break is applied.
pub fn match_vehicle<'a>(
    plate: &BoundingBox,
    vehicles: &'a [TrackedVehicle],
) -> Option<&'a TrackedVehicle> {
    vehicles.iter().find(|v| v.bbox.contains_strictly(plate))
}
