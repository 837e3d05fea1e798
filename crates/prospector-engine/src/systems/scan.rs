//! Target scan and nearest-distance computation.

use std::collections::HashSet;

use glam::IVec3;

use prospector_core::binding::Binding;
use prospector_core::error::SampleError;

use crate::source::SpatialSampler;

/// Record every cell in the binding's region around `origin` whose identity
/// is one of the binding's targets. Returns the number of new detections.
pub fn collect_targets<S>(
    sampler: &S,
    binding: &Binding,
    origin: IVec3,
    detected: &mut HashSet<IVec3>,
) -> Result<usize, SampleError>
where
    S: SpatialSampler + ?Sized,
{
    if binding.target_ids().is_empty() {
        return Ok(0);
    }

    let mut added = 0;
    for pos in binding.region().offset_by(origin).cells() {
        if binding.is_target(sampler.cell_identity(pos)?) && detected.insert(pos) {
            added += 1;
        }
    }
    Ok(added)
}

/// Squared Euclidean distance between two cells.
pub fn distance_squared(a: IVec3, b: IVec3) -> i64 {
    let dx = i64::from(b.x) - i64::from(a.x);
    let dy = i64::from(b.y) - i64::from(a.y);
    let dz = i64::from(b.z) - i64::from(a.z);
    dx * dx + dy * dy + dz * dz
}

/// Distance (whole cells, rounded down) from `origin` to the nearest cell.
///
/// Compares squared distances and takes a single square root at the end.
pub fn nearest_distance<'a, I>(origin: IVec3, cells: I) -> Option<u32>
where
    I: IntoIterator<Item = &'a IVec3>,
{
    let min_sq = cells
        .into_iter()
        .map(|pos| distance_squared(origin, *pos))
        .min()?;
    Some((min_sq as f64).sqrt().floor() as u32)
}
