//! Gate check: a binding may require solid cells near the observer
//! (e.g. being underground) before it scans for targets at all.

use glam::IVec3;

use prospector_core::error::SampleError;
use prospector_core::region::Region;

use crate::source::SpatialSampler;

/// Whether any cell of `gate` around `origin` is neither empty nor unloaded.
///
/// Stops at the first solid cell.
pub fn is_open<S>(sampler: &S, gate: &Region, origin: IVec3) -> Result<bool, SampleError>
where
    S: SpatialSampler + ?Sized,
{
    for pos in gate.offset_by(origin).cells() {
        if sampler.is_solid(pos)? {
            return Ok(true);
        }
    }
    Ok(false)
}
