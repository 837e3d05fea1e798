//! Host-provided collaborators consumed by the engine.

use glam::{DVec3, IVec3};

use prospector_core::constants::{EMPTY_CELL_ID, UNLOADED_CELL_ID};
use prospector_core::error::SampleError;

/// Where the observer is and which detector, if any, it currently holds.
pub trait ObserverSource {
    /// Continuous observer position, or `None` if there is no observer.
    fn observer_position(&self) -> Option<DVec3>;

    /// Identity of the currently equipped detector item.
    fn active_detector(&self) -> Option<String>;
}

/// Read access to cell identities in the world.
///
/// Lookups are expected to be in-memory and non-blocking.
pub trait SpatialSampler {
    fn cell_identity(&self, pos: IVec3) -> Result<&str, SampleError>;

    /// Identity reserved for empty cells.
    fn empty_identity(&self) -> &str {
        EMPTY_CELL_ID
    }

    /// Identity reserved for cells that are not loaded.
    fn unloaded_identity(&self) -> &str {
        UNLOADED_CELL_ID
    }

    /// Whether the cell is neither empty nor unloaded.
    fn is_solid(&self, pos: IVec3) -> Result<bool, SampleError> {
        let id = self.cell_identity(pos)?;
        Ok(id != self.empty_identity() && id != self.unloaded_identity())
    }
}
