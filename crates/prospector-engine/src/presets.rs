//! Ready-made detector bindings.

use std::sync::Arc;

use glam::IVec3;

use prospector_core::binding::{Binding, Signal};
use prospector_core::constants::*;
use prospector_core::error::BindingError;
use prospector_core::region::Region;

/// Pings faster the closer an open cave is below the observer.
///
/// Gated on solid cells around the observer, so it stays silent in open air.
pub fn cave_detector(signal: Arc<dyn Signal>) -> Result<Binding, BindingError> {
    let region = Region::new(
        IVec3::from_array(CAVE_REGION_MIN),
        IVec3::from_array(CAVE_REGION_MAX),
    )?;
    Binding::builder(CAVE_DETECTOR_ID, region)
        .target(EMPTY_CELL_ID)
        .gate(Region::cube(CAVE_GATE_RADIUS)?)
        .linear_period(CAVE_PERIOD_LOW_MS, CAVE_PERIOD_HIGH_MS)
        .shared_signal(signal)
        .build()
}

/// Pings faster the closer an ore cell is, within a large cube.
pub fn ore_detector(signal: Arc<dyn Signal>) -> Result<Binding, BindingError> {
    Binding::builder(ORE_DETECTOR_ID, Region::cube(ORE_SCAN_RADIUS)?)
        .target(ORE_CELL_ID)
        .linear_period(ORE_PERIOD_LOW_MS, ORE_PERIOD_HIGH_MS)
        .shared_signal(signal)
        .build()
}

/// All bundled presets, sharing one signal.
pub fn all(signal: Arc<dyn Signal>) -> Result<Vec<Binding>, BindingError> {
    Ok(vec![
        cave_detector(Arc::clone(&signal))?,
        ore_detector(signal)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cave_detector_shape() {
        let binding = cave_detector(Arc::new(|| {})).unwrap();
        assert_eq!(binding.region().size(), IVec3::new(3, 51, 3));
        assert_eq!(binding.gate_region(), Some(&Region::cube(3).unwrap()));
        assert!(binding.is_target(EMPTY_CELL_ID));
        assert_eq!(binding.period_ms(0), 250);
        assert_eq!(binding.period_ms(100), 1000);
    }

    #[test]
    fn test_ore_detector_shape() {
        let binding = ore_detector(Arc::new(|| {})).unwrap();
        assert_eq!(binding.region().size(), IVec3::splat(65));
        assert!(binding.gate_region().is_none());
        assert_eq!(binding.period_ms(0), 200);
        assert_eq!(binding.period_ms(1_000), 2000);
    }

    #[test]
    fn test_all_presets_unique_ids() {
        let bindings = all(Arc::new(|| {})).unwrap();
        assert_eq!(bindings.len(), 2);
        assert_ne!(bindings[0].detector_id(), bindings[1].detector_id());
    }
}
