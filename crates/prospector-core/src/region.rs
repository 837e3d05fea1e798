//! Inclusive integer bounding boxes used for scan and gate regions.
//!
//! A region stored on a binding holds offsets relative to the observer;
//! [`Region::offset_by`] turns it into absolute world cells at scan time.

use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_REGION_CELLS;
use crate::error::RegionError;

/// Axis-aligned box of integer cells, inclusive on both corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RegionBounds", into = "RegionBounds")]
pub struct Region {
    min: IVec3,
    max: IVec3,
}

/// Unvalidated wire form of a [`Region`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegionBounds {
    pub min: [i32; 3],
    pub max: [i32; 3],
}

impl Region {
    /// Create a region from its inclusive corners.
    pub fn new(min: IVec3, max: IVec3) -> Result<Self, RegionError> {
        if min.cmpgt(max).any() {
            return Err(RegionError::Inverted { min, max });
        }
        let region = Self { min, max };
        let cells = region.checked_volume().unwrap_or(u64::MAX);
        if cells > MAX_REGION_CELLS {
            return Err(RegionError::TooLarge {
                cells,
                limit: MAX_REGION_CELLS,
            });
        }
        Ok(region)
    }

    /// Cube centred on the origin with an edge of `2 * radius + 1` cells.
    pub fn cube(radius: i32) -> Result<Self, RegionError> {
        let r = IVec3::splat(radius);
        Self::new(-r, r)
    }

    pub fn min(&self) -> IVec3 {
        self.min
    }

    pub fn max(&self) -> IVec3 {
        self.max
    }

    /// Number of cells along each axis.
    pub fn size(&self) -> IVec3 {
        self.max - self.min + IVec3::ONE
    }

    /// Total number of cells covered.
    pub fn volume(&self) -> u64 {
        // Bounded by MAX_REGION_CELLS at construction.
        self.checked_volume().unwrap_or(u64::MAX)
    }

    fn checked_volume(&self) -> Option<u64> {
        let extent = |lo: i32, hi: i32| (i64::from(hi) - i64::from(lo) + 1) as u64;
        extent(self.min.x, self.max.x)
            .checked_mul(extent(self.min.y, self.max.y))?
            .checked_mul(extent(self.min.z, self.max.z))
    }

    /// Euclidean length of the size vector.
    pub fn diagonal_length(&self) -> f64 {
        let size = DVec3::new(
            f64::from(self.max.x) - f64::from(self.min.x) + 1.0,
            f64::from(self.max.y) - f64::from(self.min.y) + 1.0,
            f64::from(self.max.z) - f64::from(self.min.z) + 1.0,
        );
        size.length()
    }

    /// The same box translated so that its offsets are relative to `origin`.
    pub fn offset_by(&self, origin: IVec3) -> Self {
        Self {
            min: origin.saturating_add(self.min),
            max: origin.saturating_add(self.max),
        }
    }

    pub fn contains(&self, pos: IVec3) -> bool {
        pos.cmpge(self.min).all() && pos.cmple(self.max).all()
    }

    /// Iterate every cell, x outermost and z innermost.
    pub fn cells(&self) -> RegionCells {
        RegionCells {
            region: *self,
            next: Some(self.min),
        }
    }
}

impl TryFrom<RegionBounds> for Region {
    type Error = RegionError;

    fn try_from(bounds: RegionBounds) -> Result<Self, Self::Error> {
        Self::new(IVec3::from_array(bounds.min), IVec3::from_array(bounds.max))
    }
}

impl From<Region> for RegionBounds {
    fn from(region: Region) -> Self {
        Self {
            min: region.min.to_array(),
            max: region.max.to_array(),
        }
    }
}

/// Iterator over the cells of a [`Region`].
#[derive(Debug, Clone)]
pub struct RegionCells {
    region: Region,
    next: Option<IVec3>,
}

impl Iterator for RegionCells {
    type Item = IVec3;

    fn next(&mut self) -> Option<IVec3> {
        let current = self.next?;
        let Region { min, max } = self.region;

        self.next = if current.z < max.z {
            Some(IVec3::new(current.x, current.y, current.z + 1))
        } else if current.y < max.y {
            Some(IVec3::new(current.x, current.y + 1, min.z))
        } else if current.x < max.x {
            Some(IVec3::new(current.x + 1, min.y, min.z))
        } else {
            None
        };

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_region_rejected() {
        let err = Region::new(IVec3::new(0, 2, 0), IVec3::new(1, 1, 1)).unwrap_err();
        assert!(matches!(err, RegionError::Inverted { .. }));
    }

    #[test]
    fn test_oversized_region_rejected() {
        let err = Region::cube(100_000).unwrap_err();
        assert!(matches!(err, RegionError::TooLarge { .. }));
        let err = Region::new(IVec3::MIN, IVec3::MAX).unwrap_err();
        assert!(matches!(err, RegionError::TooLarge { .. }));
    }

    #[test]
    fn test_single_cell_region() {
        let region = Region::new(IVec3::ZERO, IVec3::ZERO).unwrap();
        assert_eq!(region.size(), IVec3::ONE);
        assert_eq!(region.volume(), 1);
        assert_eq!(region.cells().collect::<Vec<_>>(), vec![IVec3::ZERO]);
    }

    #[test]
    fn test_cells_cover_volume_inclusively() {
        let region = Region::new(IVec3::new(-1, -55, -1), IVec3::new(1, -5, 1)).unwrap();
        assert_eq!(region.size(), IVec3::new(3, 51, 3));
        let cells: Vec<IVec3> = region.cells().collect();
        assert_eq!(cells.len() as u64, region.volume());
        assert_eq!(cells.first(), Some(&IVec3::new(-1, -55, -1)));
        assert_eq!(cells.last(), Some(&IVec3::new(1, -5, 1)));
        assert!(cells.iter().all(|c| region.contains(*c)));
    }

    #[test]
    fn test_diagonal_length() {
        let region = Region::new(IVec3::new(-1, -55, -1), IVec3::new(1, -5, 1)).unwrap();
        let expected = (9.0_f64 + 2601.0 + 9.0).sqrt();
        assert!((region.diagonal_length() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_offset_by_translates_corners() {
        let region = Region::cube(2).unwrap();
        let moved = region.offset_by(IVec3::new(10, 64, -3));
        assert_eq!(moved.min(), IVec3::new(8, 62, -5));
        assert_eq!(moved.max(), IVec3::new(12, 66, -1));
        assert_eq!(moved.volume(), region.volume());
    }

    #[test]
    fn test_region_serde_validates() {
        let region: Region =
            serde_json::from_str(r#"{"min":[-3,-3,-3],"max":[3,3,3]}"#).unwrap();
        assert_eq!(region, Region::cube(3).unwrap());
        assert!(serde_json::from_str::<Region>(r#"{"min":[1,0,0],"max":[0,0,0]}"#).is_err());
    }
}
