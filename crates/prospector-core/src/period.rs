//! Distance-to-period mapping for detector feedback.
//!
//! A period function turns the distance to the nearest detected cell into
//! the repetition period of the feedback signal. Coarse, banded functions
//! keep the period stable across scans so the scheduler is rarely touched.

use crate::constants::DEFAULT_SCALE_COUNT;
use crate::error::BindingError;
use crate::region::Region;

/// Pure mapping from nearest-target distance (cells) to signal period (ms).
pub trait PeriodFn: Send + Sync {
    /// Period in milliseconds. Must be positive.
    fn period_ms(&self, min_distance: u32) -> u32;
}

impl<F> PeriodFn for F
where
    F: Fn(u32) -> u32 + Send + Sync,
{
    fn period_ms(&self, min_distance: u32) -> u32 {
        self(min_distance)
    }
}

/// Linear interpolation between `low` and `high` over `scale_count` bands.
///
/// `scale = clamp(floor(N * d / L), 0, N)` where `L` is the region diagonal,
/// then `period = low + (high - low) * scale / N`. This yields `N + 1`
/// distinct periods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearPeriodFn {
    diagonal: f64,
    low: u32,
    high: u32,
    scale_count: u32,
}

impl LinearPeriodFn {
    /// Period function spanning the diagonal of `region`.
    pub fn for_region(region: &Region, low: u32, high: u32) -> Result<Self, BindingError> {
        Self::with_scale_count(region, low, high, DEFAULT_SCALE_COUNT)
    }

    pub fn with_scale_count(
        region: &Region,
        low: u32,
        high: u32,
        scale_count: u32,
    ) -> Result<Self, BindingError> {
        if low == 0 || high == 0 || scale_count == 0 {
            return Err(BindingError::InvalidPeriod {
                low,
                high,
                scale_count,
            });
        }
        Ok(Self {
            diagonal: region.diagonal_length(),
            low,
            high,
            scale_count,
        })
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    pub fn scale_count(&self) -> u32 {
        self.scale_count
    }

    /// Distance band in `0..=scale_count`.
    pub fn scale(&self, min_distance: u32) -> u32 {
        let n = f64::from(self.scale_count);
        let raw = (n * f64::from(min_distance) / self.diagonal).floor();
        raw.clamp(0.0, n) as u32
    }
}

impl PeriodFn for LinearPeriodFn {
    fn period_ms(&self, min_distance: u32) -> u32 {
        let low = i64::from(self.low);
        let high = i64::from(self.high);
        let scale = i64::from(self.scale(min_distance));
        let period = low + (high - low) * scale / i64::from(self.scale_count);
        // Lies between low and high, both positive u32.
        period as u32
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec3;

    use super::*;

    fn cave_region() -> Region {
        Region::new(IVec3::new(-1, -55, -1), IVec3::new(1, -5, 1)).unwrap()
    }

    #[test]
    fn test_zero_distance_is_low() {
        let f = LinearPeriodFn::for_region(&cave_region(), 250, 1000).unwrap();
        assert_eq!(f.period_ms(0), 250);
    }

    #[test]
    fn test_beyond_diagonal_is_high() {
        let region = cave_region();
        let f = LinearPeriodFn::for_region(&region, 250, 1000).unwrap();
        let diagonal = region.diagonal_length().ceil() as u32;
        for d in [diagonal, diagonal + 1, diagonal * 3, u32::MAX] {
            assert_eq!(f.period_ms(d), 1000, "distance {d}");
        }
    }

    #[test]
    fn test_monotonic_non_decreasing() {
        let f = LinearPeriodFn::for_region(&Region::cube(32).unwrap(), 200, 2000).unwrap();
        let mut previous = 0;
        for d in 0..200 {
            let p = f.period_ms(d);
            assert!(p >= previous, "period dropped at distance {d}: {p} < {previous}");
            previous = p;
        }
    }

    #[test]
    fn test_produces_scale_count_plus_one_bands() {
        let f = LinearPeriodFn::for_region(&cave_region(), 250, 1000).unwrap();
        let mut periods: Vec<u32> = (0..200).map(|d| f.period_ms(d)).collect();
        periods.dedup();
        assert_eq!(periods, vec![250, 437, 625, 812, 1000]);
    }

    #[test]
    fn test_inverted_bounds_decrease() {
        let f = LinearPeriodFn::for_region(&cave_region(), 1000, 250).unwrap();
        assert_eq!(f.period_ms(0), 1000);
        assert_eq!(f.period_ms(10_000), 250);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let region = cave_region();
        assert!(LinearPeriodFn::for_region(&region, 0, 1000).is_err());
        assert!(LinearPeriodFn::for_region(&region, 250, 0).is_err());
        assert!(LinearPeriodFn::with_scale_count(&region, 250, 1000, 0).is_err());
    }

    #[test]
    fn test_closure_period_fn() {
        let f = |d: u32| 100 + d * 10;
        assert_eq!(PeriodFn::period_ms(&f, 3), 130);
    }
}
