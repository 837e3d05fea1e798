//! Error types shared across the PROSPECTOR crates.
//!
//! Missing data (no detector held, no binding, nothing in range) is never an
//! error; these types cover contract violations and collaborator failures.

use glam::IVec3;

/// Errors raised when constructing a [`crate::region::Region`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegionError {
    /// `min` exceeds `max` on at least one axis.
    #[error("region min {min} exceeds max {max}")]
    Inverted {
        /// Requested minimum corner.
        min: IVec3,
        /// Requested maximum corner.
        max: IVec3,
    },

    /// The region covers more cells than a single scan may visit.
    #[error("region covers {cells} cells, limit is {limit}")]
    TooLarge {
        /// Number of cells in the requested region.
        cells: u64,
        /// Configured limit.
        limit: u64,
    },
}

/// Errors raised when building a [`crate::binding::Binding`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("detector id must not be empty")]
    EmptyDetectorId,

    #[error("binding {detector} has no period function")]
    MissingPeriodFn { detector: String },

    #[error("binding {detector} has no signal")]
    MissingSignal { detector: String },

    /// Period bounds must be positive and the scale count at least one.
    #[error("invalid period parameters: low={low} high={high} scale_count={scale_count}")]
    InvalidPeriod { low: u32, high: u32, scale_count: u32 },

    #[error(transparent)]
    Region(#[from] RegionError),
}

/// Failure reported by a spatial sampler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    #[error("cell {pos} unavailable: {reason}")]
    Unavailable { pos: IVec3, reason: String },
}

/// Failure reported by a scheduler.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The timer thread for a task could not be started.
    #[error("failed to spawn signal thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// A signal panicked while the task was running.
    #[error("signal task {task} panicked")]
    SignalPanicked { task: u64 },
}
