//! Core types and definitions for the PROSPECTOR detection engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! regions, bindings, period functions, signals, scan outcomes,
//! snapshots, errors, and constants.
//! It has no dependency on any scheduler, world, or host runtime.

pub mod binding;
pub mod constants;
pub mod error;
pub mod events;
pub mod period;
pub mod region;
pub mod state;

pub use binding::{Binding, BindingBuilder, Signal};
pub use error::{BindingError, RegionError, SampleError, ScheduleError};
pub use events::ScanOutcome;
pub use period::{LinearPeriodFn, PeriodFn};
pub use region::Region;
pub use state::EngineSnapshot;
