//! Detection engine for PROSPECTOR.
//!
//! Owns the binding registry and the single scheduled feedback signal,
//! scans the region around the observer at a fixed cadence, and retunes the
//! signal period as the nearest target moves closer or further away.
//! Headless: the world, the observer and the timer facility are supplied by
//! the host through traits.

pub mod config;
pub mod engine;
pub mod error;
pub mod presets;
pub mod registry;
pub mod scheduler;
pub mod source;
pub mod systems;

pub use prospector_core as core;

pub use config::{DetectorConfig, DetectorSpec, EngineConfig};
pub use engine::DetectionEngine;
pub use error::{ConfigError, EngineError};
pub use registry::BindingRegistry;
pub use scheduler::{ManualScheduler, Scheduler, ThreadScheduler};
pub use source::{ObserverSource, SpatialSampler};
