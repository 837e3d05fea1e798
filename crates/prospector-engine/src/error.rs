//! Error types for the `prospector-engine` crate.

use prospector_core::error::{BindingError, SampleError, ScheduleError};

/// Failures surfaced by [`crate::engine::DetectionEngine`] scans.
///
/// The engine never retries; the caller decides whether to skip the tick.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("sampler failed: {0}")]
    Sample(#[from] SampleError),

    #[error("scheduler failed: {0}")]
    Schedule(#[from] ScheduleError),
}

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scan interval must be a positive number of seconds, got {0}")]
    InvalidScanInterval(f32),

    #[error("invalid detector {detector}: {source}")]
    Binding {
        detector: String,
        #[source]
        source: BindingError,
    },
}
