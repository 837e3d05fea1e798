//! Serializable view of the detection engine, for hosts and tooling.

use serde::{Deserialize, Serialize};

use crate::events::ScanOutcome;

/// Point-in-time snapshot of engine state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Number of scans run since start.
    pub scan_count: u64,
    /// Seconds accumulated towards the next scan.
    pub time_accumulator: f32,
    /// Detector whose signal is currently scheduled.
    pub active_detector: Option<String>,
    /// Period of the scheduled signal (ms).
    pub active_period_ms: Option<u32>,
    /// Cells recorded by the most recent scan.
    pub detections: usize,
    /// Outcome of the most recent scan.
    pub last_outcome: Option<ScanOutcome>,
    /// Registered detector identities, sorted.
    pub detectors: Vec<String>,
}
