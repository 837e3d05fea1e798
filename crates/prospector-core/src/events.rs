//! Outcomes reported by each detection scan.

use serde::{Deserialize, Serialize};

/// What a single scan concluded and did to the scheduled signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScanOutcome {
    /// No observer is present.
    NoObserver,
    /// The observer holds nothing that identifies a detector.
    NoDetector,
    /// The held item has no registered binding.
    NoBinding { detector: String },
    /// The gate region held only empty or unloaded cells.
    Gated { detector: String },
    /// No target cell lies within the scan region.
    NothingDetected { detector: String },
    /// The period changed and the signal was (re)installed.
    Rescheduled {
        detector: String,
        period_ms: u32,
        min_distance: u32,
        detections: usize,
    },
    /// The period matched the running signal; the scheduler was not touched.
    Unchanged {
        detector: String,
        period_ms: u32,
        min_distance: u32,
        detections: usize,
    },
}

impl ScanOutcome {
    /// Whether this outcome leaves a signal running.
    pub fn is_signalling(&self) -> bool {
        matches!(self, Self::Rescheduled { .. } | Self::Unchanged { .. })
    }

    /// Detector involved in the scan, if one was resolved.
    pub fn detector(&self) -> Option<&str> {
        match self {
            Self::NoObserver | Self::NoDetector => None,
            Self::NoBinding { detector }
            | Self::Gated { detector }
            | Self::NothingDetected { detector }
            | Self::Rescheduled { detector, .. }
            | Self::Unchanged { detector, .. } => Some(detector),
        }
    }

    /// Distance to the nearest detection, when anything was detected.
    pub fn min_distance(&self) -> Option<u32> {
        match self {
            Self::Rescheduled { min_distance, .. } | Self::Unchanged { min_distance, .. } => {
                Some(*min_distance)
            }
            _ => None,
        }
    }
}
