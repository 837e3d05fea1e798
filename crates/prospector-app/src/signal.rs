//! Feedback signal that logs a ping for its audio cue.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::info;

use prospector_core::binding::Signal;

/// Logs `"ping"` with the detector and cue each time it fires.
#[derive(Debug)]
pub struct CueSignal {
    detector: String,
    cue: String,
    pings: AtomicU64,
}

impl CueSignal {
    pub fn new(detector: impl Into<String>, cue: impl Into<String>) -> Self {
        Self {
            detector: detector.into(),
            cue: cue.into(),
            pings: AtomicU64::new(0),
        }
    }

    pub fn cue(&self) -> &str {
        &self.cue
    }

    /// Times fired so far.
    pub fn pings(&self) -> u64 {
        self.pings.load(Ordering::Relaxed)
    }
}

impl Signal for CueSignal {
    fn fire(&self) {
        let n = self.pings.fetch_add(1, Ordering::Relaxed) + 1;
        info!(detector = %self.detector, cue = %self.cue, n, "ping");
    }
}
