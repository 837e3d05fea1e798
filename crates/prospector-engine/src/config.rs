//! Configuration loading and typed config structures.
//!
//! Detector bindings can be declared in JSON. Signals cannot be serialized,
//! so each [`DetectorSpec`] carries a cue name and the host supplies the
//! signal that plays it.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use prospector_core::binding::{Binding, Signal};
use prospector_core::constants::{DEFAULT_SCALE_COUNT, DEFAULT_SCAN_INTERVAL_SECS};
use prospector_core::region::Region;

use crate::error::ConfigError;

/// Engine cadence and detection-set policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds between scans.
    pub scan_interval_secs: f32,
    /// Keep detections from earlier scans instead of clearing the set
    /// at the start of each scan.
    pub accumulate_detections: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: DEFAULT_SCAN_INTERVAL_SECS,
            accumulate_detections: false,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let interval = self.scan_interval_secs;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(ConfigError::InvalidScanInterval(interval));
        }
        Ok(())
    }
}

/// One detector binding as declared in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorSpec {
    /// Item identity that activates the detector.
    pub id: String,
    /// Cell identities that count as detections.
    #[serde(default)]
    pub targets: Vec<String>,
    /// Scan region relative to the observer.
    pub region: Region,
    /// Optional region that must contain solid cells.
    #[serde(default)]
    pub gate: Option<Region>,
    /// Signal period at zero distance (ms).
    pub low_ms: u32,
    /// Signal period at the far end of the region (ms).
    pub high_ms: u32,
    #[serde(default = "default_scale_count")]
    pub scale_count: u32,
    /// Audio cue the signal should play.
    #[serde(default)]
    pub cue: Option<String>,
}

fn default_scale_count() -> u32 {
    DEFAULT_SCALE_COUNT
}

impl DetectorSpec {
    /// Build a validated binding using the given signal.
    pub fn into_binding(&self, signal: Arc<dyn Signal>) -> Result<Binding, ConfigError> {
        let mut builder = Binding::builder(self.id.clone(), self.region)
            .targets(self.targets.iter().cloned())
            .linear_period_bands(self.low_ms, self.high_ms, self.scale_count)
            .shared_signal(signal);
        if let Some(gate) = self.gate {
            builder = builder.gate(gate);
        }
        builder.build().map_err(|source| ConfigError::Binding {
            detector: self.id.clone(),
            source,
        })
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub detectors: Vec<DetectorSpec>,
}

impl DetectorConfig {
    /// Parse and validate configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Build every declared binding, asking `signal_for` for each signal.
    pub fn bindings<F>(&self, mut signal_for: F) -> Result<Vec<Binding>, ConfigError>
    where
        F: FnMut(&DetectorSpec) -> Arc<dyn Signal>,
    {
        self.detectors
            .iter()
            .map(|spec| spec.into_binding(signal_for(spec)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "engine": { "scan_interval_secs": 0.5 },
        "detectors": [
            {
                "id": "prospector:cave_detector",
                "targets": ["engine:air"],
                "region": { "min": [-1, -55, -1], "max": [1, -5, 1] },
                "gate": { "min": [-3, -3, -3], "max": [3, 3, 3] },
                "low_ms": 250,
                "high_ms": 1000,
                "cue": "prospector:scanner_beep"
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample_config() {
        let config = DetectorConfig::from_json_str(SAMPLE).unwrap();
        assert!((config.engine.scan_interval_secs - 0.5).abs() < f32::EPSILON);
        assert!(!config.engine.accumulate_detections);
        assert_eq!(config.detectors.len(), 1);
        let spec = &config.detectors[0];
        assert_eq!(spec.scale_count, DEFAULT_SCALE_COUNT);
        assert_eq!(spec.gate, Some(Region::cube(3).unwrap()));
    }

    #[test]
    fn test_bindings_built_from_specs() {
        let config = DetectorConfig::from_json_str(SAMPLE).unwrap();
        let mut cues = Vec::new();
        let bindings = config
            .bindings(|spec| {
                cues.push(spec.cue.clone());
                Arc::new(|| {})
            })
            .unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].detector_id(), "prospector:cave_detector");
        assert_eq!(bindings[0].period_ms(0), 250);
        assert!(bindings[0].gate_region().is_some());
        assert_eq!(cues, vec![Some("prospector:scanner_beep".to_string())]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = DetectorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DetectorConfig::default());
    }

    #[test]
    fn test_negative_scan_interval_rejected() {
        let err =
            DetectorConfig::from_json_str(r#"{"engine":{"scan_interval_secs":-1.0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScanInterval(_)));
    }

    #[test]
    fn test_inverted_region_rejected_at_parse() {
        let json = r#"{"detectors":[{"id":"x","region":{"min":[0,0,0],"max":[0,-1,0]},"low_ms":1,"high_ms":2}]}"#;
        assert!(matches!(
            DetectorConfig::from_json_str(json),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_invalid_period_reported_with_detector() {
        let json = r#"{"detectors":[{"id":"x","region":{"min":[0,0,0],"max":[0,0,0]},"low_ms":0,"high_ms":2}]}"#;
        let config = DetectorConfig::from_json_str(json).unwrap();
        let err = config.bindings(|_| Arc::new(|| {})).unwrap_err();
        assert!(matches!(err, ConfigError::Binding { ref detector, .. } if detector == "x"));
    }
}
