//! Detection engine: fixed-cadence scans and debounced signal scheduling.
//!
//! `DetectionEngine` owns the binding registry, the detection set and the
//! single scheduled signal. The host calls [`DetectionEngine::on_tick`] from
//! its update loop and passes in the observer and world to scan; the engine
//! keeps no reference to either between ticks.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use glam::IVec3;
use tracing::{debug, info, warn};

use prospector_core::binding::{Binding, Signal};
use prospector_core::error::ScheduleError;
use prospector_core::events::ScanOutcome;
use prospector_core::state::EngineSnapshot;

use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::registry::BindingRegistry;
use crate::scheduler::Scheduler;
use crate::source::{ObserverSource, SpatialSampler};
use crate::systems;

/// The signal currently installed on the scheduler.
struct ActiveTask<H> {
    handle: H,
    detector: String,
    period_ms: u32,
    signal: Arc<dyn Signal>,
}

/// The detection engine. Generic over the timer facility it drives.
pub struct DetectionEngine<S: Scheduler> {
    registry: BindingRegistry,
    scheduler: S,
    config: EngineConfig,
    time_accumulator: f32,
    active_task: Option<ActiveTask<S::Handle>>,
    detected: HashSet<IVec3>,
    last_outcome: Option<ScanOutcome>,
    scan_count: u64,
}

impl<S: Scheduler> DetectionEngine<S> {
    /// Create an engine with the given scheduler and configuration.
    pub fn new(scheduler: S, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(scheduler, config))
    }

    /// Create an engine with the default one-second scan cadence.
    pub fn with_scheduler(scheduler: S) -> Self {
        Self::from_parts(scheduler, EngineConfig::default())
    }

    fn from_parts(scheduler: S, config: EngineConfig) -> Self {
        Self {
            registry: BindingRegistry::new(),
            scheduler,
            config,
            time_accumulator: 0.0,
            active_task: None,
            detected: HashSet::new(),
            last_outcome: None,
            scan_count: 0,
        }
    }

    /// Register a binding, replacing any with the same detector id.
    pub fn add_binding(&mut self, binding: Binding) -> Option<Binding> {
        self.registry.add(binding)
    }

    /// Unregister a binding. A running signal is left alone until the next
    /// scan finds no binding for the held detector.
    pub fn remove_binding(&mut self, detector_id: &str) -> Option<Binding> {
        self.registry.remove(detector_id)
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Seconds accumulated towards the next scan.
    pub fn time_accumulator(&self) -> f32 {
        self.time_accumulator
    }

    /// Cells recorded by the most recent scan(s).
    pub fn detected(&self) -> &HashSet<IVec3> {
        &self.detected
    }

    /// Period of the installed signal, if any.
    pub fn active_period_ms(&self) -> Option<u32> {
        self.active_task.as_ref().map(|t| t.period_ms)
    }

    /// Detector whose signal is installed, if any.
    pub fn active_detector(&self) -> Option<&str> {
        self.active_task.as_ref().map(|t| t.detector.as_str())
    }

    pub fn last_outcome(&self) -> Option<&ScanOutcome> {
        self.last_outcome.as_ref()
    }

    /// Advance the scan clock by `delta_secs`, scanning when an interval
    /// has elapsed. The remainder carries over so the cadence does not drift.
    ///
    /// At most one scan runs per call. If the scan fails the accumulator is
    /// kept, so the next tick retries.
    pub fn on_tick<O, W>(
        &mut self,
        delta_secs: f32,
        observer: &O,
        sampler: &W,
    ) -> Result<Option<ScanOutcome>, EngineError>
    where
        O: ObserverSource + ?Sized,
        W: SpatialSampler + ?Sized,
    {
        if !delta_secs.is_finite() || delta_secs < 0.0 {
            warn!(delta_secs, "Ignoring invalid tick delta");
            return Ok(None);
        }

        self.time_accumulator += delta_secs;
        if self.time_accumulator < self.config.scan_interval_secs {
            return Ok(None);
        }

        let outcome = self.scan(observer, sampler)?;
        self.time_accumulator -= self.config.scan_interval_secs;
        Ok(Some(outcome))
    }

    /// Run one detection pass immediately.
    pub fn scan<O, W>(&mut self, observer: &O, sampler: &W) -> Result<ScanOutcome, EngineError>
    where
        O: ObserverSource + ?Sized,
        W: SpatialSampler + ?Sized,
    {
        self.scan_count += 1;
        let outcome = self.run_scan(observer, sampler)?;
        debug!(scan = self.scan_count, ?outcome, "Scan complete");
        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    fn run_scan<O, W>(&mut self, observer: &O, sampler: &W) -> Result<ScanOutcome, EngineError>
    where
        O: ObserverSource + ?Sized,
        W: SpatialSampler + ?Sized,
    {
        if !self.config.accumulate_detections {
            self.detected.clear();
        }

        // 1. Resolve observer and held detector
        let Some(position) = observer.observer_position() else {
            return self.idle(ScanOutcome::NoObserver);
        };
        let Some(detector) = observer.active_detector() else {
            return self.idle(ScanOutcome::NoDetector);
        };

        // 2. Binding lookup
        let Some(binding) = self.registry.get(&detector) else {
            return self.idle(ScanOutcome::NoBinding { detector });
        };

        let origin = position.floor().as_ivec3();

        // 3. Gate
        if let Some(gate) = binding.gate_region() {
            if !systems::gate::is_open(sampler, gate, origin)? {
                return self.idle(ScanOutcome::Gated { detector });
            }
        }

        // 4. Region scan
        systems::scan::collect_targets(sampler, binding, origin, &mut self.detected)?;

        // 5. Nearest detection
        let Some(min_distance) = systems::scan::nearest_distance(origin, &self.detected) else {
            return self.idle(ScanOutcome::NothingDetected { detector });
        };

        // 6. Period and debounce
        let period_ms = binding.period_ms(min_distance).max(1);
        let signal = binding.signal();
        let detections = self.detected.len();

        let unchanged = self
            .active_task
            .as_ref()
            .is_some_and(|t| {
                t.period_ms == period_ms
                    && t.detector == detector
                    && Arc::ptr_eq(&t.signal, &signal)
            });
        if unchanged {
            return Ok(ScanOutcome::Unchanged {
                detector,
                period_ms,
                min_distance,
                detections,
            });
        }

        info!(
            detector = %detector,
            period_ms,
            min_distance,
            "Rescheduling detector signal"
        );
        Self::cancel_active(&mut self.scheduler, &mut self.active_task)?;
        let handle = self
            .scheduler
            .schedule_periodic(Arc::clone(&signal), Duration::from_millis(u64::from(period_ms)))?;
        self.active_task = Some(ActiveTask {
            handle,
            detector: detector.clone(),
            period_ms,
            signal,
        });

        Ok(ScanOutcome::Rescheduled {
            detector,
            period_ms,
            min_distance,
            detections,
        })
    }

    /// Cancel any installed signal and report `outcome`.
    fn idle(&mut self, outcome: ScanOutcome) -> Result<ScanOutcome, EngineError> {
        Self::cancel_active(&mut self.scheduler, &mut self.active_task)?;
        Ok(outcome)
    }

    fn cancel_active(
        scheduler: &mut S,
        active: &mut Option<ActiveTask<S::Handle>>,
    ) -> Result<(), ScheduleError> {
        if let Some(task) = active.take() {
            debug!(detector = %task.detector, period_ms = task.period_ms, "Cancelling detector signal");
            scheduler.cancel(task.handle)?;
        }
        Ok(())
    }

    /// Serializable view of the engine.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            scan_count: self.scan_count,
            time_accumulator: self.time_accumulator,
            active_detector: self.active_detector().map(str::to_owned),
            active_period_ms: self.active_period_ms(),
            detections: self.detected.len(),
            last_outcome: self.last_outcome.clone(),
            detectors: self.registry.ids(),
        }
    }

    /// Cancel the installed signal, then drop all bindings and detections.
    ///
    /// No signal fires after this returns (for schedulers that honour the
    /// cancel contract). The engine may be reused afterwards.
    pub fn shutdown(&mut self) -> Result<(), EngineError> {
        info!(detectors = self.registry.len(), "Shutting down detection engine");
        let cancelled = Self::cancel_active(&mut self.scheduler, &mut self.active_task);
        self.registry.clear();
        self.detected.clear();
        self.time_accumulator = 0.0;
        self.last_outcome = None;
        cancelled.map_err(EngineError::from)
    }
}

impl<S: Scheduler> Drop for DetectionEngine<S> {
    fn drop(&mut self) {
        if let Err(err) = Self::cancel_active(&mut self.scheduler, &mut self.active_task) {
            warn!(%err, "Failed to cancel detector signal on drop");
        }
    }
}
