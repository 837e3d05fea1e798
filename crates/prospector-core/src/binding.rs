//! Detector bindings: which cells a held detector reacts to, where it looks,
//! and how its feedback signal behaves.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::BindingError;
use crate::period::{LinearPeriodFn, PeriodFn};
use crate::region::Region;

/// Side-effecting feedback fired by the scheduler (e.g. playing a sound).
///
/// Signals may run on a timer thread while a scan is in progress, so they
/// must not reach into engine state.
pub trait Signal: Send + Sync {
    fn fire(&self);
}

impl<F> Signal for F
where
    F: Fn() + Send + Sync,
{
    fn fire(&self) {
        self()
    }
}

/// Association between a detector identity and the cells it detects.
#[derive(Clone)]
pub struct Binding {
    detector_id: String,
    target_ids: HashSet<String>,
    region: Region,
    gate_region: Option<Region>,
    period_fn: Arc<dyn PeriodFn>,
    signal: Arc<dyn Signal>,
}

impl Binding {
    /// Start building a binding that scans `region` around the observer.
    pub fn builder(detector_id: impl Into<String>, region: Region) -> BindingBuilder {
        BindingBuilder {
            detector_id: detector_id.into(),
            target_ids: HashSet::new(),
            region,
            gate_region: None,
            period: None,
            signal: None,
        }
    }

    pub fn detector_id(&self) -> &str {
        &self.detector_id
    }

    pub fn target_ids(&self) -> &HashSet<String> {
        &self.target_ids
    }

    pub fn is_target(&self, cell_id: &str) -> bool {
        self.target_ids.contains(cell_id)
    }

    /// Scan region, relative to the observer.
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Region that must contain at least one solid cell before scanning.
    pub fn gate_region(&self) -> Option<&Region> {
        self.gate_region.as_ref()
    }

    pub fn set_gate_region(&mut self, gate: Option<Region>) {
        self.gate_region = gate;
    }

    pub fn period_ms(&self, min_distance: u32) -> u32 {
        self.period_fn.period_ms(min_distance)
    }

    /// Shared handle to the signal, for installation on a scheduler.
    pub fn signal(&self) -> Arc<dyn Signal> {
        Arc::clone(&self.signal)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut targets: Vec<&String> = self.target_ids.iter().collect();
        targets.sort();
        f.debug_struct("Binding")
            .field("detector_id", &self.detector_id)
            .field("target_ids", &targets)
            .field("region", &self.region)
            .field("gate_region", &self.gate_region)
            .finish_non_exhaustive()
    }
}

enum PeriodSpec {
    Custom(Arc<dyn PeriodFn>),
    Linear { low: u32, high: u32, scale_count: Option<u32> },
}

/// Builder for [`Binding`]. Validation happens in [`BindingBuilder::build`].
pub struct BindingBuilder {
    detector_id: String,
    target_ids: HashSet<String>,
    region: Region,
    gate_region: Option<Region>,
    period: Option<PeriodSpec>,
    signal: Option<Arc<dyn Signal>>,
}

impl BindingBuilder {
    pub fn target(mut self, cell_id: impl Into<String>) -> Self {
        self.target_ids.insert(cell_id.into());
        self
    }

    pub fn targets<I, S>(mut self, cell_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_ids.extend(cell_ids.into_iter().map(Into::into));
        self
    }

    pub fn gate(mut self, gate: Region) -> Self {
        self.gate_region = Some(gate);
        self
    }

    pub fn period_fn(mut self, period_fn: impl PeriodFn + 'static) -> Self {
        self.period = Some(PeriodSpec::Custom(Arc::new(period_fn)));
        self
    }

    /// Use a [`LinearPeriodFn`] over the scan region's diagonal.
    pub fn linear_period(mut self, low: u32, high: u32) -> Self {
        self.period = Some(PeriodSpec::Linear {
            low,
            high,
            scale_count: None,
        });
        self
    }

    pub fn linear_period_bands(mut self, low: u32, high: u32, scale_count: u32) -> Self {
        self.period = Some(PeriodSpec::Linear {
            low,
            high,
            scale_count: Some(scale_count),
        });
        self
    }

    pub fn signal(mut self, signal: impl Signal + 'static) -> Self {
        self.signal = Some(Arc::new(signal));
        self
    }

    pub fn shared_signal(mut self, signal: Arc<dyn Signal>) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn build(self) -> Result<Binding, BindingError> {
        if self.detector_id.trim().is_empty() {
            return Err(BindingError::EmptyDetectorId);
        }

        let period_fn: Arc<dyn PeriodFn> = match self.period {
            Some(PeriodSpec::Custom(f)) => f,
            Some(PeriodSpec::Linear {
                low,
                high,
                scale_count,
            }) => {
                let linear = match scale_count {
                    Some(n) => LinearPeriodFn::with_scale_count(&self.region, low, high, n)?,
                    None => LinearPeriodFn::for_region(&self.region, low, high)?,
                };
                Arc::new(linear)
            }
            None => {
                return Err(BindingError::MissingPeriodFn {
                    detector: self.detector_id,
                })
            }
        };

        let Some(signal) = self.signal else {
            return Err(BindingError::MissingSignal {
                detector: self.detector_id,
            });
        };

        Ok(Binding {
            detector_id: self.detector_id,
            target_ids: self.target_ids,
            region: self.region,
            gate_region: self.gate_region,
            period_fn,
            signal,
        })
    }
}
