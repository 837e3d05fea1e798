//! Periodic timer facility driven by the engine.
//!
//! The engine owns at most one handle at a time. A handle is consumed by
//! [`Scheduler::cancel`], so a task can never be cancelled twice; "no task"
//! is represented by the engine holding no handle at all.

mod manual;
mod thread;

use std::sync::Arc;
use std::time::Duration;

use prospector_core::binding::Signal;
use prospector_core::error::ScheduleError;

pub use manual::{ManualHandle, ManualScheduler};
pub use thread::{ThreadScheduler, ThreadTask};

/// Something that can fire a signal at a fixed period until cancelled.
pub trait Scheduler {
    type Handle;

    /// Start firing `signal` every `period`, with the first firing at once.
    fn schedule_periodic(
        &mut self,
        signal: Arc<dyn Signal>,
        period: Duration,
    ) -> Result<Self::Handle, ScheduleError>;

    /// Stop a task. No firing may start after this returns.
    fn cancel(&mut self, handle: Self::Handle) -> Result<(), ScheduleError>;
}
