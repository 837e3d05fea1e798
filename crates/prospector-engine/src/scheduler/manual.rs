//! Deterministic scheduler driven by an explicit clock.
//!
//! Nothing fires until the host calls [`ManualScheduler::advance`]. Clones
//! share state, so a host (or a test) can keep one clone to drive time and
//! inspect call counts while the engine owns another.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use prospector_core::binding::Signal;
use prospector_core::error::ScheduleError;

use super::Scheduler;

/// Handle to a task on a [`ManualScheduler`].
#[derive(Debug, PartialEq, Eq)]
pub struct ManualHandle(u64);

struct ManualTask {
    id: u64,
    signal: Arc<dyn Signal>,
    period: Duration,
    next_fire: Duration,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_task: u64,
    schedule_calls: u64,
    cancel_calls: u64,
    fired: u64,
    tasks: Vec<ManualTask>,
}

/// Scheduler whose clock only moves when told to.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward, firing every signal that falls due, in order.
    ///
    /// Signals run on the calling thread after the internal lock is released.
    /// Returns the number of firings.
    pub fn advance(&self, dt: Duration) -> usize {
        let due = {
            let mut state = self.state.lock();
            let target = state.now + dt;
            let mut due: Vec<(Duration, u64, Arc<dyn Signal>)> = Vec::new();

            for task in &mut state.tasks {
                while task.next_fire <= target {
                    due.push((task.next_fire, task.id, Arc::clone(&task.signal)));
                    task.next_fire += task.period.max(Duration::from_millis(1));
                }
            }

            due.sort_by_key(|(at, id, _)| (*at, *id));
            state.now = target;
            state.fired += due.len() as u64;
            due
        };

        for (_, _, signal) in &due {
            signal.fire();
        }
        due.len()
    }

    /// Current clock reading.
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Number of `schedule_periodic` calls so far.
    pub fn schedule_calls(&self) -> u64 {
        self.state.lock().schedule_calls
    }

    /// Number of `cancel` calls so far.
    pub fn cancel_calls(&self) -> u64 {
        self.state.lock().cancel_calls
    }

    /// Total signal firings so far.
    pub fn fired(&self) -> u64 {
        self.state.lock().fired
    }

    /// Number of tasks currently scheduled.
    pub fn active_tasks(&self) -> usize {
        self.state.lock().tasks.len()
    }

    /// Periods of the tasks currently scheduled, in scheduling order.
    pub fn active_periods(&self) -> Vec<Duration> {
        self.state.lock().tasks.iter().map(|t| t.period).collect()
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule_periodic(
        &mut self,
        signal: Arc<dyn Signal>,
        period: Duration,
    ) -> Result<ManualHandle, ScheduleError> {
        let mut state = self.state.lock();
        let id = state.next_task;
        state.next_task += 1;
        state.schedule_calls += 1;
        let next_fire = state.now;
        state.tasks.push(ManualTask {
            id,
            signal,
            period,
            next_fire,
        });
        Ok(ManualHandle(id))
    }

    fn cancel(&mut self, handle: ManualHandle) -> Result<(), ScheduleError> {
        let mut state = self.state.lock();
        state.cancel_calls += 1;
        state.tasks.retain(|t| t.id != handle.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn test_first_firing_at_schedule_time() {
        let mut scheduler = ManualScheduler::new();
        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);
        scheduler
            .schedule_periodic(
                Arc::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
                Duration::from_millis(250),
            )
            .unwrap();

        assert_eq!(scheduler.advance(Duration::ZERO), 1);
        // 250, 500, 750, 1000
        assert_eq!(scheduler.advance(Duration::from_millis(1000)), 4);
        assert_eq!(count.load(Ordering::SeqCst), 5);
        assert_eq!(scheduler.fired(), 5);
    }

    #[test]
    fn test_cancel_stops_firing() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler
            .schedule_periodic(Arc::new(|| {}), Duration::from_millis(100))
            .unwrap();
        scheduler.advance(Duration::from_millis(250));
        assert_eq!(scheduler.fired(), 3);

        scheduler.cancel(handle).unwrap();
        assert_eq!(scheduler.active_tasks(), 0);
        assert_eq!(scheduler.advance(Duration::from_secs(1)), 0);
        assert_eq!(scheduler.cancel_calls(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let mut scheduler = ManualScheduler::new();
        let observer = scheduler.clone();
        scheduler
            .schedule_periodic(Arc::new(|| {}), Duration::from_millis(400))
            .unwrap();
        assert_eq!(observer.schedule_calls(), 1);
        assert_eq!(observer.active_periods(), vec![Duration::from_millis(400)]);
        observer.advance(Duration::from_millis(10));
        assert_eq!(scheduler.now(), Duration::from_millis(10));
    }
}
