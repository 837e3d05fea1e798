//! Timer-thread scheduler: one named thread per periodic task.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, Receiver, Sender};
use tracing::debug;

use prospector_core::binding::Signal;
use prospector_core::error::ScheduleError;

use super::Scheduler;

/// Shortest period a timer thread will honour.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Runs each periodic task on its own thread, at a fixed rate.
#[derive(Debug, Default)]
pub struct ThreadScheduler {
    next_task: u64,
}

/// Handle to a running timer thread.
///
/// Dropping the handle stops the thread without waiting for it;
/// [`Scheduler::cancel`] stops it and waits.
#[derive(Debug)]
pub struct ThreadTask {
    id: u64,
    stop: Sender<()>,
    thread: JoinHandle<()>,
}

impl ThreadTask {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl ThreadScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for ThreadScheduler {
    type Handle = ThreadTask;

    fn schedule_periodic(
        &mut self,
        signal: Arc<dyn Signal>,
        period: Duration,
    ) -> Result<ThreadTask, ScheduleError> {
        let id = self.next_task;
        self.next_task += 1;

        let period = period.max(MIN_PERIOD);
        let (stop, stop_rx) = crossbeam_channel::bounded::<()>(1);

        let thread = std::thread::Builder::new()
            .name(format!("prospector-signal-{id}"))
            .spawn(move || run_periodic(signal.as_ref(), period, &stop_rx))?;

        debug!(task = id, period_ms = period.as_millis() as u64, "Timer thread started");
        Ok(ThreadTask { id, stop, thread })
    }

    fn cancel(&mut self, handle: ThreadTask) -> Result<(), ScheduleError> {
        let ThreadTask { id, stop, thread } = handle;
        // Disconnecting the channel wakes the timer thread.
        drop(stop);

        if thread.thread().id() == std::thread::current().id() {
            return Ok(());
        }
        thread
            .join()
            .map_err(|_| ScheduleError::SignalPanicked { task: id })?;
        debug!(task = id, "Timer thread stopped");
        Ok(())
    }
}

/// Fire `signal` at a fixed rate until the stop channel fires or disconnects.
fn run_periodic(signal: &dyn Signal, period: Duration, stop: &Receiver<()>) {
    let mut next_fire = Instant::now();
    loop {
        signal.fire();

        next_fire += period;
        let now = Instant::now();
        if now > next_fire && now - next_fire > period * 2 {
            // Too far behind: skip the backlog instead of bursting.
            next_fire = now;
        }

        match stop.recv_deadline(next_fire) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn counting_signal() -> (Arc<AtomicU32>, Arc<dyn Signal>) {
        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);
        let signal: Arc<dyn Signal> = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (count, signal)
    }

    #[test]
    fn test_fires_immediately_then_periodically() {
        let mut scheduler = ThreadScheduler::new();
        let (count, signal) = counting_signal();

        let task = scheduler
            .schedule_periodic(signal, Duration::from_millis(20))
            .unwrap();
        std::thread::sleep(Duration::from_millis(110));
        scheduler.cancel(task).unwrap();

        let fired = count.load(Ordering::SeqCst);
        assert!(fired >= 2, "expected several firings, got {fired}");
    }

    #[test]
    fn test_no_firing_after_cancel() {
        let mut scheduler = ThreadScheduler::new();
        let (count, signal) = counting_signal();

        let task = scheduler
            .schedule_periodic(signal, Duration::from_millis(5))
            .unwrap();
        std::thread::sleep(Duration::from_millis(30));
        scheduler.cancel(task).unwrap();

        let at_cancel = count.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(count.load(Ordering::SeqCst), at_cancel);
    }

    #[test]
    fn test_task_ids_increase() {
        let mut scheduler = ThreadScheduler::new();
        let (_count, signal) = counting_signal();
        let a = scheduler
            .schedule_periodic(Arc::clone(&signal), Duration::from_millis(50))
            .unwrap();
        let b = scheduler
            .schedule_periodic(signal, Duration::from_millis(50))
            .unwrap();
        assert!(b.id() > a.id());
        scheduler.cancel(a).unwrap();
        scheduler.cancel(b).unwrap();
    }

    #[test]
    fn test_panicking_signal_reported_on_cancel() {
        let mut scheduler = ThreadScheduler::new();
        let signal: Arc<dyn Signal> = Arc::new(|| panic!("speaker unplugged"));
        let task = scheduler
            .schedule_periodic(signal, Duration::from_millis(10))
            .unwrap();
        std::thread::sleep(Duration::from_millis(20));
        let err = scheduler.cancel(task).unwrap_err();
        assert!(matches!(err, ScheduleError::SignalPanicked { task: 0 }));
    }
}
