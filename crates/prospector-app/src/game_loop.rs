//! Game loop thread: ticks the session at a fixed rate.
//!
//! The session is created inside this thread so the engine and its
//! scheduler never cross threads. Commands arrive via `mpsc`; every tick's
//! snapshot is handed to a callback.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use prospector_core::state::EngineSnapshot;
use prospector_engine::scheduler::ThreadScheduler;

use crate::session::{Session, SessionSetup};
use crate::state::{AppError, GameLoopCommand};

/// Default ticks per second.
pub const DEFAULT_TICK_RATE: u32 = 20;

#[derive(Debug, Clone, Copy)]
pub struct LoopOptions {
    pub tick_rate: u32,
    /// Stop after this many ticks. `None` runs until shutdown.
    pub max_ticks: Option<u64>,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            max_ticks: None,
        }
    }
}

impl LoopOptions {
    pub fn tick_duration(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.tick_rate.max(1)))
    }
}

/// Spawns the game loop in a new thread.
///
/// The handle yields the number of ticks run once the loop exits.
pub fn spawn_game_loop<F>(
    setup: SessionSetup,
    options: LoopOptions,
    on_snapshot: F,
) -> Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<Result<u64, AppError>>), AppError>
where
    F: FnMut(&EngineSnapshot) + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("prospector-game-loop".into())
        .spawn(move || run_game_loop(setup, options, cmd_rx, on_snapshot))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown, channel disconnect or `max_ticks`.
fn run_game_loop<F>(
    setup: SessionSetup,
    options: LoopOptions,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    mut on_snapshot: F,
) -> Result<u64, AppError>
where
    F: FnMut(&EngineSnapshot),
{
    let mut session = Session::new(setup, ThreadScheduler::new())?;
    let tick_duration = options.tick_duration();
    let delta_secs = tick_duration.as_secs_f32();
    let mut next_tick_time = Instant::now();
    info!(tick_rate = options.tick_rate, "Game loop started");

    'run: loop {
        if options.max_ticks.is_some_and(|max| session.ticks() >= max) {
            break;
        }

        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Player(cmd)) => session.apply(cmd),
                Ok(GameLoopCommand::Shutdown) => break 'run,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break 'run,
            }
        }

        // 2. Advance one tick. A failed scan is retried next tick.
        if let Err(err) = session.tick(delta_secs) {
            warn!(%err, "Scan failed");
        }

        // 3. Publish
        on_snapshot(&session.snapshot());

        // 4. Sleep until next tick
        next_tick_time += tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > tick_duration * 2 {
            // Too far behind, reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }

    let ticks = session.ticks();
    session.shutdown()?;
    info!(ticks, "Game loop stopped");
    Ok(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use glam::DVec3;
    use prospector_engine::config::EngineConfig;
    use prospector_world::VoxelWorld;

    use crate::components::Inventory;
    use crate::state::PlayerCommand;

    fn empty_setup() -> SessionSetup {
        SessionSetup {
            voxels: VoxelWorld::new(),
            bindings: Vec::new(),
            config: EngineConfig::default(),
            spawn: DVec3::ZERO,
            inventory: Inventory::default(),
        }
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::Player(PlayerCommand::Select(2))).unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<_> = rx.try_iter().collect();
        assert_eq!(commands.len(), 2);
        assert!(matches!(
            commands[0],
            GameLoopCommand::Player(PlayerCommand::Select(2))
        ));
        assert!(matches!(commands[1], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_loop_stops_after_max_ticks() {
        let snapshots = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&snapshots);
        let options = LoopOptions {
            tick_rate: 200,
            max_ticks: Some(5),
        };
        let (_tx, handle) = spawn_game_loop(empty_setup(), options, move |snap| {
            sink.lock().unwrap().push(snap.clone());
        })
        .unwrap();

        assert_eq!(handle.join().unwrap().unwrap(), 5);
        assert_eq!(snapshots.lock().unwrap().len(), 5);
    }

    #[test]
    fn test_loop_stops_on_shutdown() {
        let options = LoopOptions {
            tick_rate: 200,
            max_ticks: None,
        };
        let (tx, handle) = spawn_game_loop(empty_setup(), options, |_| {}).unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();
        assert!(handle.join().unwrap().is_ok());
    }

    #[test]
    fn test_loop_stops_on_disconnect() {
        let options = LoopOptions {
            tick_rate: 200,
            max_ticks: None,
        };
        let (tx, handle) = spawn_game_loop(empty_setup(), options, |_| {}).unwrap();
        drop(tx);
        assert!(handle.join().unwrap().is_ok());
    }

    #[test]
    fn test_tick_duration() {
        let options = LoopOptions::default();
        assert_eq!(options.tick_duration(), Duration::from_millis(50));
        let zero = LoopOptions {
            tick_rate: 0,
            max_ticks: None,
        };
        assert_eq!(zero.tick_duration(), Duration::from_secs(1));
    }
}
