//! One play session: the ECS world, the voxel world and the engine.

use glam::DVec3;
use hecs::{Entity, World};
use tracing::debug;

use prospector_core::binding::Binding;
use prospector_core::events::ScanOutcome;
use prospector_core::state::EngineSnapshot;
use prospector_engine::config::EngineConfig;
use prospector_engine::engine::DetectionEngine;
use prospector_engine::error::EngineError;
use prospector_engine::scheduler::Scheduler;
use prospector_world::VoxelWorld;

use crate::components::{spawn_player, Inventory, PlayerObserver, Position, SelectedSlot};
use crate::state::{AppError, PlayerCommand};

/// Everything needed to start a session, built on the main thread.
pub struct SessionSetup {
    pub voxels: VoxelWorld,
    pub bindings: Vec<Binding>,
    pub config: EngineConfig,
    pub spawn: DVec3,
    pub inventory: Inventory,
}

pub struct Session<S: Scheduler> {
    world: World,
    player: Entity,
    voxels: VoxelWorld,
    engine: DetectionEngine<S>,
    ticks: u64,
}

impl<S: Scheduler> Session<S> {
    pub fn new(setup: SessionSetup, scheduler: S) -> Result<Self, AppError> {
        let mut engine = DetectionEngine::new(scheduler, setup.config)?;
        for binding in setup.bindings {
            engine.add_binding(binding);
        }
        let mut world = World::new();
        let player = spawn_player(&mut world, setup.spawn, setup.inventory);
        Ok(Self {
            world,
            player,
            voxels: setup.voxels,
            engine,
            ticks: 0,
        })
    }

    pub fn apply(&mut self, command: PlayerCommand) {
        debug!(?command, "Player command");
        match command {
            PlayerCommand::Move(offset) => {
                if let Ok(mut pos) = self.world.get::<&mut Position>(self.player) {
                    pos.0 += offset;
                }
            }
            PlayerCommand::Teleport(target) => {
                if let Ok(mut pos) = self.world.get::<&mut Position>(self.player) {
                    pos.0 = target;
                }
            }
            PlayerCommand::Select(slot) => {
                if let Ok(mut selected) = self.world.get::<&mut SelectedSlot>(self.player) {
                    selected.0 = slot;
                }
            }
        }
    }

    /// Advance the engine clock by `delta_secs`.
    pub fn tick(&mut self, delta_secs: f32) -> Result<Option<ScanOutcome>, EngineError> {
        self.ticks += 1;
        let observer = PlayerObserver {
            world: &self.world,
            entity: self.player,
        };
        self.engine.on_tick(delta_secs, &observer, &self.voxels)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn player_position(&self) -> Option<DVec3> {
        self.world.get::<&Position>(self.player).ok().map(|p| p.0)
    }

    pub fn engine(&self) -> &DetectionEngine<S> {
        &self.engine
    }

    pub fn voxels(&self) -> &VoxelWorld {
        &self.voxels
    }

    pub fn voxels_mut(&mut self) -> &mut VoxelWorld {
        &mut self.voxels
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.engine.snapshot()
    }

    pub fn shutdown(&mut self) -> Result<(), EngineError> {
        self.engine.shutdown()
    }
}
