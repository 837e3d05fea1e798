//! PROSPECTOR headless host.
//!
//! Wires the voxel world, the player entity and the detection engine
//! together and drives them from a fixed-rate game loop thread.

pub mod components;
pub mod game_loop;
pub mod logging;
pub mod session;
pub mod signal;
pub mod state;

pub use prospector_core as core;
