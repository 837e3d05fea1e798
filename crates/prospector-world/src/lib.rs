//! Reference world for PROSPECTOR.
//!
//! A chunked, in-memory voxel store that implements the engine's
//! `SpatialSampler`, plus a seeded cave generator for demos and tests.

pub use prospector_core as core;

pub mod cavegen;
pub mod voxel;

pub use cavegen::{CaveGenConfig, CaveGenerator, STONE_CELL_ID};
pub use voxel::{VoxelWorld, CHUNK_SIZE};
