//! Seeded cave generation.
//!
//! Fills loaded chunks with stone up to a surface height, carves air
//! tunnels by walking spheres through the stone, then scatters ore cells
//! into what stone remains. The same seed always yields the same world.

use glam::{IVec3, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use prospector_core::constants::{EMPTY_CELL_ID, ORE_CELL_ID};

use crate::voxel::{VoxelWorld, CHUNK_SIZE};

pub const STONE_CELL_ID: &str = "engine:stone";

/// Generator parameters. All sizes are in cells unless noted.
#[derive(Debug, Clone)]
pub struct CaveGenConfig {
    pub seed: u64,
    /// Horizontal half-extent of the generated area, in chunks.
    pub chunk_radius: i32,
    /// Number of chunk layers below the surface chunk.
    pub depth_chunks: i32,
    /// Topmost stone layer. Everything above is air.
    pub surface_y: i32,
    pub tunnel_count: u32,
    /// Steps per tunnel walk.
    pub tunnel_length: u32,
    pub tunnel_radius: f32,
    pub ore_count: u32,
}

impl Default for CaveGenConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            chunk_radius: 2,
            depth_chunks: 4,
            surface_y: -1,
            tunnel_count: 12,
            tunnel_length: 48,
            tunnel_radius: 1.8,
            ore_count: 64,
        }
    }
}

/// Builds a `VoxelWorld` from a `CaveGenConfig`.
#[derive(Debug, Clone)]
pub struct CaveGenerator {
    config: CaveGenConfig,
}

impl CaveGenerator {
    pub fn new(config: CaveGenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CaveGenConfig {
        &self.config
    }

    /// Inclusive cell bounds covered by the generated chunks.
    pub fn bounds(&self) -> (IVec3, IVec3) {
        let c = &self.config;
        let surface_chunk = VoxelWorld::chunk_of(IVec3::new(0, c.surface_y, 0)).y;
        let lo = IVec3::new(-c.chunk_radius, surface_chunk - c.depth_chunks, -c.chunk_radius);
        let hi = IVec3::new(c.chunk_radius, surface_chunk + 1, c.chunk_radius);
        (lo * CHUNK_SIZE, (hi + IVec3::ONE) * CHUNK_SIZE - IVec3::ONE)
    }

    /// A standing position just above the surface at the origin column.
    pub fn spawn_point(&self) -> IVec3 {
        IVec3::new(0, self.config.surface_y + 1, 0)
    }

    pub fn generate(&self) -> VoxelWorld {
        let c = &self.config;
        let mut rng = ChaCha8Rng::seed_from_u64(c.seed);
        let (min, max) = self.bounds();

        let mut world = VoxelWorld::new();
        world.load_area(min, max);
        let stone_top = c.surface_y.min(max.y);
        world.fill(min, IVec3::new(max.x, stone_top, max.z), STONE_CELL_ID);

        for _ in 0..c.tunnel_count {
            carve_tunnel(&mut world, &mut rng, c, min, IVec3::new(max.x, stone_top, max.z));
        }

        // Ore only replaces stone, so tunnels stay open.
        let mut placed = 0;
        let mut attempts = 0;
        while placed < c.ore_count && attempts < c.ore_count.saturating_mul(64) {
            attempts += 1;
            let pos = IVec3::new(
                rng.gen_range(min.x..=max.x),
                rng.gen_range(min.y..=stone_top),
                rng.gen_range(min.z..=max.z),
            );
            if world.cell(pos) == STONE_CELL_ID {
                world.set_cell(pos, ORE_CELL_ID);
                placed += 1;
            }
        }

        world
    }
}

/// Random walk of air spheres, kept inside the stone box `min..=max`.
fn carve_tunnel(
    world: &mut VoxelWorld,
    rng: &mut ChaCha8Rng,
    config: &CaveGenConfig,
    min: IVec3,
    max: IVec3,
) {
    let lo = min.as_vec3();
    let hi = max.as_vec3();
    let mut pos = Vec3::new(
        rng.gen_range(lo.x..=hi.x),
        rng.gen_range(lo.y..=hi.y),
        rng.gen_range(lo.z..=hi.z),
    );
    let mut heading = random_direction(rng);

    for _ in 0..config.tunnel_length {
        carve_sphere(world, pos, config.tunnel_radius, min, max);
        // Mostly horizontal drift with a gentle vertical wander.
        heading = (heading + random_direction(rng) * 0.35).normalize_or_zero();
        heading.y *= 0.5;
        if heading == Vec3::ZERO {
            heading = Vec3::X;
        }
        pos = (pos + heading).clamp(lo, hi);
    }
}

fn carve_sphere(world: &mut VoxelWorld, center: Vec3, radius: f32, min: IVec3, max: IVec3) {
    let r = radius.ceil() as i32;
    let c = center.round().as_ivec3();
    let lo = (c - IVec3::splat(r)).max(min);
    let hi = (c + IVec3::splat(r)).min(max);
    let radius_sq = radius * radius;
    for x in lo.x..=hi.x {
        for y in lo.y..=hi.y {
            for z in lo.z..=hi.z {
                let cell = IVec3::new(x, y, z);
                if cell.as_vec3().distance_squared(center) <= radius_sq {
                    world.set_cell(cell, EMPTY_CELL_ID);
                }
            }
        }
    }
}

fn random_direction(rng: &mut ChaCha8Rng) -> Vec3 {
    let v = Vec3::new(
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-1.0..=1.0),
    );
    v.try_normalize().unwrap_or(Vec3::X)
}
