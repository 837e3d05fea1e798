//! VoxelWorld: sparse chunked storage of cell identities.

use std::collections::HashMap;

use glam::IVec3;

use prospector_core::constants::{EMPTY_CELL_ID, UNLOADED_CELL_ID};
use prospector_core::error::SampleError;
use prospector_engine::source::SpatialSampler;

/// Edge length of a chunk, in cells.
pub const CHUNK_SIZE: i32 = 16;

const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Palette index of the empty cell. Fresh chunks are all empty.
const EMPTY_INDEX: u16 = 0;

/// One loaded chunk: palette indices, x-major then y then z.
#[derive(Debug, Clone)]
struct Chunk {
    cells: Vec<u16>,
}

impl Chunk {
    fn empty() -> Self {
        Self {
            cells: vec![EMPTY_INDEX; CHUNK_VOLUME],
        }
    }
}

/// Loaded chunks plus the palette of identities they reference.
/// Cells in chunks that are not loaded read as the unloaded identity.
#[derive(Debug, Clone)]
pub struct VoxelWorld {
    palette: Vec<String>,
    palette_index: HashMap<String, u16>,
    chunks: HashMap<IVec3, Chunk>,
}

impl Default for VoxelWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl VoxelWorld {
    pub fn new() -> Self {
        Self {
            palette: vec![EMPTY_CELL_ID.to_owned()],
            palette_index: HashMap::from([(EMPTY_CELL_ID.to_owned(), EMPTY_INDEX)]),
            chunks: HashMap::new(),
        }
    }

    /// Chunk coordinate containing a cell.
    pub fn chunk_of(pos: IVec3) -> IVec3 {
        IVec3::new(
            pos.x.div_euclid(CHUNK_SIZE),
            pos.y.div_euclid(CHUNK_SIZE),
            pos.z.div_euclid(CHUNK_SIZE),
        )
    }

    fn local_index(pos: IVec3) -> usize {
        let x = pos.x.rem_euclid(CHUNK_SIZE) as usize;
        let y = pos.y.rem_euclid(CHUNK_SIZE) as usize;
        let z = pos.z.rem_euclid(CHUNK_SIZE) as usize;
        let size = CHUNK_SIZE as usize;
        (x * size + y) * size + z
    }

    /// Palette index for `id`, adding it if new. `None` once the palette is full.
    fn intern(&mut self, id: &str) -> Option<u16> {
        if let Some(&index) = self.palette_index.get(id) {
            return Some(index);
        }
        let index = u16::try_from(self.palette.len()).ok()?;
        self.palette.push(id.to_owned());
        self.palette_index.insert(id.to_owned(), index);
        Some(index)
    }

    /// Number of distinct identities ever written.
    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    /// Load a chunk filled with empty cells. Already loaded chunks are kept.
    pub fn load_chunk(&mut self, chunk: IVec3) {
        self.chunks.entry(chunk).or_insert_with(Chunk::empty);
    }

    /// Load every chunk overlapping the inclusive cell box `min..=max`.
    pub fn load_area(&mut self, min: IVec3, max: IVec3) {
        let lo = Self::chunk_of(min.min(max));
        let hi = Self::chunk_of(min.max(max));
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    self.load_chunk(IVec3::new(x, y, z));
                }
            }
        }
    }

    pub fn unload_chunk(&mut self, chunk: IVec3) -> bool {
        self.chunks.remove(&chunk).is_some()
    }

    pub fn is_loaded(&self, pos: IVec3) -> bool {
        self.chunks.contains_key(&Self::chunk_of(pos))
    }

    pub fn loaded_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Identity of the cell at `pos`.
    pub fn cell(&self, pos: IVec3) -> &str {
        match self.chunks.get(&Self::chunk_of(pos)) {
            Some(chunk) => &self.palette[chunk.cells[Self::local_index(pos)] as usize],
            None => UNLOADED_CELL_ID,
        }
    }

    /// Set a cell. Returns `false` (and changes nothing) if its chunk is not
    /// loaded or `id` is new and the palette already holds `u16::MAX + 1` ids.
    pub fn set_cell(&mut self, pos: IVec3, id: &str) -> bool {
        let chunk_pos = Self::chunk_of(pos);
        if !self.chunks.contains_key(&chunk_pos) {
            return false;
        }
        let Some(index) = self.intern(id) else {
            return false;
        };
        if let Some(chunk) = self.chunks.get_mut(&chunk_pos) {
            chunk.cells[Self::local_index(pos)] = index;
        }
        true
    }

    /// Set every loaded cell in the inclusive box `min..=max`.
    /// Returns the number of cells written.
    pub fn fill(&mut self, min: IVec3, max: IVec3, id: &str) -> usize {
        let lo = min.min(max);
        let hi = min.max(max);
        let mut written = 0;
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    if self.set_cell(IVec3::new(x, y, z), id) {
                        written += 1;
                    }
                }
            }
        }
        written
    }

    /// Number of loaded cells with the given identity.
    pub fn count(&self, id: &str) -> usize {
        let Some(&index) = self.palette_index.get(id) else {
            return 0;
        };
        self.chunks
            .values()
            .map(|c| c.cells.iter().filter(|&&i| i == index).count())
            .sum()
    }
}

impl SpatialSampler for VoxelWorld {
    fn cell_identity(&self, pos: IVec3) -> Result<&str, SampleError> {
        Ok(self.cell(pos))
    }
}
