//! Engine constants and tuning parameters.

// --- Scanning ---

/// Default cadence at which region scans are attempted (seconds).
pub const DEFAULT_SCAN_INTERVAL_SECS: f32 = 1.0;

/// Upper bound on the number of cells a single region may cover.
/// Keeps the per-tick scan cost bounded regardless of world size.
pub const MAX_REGION_CELLS: u64 = 1 << 20;

// --- Reserved cell identities ---

/// Identity reported for an empty cell.
pub const EMPTY_CELL_ID: &str = "engine:air";

/// Identity reported for a cell whose chunk is not loaded.
pub const UNLOADED_CELL_ID: &str = "engine:unloaded";

// --- Period function ---

/// Default number of discrete distance bands in a linear period function.
pub const DEFAULT_SCALE_COUNT: u32 = 4;

// --- Presets ---

/// Cave detector: scan column below the observer.
pub const CAVE_REGION_MIN: [i32; 3] = [-1, -55, -1];
pub const CAVE_REGION_MAX: [i32; 3] = [1, -5, 1];

/// Cave detector gate: half-edge of the cube that must contain solid cells.
pub const CAVE_GATE_RADIUS: i32 = 3;

/// Cave detector ping period at zero distance (ms).
pub const CAVE_PERIOD_LOW_MS: u32 = 250;

/// Cave detector ping period at maximum distance (ms).
pub const CAVE_PERIOD_HIGH_MS: u32 = 1000;

/// Ore detector: half-edge of the scanned cube.
pub const ORE_SCAN_RADIUS: i32 = 32;

/// Ore detector ping period at zero distance (ms).
pub const ORE_PERIOD_LOW_MS: u32 = 200;

/// Ore detector ping period at maximum distance (ms).
pub const ORE_PERIOD_HIGH_MS: u32 = 2000;

/// Audio cue played by the bundled detectors.
pub const SCANNER_BEEP_CUE: &str = "prospector:scanner_beep";

/// Item identity that activates the cave detector.
pub const CAVE_DETECTOR_ID: &str = "prospector:cave_detector";

/// Item identity that activates the ore detector.
pub const ORE_DETECTOR_ID: &str = "prospector:ore_detector";

/// Cell identity the ore detector searches for.
pub const ORE_CELL_ID: &str = "core:iris";
