//! Scan stages run by the engine on each detection pass.
//!
//! Systems are pure functions over a sampler and plain data.
//! They do not own state; the engine holds the detection set and the task.

pub mod gate;
pub mod scan;
