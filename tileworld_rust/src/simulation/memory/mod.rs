//! Memory systems for the forager agent.
//!
//! This module provides:
//! - A per-cell percept cache with discovery timestamps
//! - Area memory: sensor-window merge, visitation tracking and nearest-object queries
//! - The spiral offset table used for nearest-first scans

mod area_memory;
mod percept;
mod spiral;

pub use area_memory::AreaMemory;
pub use percept::{Percept, PerceptStore};
pub use spiral::spiral_offsets;
