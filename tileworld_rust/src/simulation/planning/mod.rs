//! Planning for forager agents.
//!
//! This module provides:
//! - One-shot partition of the world into per-agent strips
//! - Serpentine block sweeps of a strip
//! - A* routing over an agent's belief grid

mod blocks;
mod explore;
mod path;
mod zone;

pub use blocks::BlockPlan;
pub use explore::{unblocked_near, ExplorationRoute};
pub use path::{AStarPlanner, Path, PathFinder, PathStep};
pub use zone::{assign_zones, partition_strips, SplitAxis, Zone, ZoneAssignment};
