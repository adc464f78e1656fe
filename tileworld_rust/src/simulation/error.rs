//! Error types for environment actions and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::simulation::grid::Coord;

/// Failures reported by the environment when an action cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("cell {0} is blocked")]
    CellBlocked(Coord),

    #[error("cell {0} is outside the world")]
    OutOfBounds(Coord),

    #[error("agent at {0} has no fuel left")]
    OutOfFuel(Coord),

    #[error("no tile to pick up at {0}")]
    NoTile(Coord),

    #[error("no hole to fill at {0}")]
    NoHole(Coord),

    #[error("agent at {0} is not carrying a tile")]
    NotCarrying(Coord),

    #[error("agent at {0} is already carrying {1} tiles")]
    CapacityReached(Coord, usize),

    #[error("no fuel station at {0}")]
    NotAtFuelStation(Coord),

    #[error("no free cell left to place an agent")]
    NoFreeCell,
}

/// Failures while reading or validating a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
