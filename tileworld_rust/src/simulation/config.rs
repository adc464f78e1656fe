//! Runtime configuration, loaded from TOML with defaults from [`params`].
//!
//! Every section is optional; missing keys fall back to the constants in
//! [`params`].
//!
//! ```toml
//! [world]
//! width = 60
//! height = 40
//!
//! [agent]
//! agent_count = 3
//! sensor_range = 3
//! ```
//!
//! [`params`]: crate::simulation::params

use std::path::Path;

use serde::Deserialize;

use crate::simulation::error::ConfigError;
use crate::simulation::params::{
    AGENT_COUNT, CARRY_CAPACITY, DEFAULT_SEED, FUEL_THRESHOLD, HARD_FUEL_LIMIT, HOLE_SPAWN_RATE,
    LIFETIME_THRESHOLD, MAX_FUEL, OBJECT_LIFETIME, OBSTACLE_SPAWN_RATE, REFUEL_FRACTION,
    SENSOR_RANGE, TILE_SPAWN_RATE, TOP_UP_RANGES, WORLD_HEIGHT, WORLD_WIDTH,
};

/// Top-level configuration for a simulation run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub agent: AgentConfig,
}

/// Parameters of the reference grid world.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    pub width: i32,
    pub height: i32,
    /// Ticks a tile, hole or obstacle survives
    pub object_lifetime: u64,
    pub tile_spawn_rate: f64,
    pub hole_spawn_rate: f64,
    pub obstacle_spawn_rate: f64,
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            object_lifetime: OBJECT_LIFETIME,
            tile_spawn_rate: TILE_SPAWN_RATE,
            hole_spawn_rate: HOLE_SPAWN_RATE,
            obstacle_spawn_rate: OBSTACLE_SPAWN_RATE,
            seed: DEFAULT_SEED,
        }
    }
}

/// Parameters shared by every forager agent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    pub sensor_range: i32,
    pub max_fuel: f64,
    pub carry_capacity: usize,
    pub fuel_threshold: f64,
    pub hard_fuel_limit: f64,
    pub lifetime_threshold: f64,
    pub top_up_ranges: f64,
    pub refuel_fraction: f64,
    /// Number of agents expected to announce themselves before partitioning
    pub agent_count: usize,
    /// Lifetime the agent assumes for remembered objects
    pub object_lifetime: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            sensor_range: SENSOR_RANGE,
            max_fuel: MAX_FUEL,
            carry_capacity: CARRY_CAPACITY,
            fuel_threshold: FUEL_THRESHOLD,
            hard_fuel_limit: HARD_FUEL_LIMIT,
            lifetime_threshold: LIFETIME_THRESHOLD,
            top_up_ranges: TOP_UP_RANGES,
            refuel_fraction: REFUEL_FRACTION,
            agent_count: AGENT_COUNT,
            object_lifetime: OBJECT_LIFETIME,
        }
    }
}

impl AgentConfig {
    /// Fuel level below which a passing agent tops up at the station.
    #[must_use]
    pub fn top_up_level(&self) -> f64 {
        self.max_fuel - f64::from(self.sensor_range) * self.top_up_ranges
    }

    /// Side length of an exploration block.
    #[must_use]
    pub const fn block_size(&self) -> i32 {
        2 * self.sensor_range - 1
    }
}

impl SimulationConfig {
    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Rejects values the agents cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| ConfigError::Invalid {
            field,
            reason: reason.to_owned(),
        };
        if self.world.width < 1 || self.world.height < 1 {
            return Err(invalid("world.width/height", "must be positive"));
        }
        if self.world.object_lifetime == 0 {
            return Err(invalid("world.object_lifetime", "must be positive"));
        }
        let rates = [
            ("world.tile_spawn_rate", self.world.tile_spawn_rate),
            ("world.hole_spawn_rate", self.world.hole_spawn_rate),
            ("world.obstacle_spawn_rate", self.world.obstacle_spawn_rate),
        ];
        for (field, rate) in rates {
            if !rate.is_finite() || rate < 0.0 {
                return Err(invalid(field, "must be a finite, non-negative number"));
            }
        }
        if self.agent.sensor_range < 1 {
            return Err(invalid("agent.sensor_range", "must be at least 1"));
        }
        if self.agent.agent_count == 0 {
            return Err(invalid("agent.agent_count", "must be at least 1"));
        }
        if self.agent.carry_capacity == 0 {
            return Err(invalid("agent.carry_capacity", "must be at least 1"));
        }
        let fuel = [
            ("agent.max_fuel", self.agent.max_fuel),
            ("agent.fuel_threshold", self.agent.fuel_threshold),
            ("agent.hard_fuel_limit", self.agent.hard_fuel_limit),
            ("agent.top_up_ranges", self.agent.top_up_ranges),
            ("agent.refuel_fraction", self.agent.refuel_fraction),
        ];
        for (field, value) in fuel {
            if !value.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
        }
        if self.agent.max_fuel <= 0.0 {
            return Err(invalid("agent.max_fuel", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.agent.lifetime_threshold) {
            return Err(invalid("agent.lifetime_threshold", "must be within [0, 1]"));
        }
        if self.agent.fuel_threshold <= 0.0 {
            return Err(invalid("agent.fuel_threshold", "must be positive"));
        }
        Ok(())
    }
}
