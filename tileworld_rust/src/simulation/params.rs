//! Simulation hyperparameters.
//!
//! These are the defaults behind [`crate::simulation::config`]; a TOML file
//! can override any of them at runtime.

// === World Parameters ===
pub const WORLD_WIDTH: i32 = 50;
pub const WORLD_HEIGHT: i32 = 50;
/// Ticks a tile, hole or obstacle survives after it appears
pub const OBJECT_LIFETIME: u64 = 100;
/// Mean number of tiles spawned per tick
pub const TILE_SPAWN_RATE: f64 = 0.2;
/// Mean number of holes spawned per tick
pub const HOLE_SPAWN_RATE: f64 = 0.2;
/// Mean number of obstacles spawned per tick
pub const OBSTACLE_SPAWN_RATE: f64 = 0.2;
/// Seed used when none is supplied on the command line
pub const DEFAULT_SEED: u64 = 4_162_024;

// === Agent Parameters ===
/// Chebyshev radius of the square sensor window
pub const SENSOR_RANGE: i32 = 3;
/// Fuel on construction and after a refuel
pub const MAX_FUEL: f64 = 500.0;
/// Tiles an agent can carry at once
pub const CARRY_CAPACITY: usize = 3;
/// Refuel when the station is at least `fuel * FUEL_THRESHOLD` cells away
pub const FUEL_THRESHOLD: f64 = 0.6;
/// Below this fuel level an agent with an exhausted zone stops and waits
pub const HARD_FUEL_LIMIT: f64 = 100.0;
/// Fraction of the object lifetime trusted when estimating remaining life
pub const LIFETIME_THRESHOLD: f64 = 0.9;
/// Fuel margin (in sensor ranges) below `MAX_FUEL` for an opportunistic top-up
pub const TOP_UP_RANGES: f64 = 15.0;
/// Fraction of `MAX_FUEL` below which standing on the station triggers a refuel
pub const REFUEL_FRACTION: f64 = 0.99;
/// Number of agents sharing the world
pub const AGENT_COUNT: usize = 2;
