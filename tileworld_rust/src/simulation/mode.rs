//! Task selection: which of the five modes an agent is in this tick.

use std::fmt;

use crate::simulation::config::AgentConfig;

/// What the agent is currently trying to do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Sweep the zone looking for things
    #[default]
    Explore,
    /// Head for the nearest viable tile
    Collect,
    /// Head for the nearest viable hole with a carried tile
    Fill,
    /// Head for the fuel station
    Refuel,
    /// Hold position to save fuel
    Wait,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Explore => "explore",
            Self::Collect => "collect",
            Self::Fill => "fill",
            Self::Refuel => "refuel",
            Self::Wait => "wait",
        };
        f.write_str(name)
    }
}

/// Everything mode selection looks at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeInputs {
    /// Mode chosen on the previous tick
    pub previous: Mode,
    pub fuel: f64,
    /// Distance to the fuel station, `None` while it is unknown
    pub station_distance: Option<u32>,
    pub zone_fully_visited: bool,
    pub carried: usize,
    /// Distance to the nearest viable tile in the zone
    pub nearest_tile: Option<u32>,
    /// Distance to the nearest viable hole in the zone
    pub nearest_hole: Option<u32>,
}

/// Picks this tick's mode. The first matching rule wins:
///
/// 1. Station unknown, fuel below the hard limit and the zone exhausted: `Wait`.
/// 2. Station unknown: `Explore`.
/// 3. Station at least `fuel * fuel_threshold` away, or already refuelling: `Refuel`.
/// 4. Station within two sensor ranges and fuel below the top-up level: `Refuel`.
/// 5. Empty-handed: `Collect` if a tile is known, else `Explore`.
/// 6. A hole is known: `Fill` when no tile is known, the hole is strictly
///    nearer than the nearest tile, or the agent is full; otherwise `Collect`.
/// 7. Room left and a tile known: `Collect`.
/// 8. Otherwise `Explore`.
#[must_use]
pub fn select_mode(inputs: &ModeInputs, config: &AgentConfig) -> Mode {
    let fallback = if inputs.previous == Mode::Refuel {
        Mode::Refuel
    } else {
        Mode::Explore
    };

    let Some(station) = inputs.station_distance else {
        if inputs.fuel < config.hard_fuel_limit && inputs.zone_fully_visited {
            return Mode::Wait;
        }
        return Mode::Explore;
    };

    if f64::from(station) >= inputs.fuel * config.fuel_threshold || inputs.previous == Mode::Refuel {
        return Mode::Refuel;
    }
    if i64::from(station) <= 2 * i64::from(config.sensor_range) && inputs.fuel < config.top_up_level() {
        return Mode::Refuel;
    }

    if inputs.carried == 0 {
        return if inputs.nearest_tile.is_some() {
            Mode::Collect
        } else {
            Mode::Explore
        };
    }

    if let Some(hole) = inputs.nearest_hole {
        let fill = match inputs.nearest_tile {
            None => true,
            Some(tile) => tile > hole || inputs.carried >= config.carry_capacity,
        };
        return if fill { Mode::Fill } else { Mode::Collect };
    }

    if inputs.carried < config.carry_capacity && inputs.nearest_tile.is_some() {
        return Mode::Collect;
    }
    fallback
}
