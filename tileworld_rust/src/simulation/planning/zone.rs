//! One-shot partition of the world into per-agent strips.
//!
//! The world is cut along its longer side into one strip per agent. Strips
//! are then handed out greedily: strip `i` goes to whichever unassigned agent
//! announced a position closest to the strip's leading edge. The result is
//! deterministic for a given set of announcements but is not a minimum-cost
//! matching.

use std::collections::BTreeMap;

use tracing::debug;

use crate::simulation::coordination::AgentId;
use crate::simulation::grid::{Coord, Rect};

/// Which dimension the strips are cut along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitAxis {
    /// Strips side by side, each spanning the full height
    Width,
    /// Strips stacked vertically, each spanning the full width
    Height,
}

impl SplitAxis {
    /// The longer dimension; square worlds are cut by height.
    #[must_use]
    pub const fn for_world(width: i32, height: i32) -> Self {
        if width > height {
            Self::Width
        } else {
            Self::Height
        }
    }

    /// Coordinate of `c` along this axis.
    #[must_use]
    pub const fn along(self, c: Coord) -> i32 {
        match self {
            Self::Width => c.x,
            Self::Height => c.y,
        }
    }
}

/// An agent's exclusive strip of the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Zone {
    /// Position of the strip along the split axis, starting at 0
    pub index: usize,
    pub rect: Rect,
}

impl Zone {
    /// Corners clockwise from top-left.
    #[must_use]
    pub const fn corners(&self) -> [Coord; 4] {
        self.rect.corners()
    }

    #[must_use]
    pub const fn contains(&self, c: Coord) -> bool {
        self.rect.contains(c)
    }

    /// Start of the strip along `axis`.
    #[must_use]
    pub const fn leading_edge(&self, axis: SplitAxis) -> i32 {
        match axis {
            SplitAxis::Width => self.rect.x_min,
            SplitAxis::Height => self.rect.y_min,
        }
    }
}

/// Cuts a `width` x `height` world into `count` equal strips along its
/// longer side. The last strip absorbs the remainder.
#[must_use]
pub fn partition_strips(width: i32, height: i32, count: usize) -> Vec<Zone> {
    let Ok(n) = i32::try_from(count) else {
        return Vec::new();
    };
    if n == 0 {
        return Vec::new();
    }
    let axis = SplitAxis::for_world(width, height);
    let length = match axis {
        SplitAxis::Width => width,
        SplitAxis::Height => height,
    };
    let strip = length / n;

    (0..n)
        .map(|i| {
            let start = strip * i;
            let end = if i == n - 1 { length } else { strip * (i + 1) };
            let rect = match axis {
                SplitAxis::Width => Rect::new(start, end, 0, height),
                SplitAxis::Height => Rect::new(0, width, start, end),
            };
            Zone {
                index: usize::try_from(i).unwrap_or_default(),
                rect,
            }
        })
        .collect()
}

/// The outcome of partitioning: every strip and which agent owns it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneAssignment {
    pub axis: SplitAxis,
    pub zones: Vec<Zone>,
    /// Strip index owned by each agent
    pub owner: BTreeMap<AgentId, usize>,
}

impl ZoneAssignment {
    #[must_use]
    pub fn zone_of(&self, agent: AgentId) -> Option<&Zone> {
        self.owner.get(&agent).and_then(|&i| self.zones.get(i))
    }
}

/// Partitions the world among the agents in `positions` and assigns strips
/// greedily, nearest unassigned agent first. Ties go to the lowest id.
#[must_use]
pub fn assign_zones(width: i32, height: i32, positions: &BTreeMap<AgentId, Coord>) -> ZoneAssignment {
    let axis = SplitAxis::for_world(width, height);
    let zones = partition_strips(width, height, positions.len());
    let agents: Vec<(AgentId, Coord)> = positions.iter().map(|(&id, &pos)| (id, pos)).collect();
    let mut assigned = vec![false; agents.len()];
    let mut owner = BTreeMap::new();

    for zone in &zones {
        let edge = zone.leading_edge(axis);
        let nearest = agents
            .iter()
            .enumerate()
            .filter(|(k, _)| !assigned[*k])
            .min_by_key(|(k, (_, pos))| (axis.along(*pos).abs_diff(edge), *k));
        if let Some((k, (id, pos))) = nearest {
            assigned[k] = true;
            owner.insert(*id, zone.index);
            debug!(agent = %id, %pos, zone = zone.index, "strip assigned");
        }
    }

    ZoneAssignment { axis, zones, owner }
}
