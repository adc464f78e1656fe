//! Exploration destinations within an agent's zone.
//!
//! Inside its zone the agent sweeps the serpentine block order from the
//! first block to the last, then heads straight back to the first block and
//! starts over. Outside its zone it walks to the nearest strip edge, one
//! sensor range deep.

use crate::simulation::grid::{Coord, Rect};
use crate::simulation::memory::AreaMemory;
use crate::simulation::planning::blocks::BlockPlan;
use crate::simulation::planning::zone::SplitAxis;

#[derive(Clone, Debug)]
pub struct ExplorationRoute {
    plan: BlockPlan,
    axis: SplitAxis,
    sensor_range: i32,
    /// Set while returning from the last block to the first
    back_route: bool,
}

impl ExplorationRoute {
    #[must_use]
    pub fn new(zone: Rect, axis: SplitAxis, sensor_range: i32) -> Self {
        Self {
            plan: BlockPlan::new(zone, sensor_range),
            axis,
            sensor_range,
            back_route: false,
        }
    }

    /// Where to explore next from `pos`, or `None` when the chosen goal and
    /// all of its neighbours are known to be blocked.
    pub fn next_destination(&mut self, pos: Coord, memory: &AreaMemory) -> Option<Coord> {
        let goal = if self.plan.zone().contains(pos) {
            self.sweep(pos, memory)
        } else {
            self.entry_point(pos)
        };
        unblocked_near(goal, memory)
    }

    fn sweep(&mut self, pos: Coord, memory: &AreaMemory) -> Coord {
        let cur = self.plan.current_block(pos);
        if cur == 0 {
            self.back_route = false;
        }
        if self.plan.is_last(cur) || self.back_route {
            self.back_route = true;
            self.plan.set_visited(cur, false);
            return self.centre(0, pos);
        }

        let centre = self.centre(cur, pos);
        if pos == centre {
            self.plan.set_visited(cur, true);
        }
        let next = self.centre(cur + 1, pos);

        if self.plan.is_border(cur) {
            // Row ends are where the sweep turns; the centre must be reached
            // before moving on unless it cannot be.
            if memory.is_cell_blocked(centre.x, centre.y) {
                self.plan.set_visited(cur, true);
            }
            if self.plan.is_visited(cur) {
                next
            } else {
                centre
            }
        } else {
            self.plan.set_visited(cur - 1, false);
            next
        }
    }

    fn centre(&self, index: usize, fallback: Coord) -> Coord {
        self.plan.centre(index).unwrap_or(fallback)
    }

    fn entry_point(&self, pos: Coord) -> Coord {
        let zone = self.plan.zone();
        let r = self.sensor_range;
        let goal = match self.axis {
            SplitAxis::Height if pos.y >= zone.y_max => Coord::new(pos.x, zone.y_max - r),
            SplitAxis::Height => Coord::new(pos.x, zone.y_min + r),
            SplitAxis::Width if pos.x >= zone.x_max => Coord::new(zone.x_max - r, pos.y),
            SplitAxis::Width => Coord::new(zone.x_min + r, pos.y),
        };
        Coord::new(
            goal.x.clamp(zone.x_min, (zone.x_max - 1).max(zone.x_min)),
            goal.y.clamp(zone.y_min, (zone.y_max - 1).max(zone.y_min)),
        )
    }

    /// Serpentine index of the block the agent is in.
    #[must_use]
    pub fn current_block(&self, pos: Coord) -> usize {
        self.plan.current_block(pos)
    }

    #[must_use]
    pub const fn plan(&self) -> &BlockPlan {
        &self.plan
    }

    #[must_use]
    pub const fn is_returning(&self) -> bool {
        self.back_route
    }
}

/// `goal` itself if it is not known to be blocked, otherwise the first free
/// in-bounds cell of its 3 x 3 neighbourhood in row-major order.
#[must_use]
pub fn unblocked_near(goal: Coord, memory: &AreaMemory) -> Option<Coord> {
    if !memory.is_cell_blocked(goal.x, goal.y) {
        return Some(goal);
    }
    let (width, height) = memory.dimensions();
    (-1..=1)
        .flat_map(|dy| (-1..=1).map(move |dx| goal.offset(dx, dy)))
        .find(|c| {
            c.x >= 0 && c.y >= 0 && c.x < width && c.y < height && !memory.is_cell_blocked(c.x, c.y)
        })
}
