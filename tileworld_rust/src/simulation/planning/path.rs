//! Path oracle over an agent's belief grid.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use crate::simulation::grid::{Coord, Direction};
use crate::simulation::memory::AreaMemory;

/// One move of a path: the direction to take and the cell it lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathStep {
    pub pos: Coord,
    pub direction: Direction,
}

/// A sequence of single-cell moves, consumed from the front.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    steps: VecDeque<PathStep>,
}

impl Path {
    #[must_use]
    pub fn new(steps: impl IntoIterator<Item = PathStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn pop_next(&mut self) -> Option<PathStep> {
        self.steps.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Cell the path ends on.
    #[must_use]
    pub fn destination(&self) -> Option<Coord> {
        self.steps.back().map(|s| s.pos)
    }
}

impl Iterator for Path {
    type Item = PathStep;

    fn next(&mut self) -> Option<Self::Item> {
        self.pop_next()
    }
}

/// Finds a route between two cells given what an agent believes about the grid.
pub trait PathFinder {
    /// Route from `start` to `goal`, or `None` when none is known. A path
    /// from a cell to itself is empty.
    fn find_path(&self, memory: &AreaMemory, start: Coord, goal: Coord) -> Option<Path>;
}

/// A* over 4-connected cells with the Manhattan heuristic. Cells with a
/// remembered obstacle are impassable; everything else is assumed free.
#[derive(Clone, Copy, Debug)]
pub struct AStarPlanner {
    /// Paths longer than this are not searched for
    pub max_search_distance: u32,
}

impl AStarPlanner {
    #[must_use]
    pub const fn new(max_search_distance: u32) -> Self {
        Self {
            max_search_distance,
        }
    }

    /// Planner that gives up beyond `width + height` steps.
    #[must_use]
    pub const fn for_world(width: i32, height: i32) -> Self {
        Self::new((width + height).unsigned_abs())
    }
}

impl PathFinder for AStarPlanner {
    fn find_path(&self, memory: &AreaMemory, start: Coord, goal: Coord) -> Option<Path> {
        let (width, height) = memory.dimensions();
        let passable = |c: Coord| {
            c.x >= 0 && c.y >= 0 && c.x < width && c.y < height && !memory.is_cell_blocked(c.x, c.y)
        };
        if !passable(goal) || start.manhattan(goal) > self.max_search_distance {
            return None;
        }
        if start == goal {
            return Some(Path::default());
        }

        let mut open = BinaryHeap::new();
        let mut came_from: HashMap<Coord, Coord> = HashMap::new();
        let mut cost: HashMap<Coord, u32> = HashMap::new();
        cost.insert(start, 0);
        open.push(Reverse((start.manhattan(goal), 0u32, start)));

        while let Some(Reverse((_, g, current))) = open.pop() {
            if current == goal {
                return Some(reconstruct(&came_from, start, goal));
            }
            if cost.get(&current).is_some_and(|&best| g > best) {
                continue;
            }
            for direction in Direction::moves() {
                let next = current.step(direction);
                let tentative = g + 1;
                if tentative > self.max_search_distance || !passable(next) {
                    continue;
                }
                if cost.get(&next).is_none_or(|&known| tentative < known) {
                    cost.insert(next, tentative);
                    came_from.insert(next, current);
                    open.push(Reverse((tentative + next.manhattan(goal), tentative, next)));
                }
            }
        }
        None
    }
}

fn reconstruct(came_from: &HashMap<Coord, Coord>, start: Coord, goal: Coord) -> Path {
    let mut cells = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        cells.push(prev);
        current = prev;
    }
    cells.reverse();

    let mut from = start;
    Path::new(cells.into_iter().filter_map(|pos| {
        let direction = Direction::between(from, pos)?;
        from = pos;
        Some(PathStep { pos, direction })
    }))
}
