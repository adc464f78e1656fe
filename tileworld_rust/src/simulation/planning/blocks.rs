//! Serpentine block decomposition of a zone.
//!
//! A zone is tiled with square blocks of side `2R - 1` so that an agent
//! parked at a block's centre sees the whole block and a little of its
//! neighbours. Blocks are numbered boustrophedon style: even rows run left
//! to right, odd rows right to left, so consecutive indices are always
//! adjacent.

use crate::simulation::grid::{Coord, Rect};

#[derive(Clone, Debug)]
pub struct BlockPlan {
    zone: Rect,
    block_size: i32,
    hor_blocks: usize,
    ver_blocks: usize,
    /// Centres in serpentine order
    centres: Vec<Coord>,
    visited: Vec<bool>,
}

impl BlockPlan {
    /// Lays out the blocks of `zone` for an agent with the given sensor range.
    ///
    /// Rows and columns are counted by floor division, with at least one of
    /// each. The last row and column are anchored one sensor range in from
    /// the zone's far edge, so trailing cells that do not fill a whole block
    /// are still covered.
    #[must_use]
    pub fn new(zone: Rect, sensor_range: i32) -> Self {
        let block_size = (2 * sensor_range - 1).max(1);
        let hor_blocks = usize::try_from(zone.width() / block_size).unwrap_or(0).max(1);
        let ver_blocks = usize::try_from(zone.height() / block_size).unwrap_or(0).max(1);
        // Centre offset within a block; with R = 1 the block is a single cell.
        let offset = sensor_range.min(block_size - 1);

        let axis_centre = |min: i32, max: i32, i: usize, count: usize| {
            let at = if i + 1 == count {
                max - sensor_range
            } else {
                min + block_size * i32::try_from(i).unwrap_or(0) + offset
            };
            at.clamp(min, (max - 1).max(min))
        };

        let mut centres = Vec::with_capacity(hor_blocks * ver_blocks);
        for row in 0..ver_blocks {
            let y = axis_centre(zone.y_min, zone.y_max, row, ver_blocks);
            let xs = (0..hor_blocks).map(|col| axis_centre(zone.x_min, zone.x_max, col, hor_blocks));
            if row % 2 == 0 {
                centres.extend(xs.map(|x| Coord::new(x, y)));
            } else {
                centres.extend(xs.rev().map(|x| Coord::new(x, y)));
            }
        }

        Self {
            zone,
            block_size,
            visited: vec![false; centres.len()],
            centres,
            hor_blocks,
            ver_blocks,
        }
    }

    /// Serpentine index of the block containing `pos`.
    ///
    /// Positions past the last row or column fall into the last block of
    /// that row or column.
    #[must_use]
    pub fn current_block(&self, pos: Coord) -> usize {
        let rel_x = (pos.x - self.zone.x_min).max(0) / self.block_size;
        let rel_y = (pos.y - self.zone.y_min).max(0) / self.block_size;
        let col = usize::try_from(rel_x).unwrap_or(0).min(self.hor_blocks - 1);
        let row = usize::try_from(rel_y).unwrap_or(0).min(self.ver_blocks - 1);
        if row % 2 == 0 {
            row * self.hor_blocks + col
        } else {
            row * self.hor_blocks + (self.hor_blocks - 1 - col)
        }
    }

    /// True for the first and last block of each row.
    #[must_use]
    pub const fn is_border(&self, index: usize) -> bool {
        let col = index % self.hor_blocks;
        col == 0 || col == self.hor_blocks - 1
    }

    #[must_use]
    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.centres.len()
    }

    #[must_use]
    pub fn centre(&self, index: usize) -> Option<Coord> {
        self.centres.get(index).copied()
    }

    #[must_use]
    pub fn centres(&self) -> &[Coord] {
        &self.centres
    }

    #[must_use]
    pub fn is_visited(&self, index: usize) -> bool {
        self.visited.get(index).copied().unwrap_or(false)
    }

    pub fn set_visited(&mut self, index: usize, visited: bool) {
        if let Some(flag) = self.visited.get_mut(index) {
            *flag = visited;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.centres.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.centres.is_empty()
    }

    #[must_use]
    pub const fn block_size(&self) -> i32 {
        self.block_size
    }

    /// Blocks per row and per column.
    #[must_use]
    pub const fn counts(&self) -> (usize, usize) {
        (self.hor_blocks, self.ver_blocks)
    }

    #[must_use]
    pub const fn zone(&self) -> Rect {
        self.zone
    }
}
