use rayon::prelude::*;

use crate::simulation::environment::GridWorld;
use crate::simulation::grid::{Coord, ObjectKind};

/// Drawn for cells with nothing in them.
pub const EMPTY: char = '.';

/// Character drawn for an object of `kind`.
#[must_use]
pub const fn glyph(kind: ObjectKind) -> char {
    match kind {
        ObjectKind::Tile => 'T',
        ObjectKind::Hole => 'O',
        ObjectKind::Obstacle => '#',
        ObjectKind::FuelStation => 'F',
    }
}

/// Maps a world cell to the (row, col) of the character that samples it.
///
/// Returns `None` when the cell falls outside the drawn area.
#[allow(clippy::cast_sign_loss)]
#[must_use]
pub fn world_to_grid_coords(
    pos: Coord,
    width: i32,
    height: i32,
    rows: usize,
    cols: usize,
) -> Option<(usize, usize)> {
    if rows == 0 || cols == 0 || width <= 0 || height <= 0 || pos.x < 0 || pos.y < 0 {
        return None;
    }
    let (w, h) = (width as usize, height as usize);
    let (x, y) = (pos.x as usize, pos.y as usize);
    if x >= w || y >= h {
        return None;
    }
    // First row/col whose sample lands on or after the cell.
    let r = (y * rows).div_ceil(h);
    let c = (x * cols).div_ceil(w);
    (r < rows && c < cols).then_some((r, c))
}

/// Renders the world as `rows` strings of `cols` characters, sampling one
/// cell per character. Agents are overlaid as their id digit.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
#[must_use]
pub fn compute_field_grid(world: &GridWorld, agents: &[Coord], rows: usize, cols: usize) -> Vec<String> {
    if rows == 0 || cols == 0 {
        return Vec::new();
    }
    let width = world.width.max(1) as usize;
    let height = world.height.max(1) as usize;

    // Use rayon to compute rows in parallel
    let mut grid: Vec<Vec<char>> = (0..rows)
        .into_par_iter()
        .map(|r| {
            let y = (r * height / rows) as i32;
            (0..cols)
                .map(|c| {
                    let x = (c * width / cols) as i32;
                    world
                        .object_at(Coord::new(x, y))
                        .map_or(EMPTY, |o| glyph(o.kind))
                })
                .collect()
        })
        .collect();

    for (i, &pos) in agents.iter().enumerate() {
        if let Some((r, c)) = world_to_grid_coords(pos, world.width, world.height, rows, cols) {
            let digit = char::from_digit((i % 10) as u32, 10).unwrap_or('@');
            grid[r][c] = digit;
        }
    }

    grid.into_iter().map(|line| line.into_iter().collect()).collect()
}
