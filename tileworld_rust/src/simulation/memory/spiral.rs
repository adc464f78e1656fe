//! Precomputed spiral of neighbour offsets for nearest-first memory scans.

/// Offsets around the origin ordered by increasing ring distance.
///
/// Ring `r` holds every offset whose Chebyshev distance is `r`, walked
/// clockwise from its top-left corner. The first entry is always `(0, 0)`.
#[must_use]
pub fn spiral_offsets(radius: i32) -> Vec<(i32, i32)> {
    let radius = radius.max(0);
    let side = usize::try_from(2 * radius + 1).unwrap_or(1);
    let mut offsets = Vec::with_capacity(side * side);
    offsets.push((0, 0));
    for r in 1..=radius {
        // top edge, left to right
        offsets.extend((-r..=r).map(|dx| (dx, -r)));
        // right edge, downwards
        offsets.extend((-r + 1..=r).map(|dy| (r, dy)));
        // bottom edge, right to left
        offsets.extend((-r..r).rev().map(|dx| (dx, r)));
        // left edge, upwards
        offsets.extend((-r + 1..r).rev().map(|dy| (-r, dy)));
    }
    offsets
}
