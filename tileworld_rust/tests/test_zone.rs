//! Zone partitioning and block layout.
//!
//! Properties:
//! - Strips tile the world: every cell belongs to exactly one strip
//! - Every announcing agent owns exactly one strip, and no strip is shared
//! - Each block centre lies in its zone and inside the block it indexes

use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;
use tileworld_rust::simulation::coordination::AgentId;
use tileworld_rust::simulation::grid::{Coord, Rect};
use tileworld_rust::simulation::planning::{assign_zones, partition_strips, BlockPlan, SplitAxis};

#[test]
fn test_two_agents_on_wide_world() {
    let positions = BTreeMap::from([
        (AgentId(0), Coord::new(1, 1)),
        (AgentId(1), Coord::new(18, 1)),
    ]);
    let assignment = assign_zones(20, 10, &positions);

    assert_eq!(assignment.axis, SplitAxis::Width);
    let left = assignment.zone_of(AgentId(0)).unwrap();
    let right = assignment.zone_of(AgentId(1)).unwrap();
    assert_eq!(left.rect, Rect::new(0, 10, 0, 10));
    assert_eq!(right.rect, Rect::new(10, 20, 0, 10));
    assert_eq!(
        right.corners(),
        [
            Coord::new(10, 0),
            Coord::new(20, 0),
            Coord::new(20, 10),
            Coord::new(10, 10)
        ]
    );
}

#[test]
fn test_square_world_splits_by_height() {
    let positions = BTreeMap::from([
        (AgentId(0), Coord::new(40, 45)),
        (AgentId(1), Coord::new(3, 2)),
    ]);
    let assignment = assign_zones(50, 50, &positions);
    assert_eq!(assignment.axis, SplitAxis::Height);
    assert_eq!(assignment.zone_of(AgentId(1)).unwrap().rect, Rect::new(0, 50, 0, 25));
    assert_eq!(assignment.zone_of(AgentId(0)).unwrap().rect, Rect::new(0, 50, 25, 50));
}

#[test]
fn test_single_agent_owns_everything() {
    let positions = BTreeMap::from([(AgentId(7), Coord::new(4, 4))]);
    let assignment = assign_zones(13, 9, &positions);
    assert_eq!(assignment.zone_of(AgentId(7)).unwrap().rect, Rect::new(0, 13, 0, 9));
}

#[test]
fn test_block_plan_for_default_zone() {
    // A 50 x 25 strip with R = 3: ten columns, five rows of 5 x 5 blocks.
    let plan = BlockPlan::new(Rect::new(0, 50, 25, 50), 3);
    assert_eq!(plan.counts(), (10, 5));
    assert_eq!(plan.centre(0), Some(Coord::new(3, 28)));
    assert_eq!(plan.centre(9), Some(Coord::new(47, 28)));
    // Row 1 runs right to left.
    assert_eq!(plan.centre(10), Some(Coord::new(47, 33)));
    assert_eq!(plan.centre(49), Some(Coord::new(47, 47)));
}

proptest! {
    #[test]
    fn prop_strips_tile_the_world(width in 1i32..60, height in 1i32..60, count in 1usize..8) {
        let zones = partition_strips(width, height, count);
        prop_assert_eq!(zones.len(), count);
        for y in 0..height {
            for x in 0..width {
                let owners = zones.iter().filter(|z| z.contains(Coord::new(x, y))).count();
                prop_assert_eq!(owners, 1);
            }
        }
    }

    #[test]
    fn prop_each_agent_gets_its_own_strip(
        width in 1i32..60,
        height in 1i32..60,
        raw in prop::collection::vec((0i32..60, 0i32..60), 1..8),
    ) {
        let positions: BTreeMap<AgentId, Coord> = raw
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| (AgentId(u32::try_from(i).unwrap()), Coord::new(x % width, y % height)))
            .collect();
        let assignment = assign_zones(width, height, &positions);

        prop_assert_eq!(assignment.owner.len(), positions.len());
        let strips: HashSet<usize> = assignment.owner.values().copied().collect();
        prop_assert_eq!(strips.len(), positions.len());
    }

    #[test]
    fn prop_block_centres_index_themselves(
        x_min in 0i32..20,
        y_min in 0i32..20,
        width in 1i32..40,
        height in 1i32..40,
        range in 1i32..6,
    ) {
        let zone = Rect::new(x_min, x_min + width, y_min, y_min + height);
        let plan = BlockPlan::new(zone, range);
        let (cols, rows) = plan.counts();
        prop_assert_eq!(plan.len(), cols * rows);
        for (i, &centre) in plan.centres().iter().enumerate() {
            prop_assert!(zone.contains(centre));
            prop_assert_eq!(plan.current_block(centre), i);
        }
    }

    #[test]
    fn prop_every_cell_maps_to_a_block(
        width in 1i32..30,
        height in 1i32..30,
        range in 1i32..6,
    ) {
        let zone = Rect::new(0, width, 0, height);
        let plan = BlockPlan::new(zone, range);
        for cell in zone.cells() {
            prop_assert!(plan.current_block(cell) < plan.len());
        }
    }
}
