use std::collections::HashSet;

use worldshift_core::{CellCoord, MoveDelta, SubCellOffset, TILE_SIZE};
use worldshift_system_movement::{resolve_step, settle, MotionState};

fn walkable_set(cells: &[(i32, i32)]) -> impl Fn(CellCoord) -> bool {
    let open: HashSet<CellCoord> = cells
        .iter()
        .map(|(column, row)| CellCoord::new(*column, *row))
        .collect();
    move |cell| open.contains(&cell)
}

#[test]
fn diagonal_wins_when_target_is_walkable() {
    let walkable = walkable_set(&[(6, 6)]);
    let resolved = resolve_step(CellCoord::new(5, 5), MoveDelta::new(1, 1), walkable);
    assert_eq!(resolved, Some(MoveDelta::new(1, 1)));
}

#[test]
fn horizontal_fallback_suppresses_vertical_axis() {
    let walkable = walkable_set(&[(6, 5)]);
    let resolved = resolve_step(CellCoord::new(5, 5), MoveDelta::new(1, 1), walkable);
    assert_eq!(resolved, Some(MoveDelta::new(1, 0)));
}

#[test]
fn horizontal_fallback_preferred_over_vertical() {
    let walkable = walkable_set(&[(6, 5), (5, 6)]);
    let resolved = resolve_step(CellCoord::new(5, 5), MoveDelta::new(1, 1), walkable);
    assert_eq!(resolved, Some(MoveDelta::new(1, 0)));
}

#[test]
fn vertical_fallback_used_last() {
    let walkable = walkable_set(&[(5, 6)]);
    let resolved = resolve_step(CellCoord::new(5, 5), MoveDelta::new(1, 1), walkable);
    assert_eq!(resolved, Some(MoveDelta::new(0, 1)));
}

#[test]
fn no_walkable_neighbour_yields_no_move() {
    let walkable = walkable_set(&[]);
    let resolved = resolve_step(CellCoord::new(5, 5), MoveDelta::new(1, 1), walkable);
    assert_eq!(resolved, None);
}

#[test]
fn idle_input_never_consults_walkability() {
    let resolved = resolve_step(CellCoord::new(0, 0), MoveDelta::NONE, |_| {
        panic!("walkability must not be probed without input")
    });
    assert_eq!(resolved, None);
}

#[test]
fn full_step_settles_after_tile_size_ticks() {
    let mut offset = SubCellOffset::for_step(MoveDelta::new(-1, 1));
    let mut ticks = 0;
    while MotionState::of(offset) == MotionState::Animating {
        offset = settle(offset);
        ticks += 1;
        assert!(ticks <= TILE_SIZE, "offset failed to settle");
    }

    assert_eq!(ticks, TILE_SIZE);
    assert_eq!(offset, SubCellOffset::ZERO);
}
