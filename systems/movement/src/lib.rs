#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement policy shared by every grid-aligned entity.
//!
//! The policy is pure: it never touches level state directly. Callers supply a
//! walkability predicate and receive back the delta that should be committed,
//! or the offset an animating entity should carry into the next tick.

use worldshift_core::{CellCoord, MoveDelta, SubCellOffset};

/// Motion state of a grid-aligned entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MotionState {
    /// The entity rests exactly on its cell and may accept new input.
    Settled,
    /// The entity is still sliding into the cell it committed to.
    Animating,
}

impl MotionState {
    /// Classifies the provided offset.
    #[must_use]
    pub const fn of(offset: SubCellOffset) -> Self {
        if offset.is_settled() {
            Self::Settled
        } else {
            Self::Animating
        }
    }
}

/// Moves each axis of the offset one unit toward zero, independently.
#[must_use]
pub fn settle(offset: SubCellOffset) -> SubCellOffset {
    SubCellOffset::new(step_toward_zero(offset.x()), step_toward_zero(offset.y()))
}

fn step_toward_zero(value: i32) -> i32 {
    value - value.signum()
}

/// Resolves the delta an entity at `origin` should commit for the requested `delta`.
///
/// Candidates are tried in priority order: the full diagonal, then the
/// horizontal component alone, then the vertical component alone. The first
/// candidate whose target satisfies `is_walkable` wins. Returns `None` when
/// no input was requested or every candidate is blocked.
#[must_use]
pub fn resolve_step<F>(origin: CellCoord, delta: MoveDelta, is_walkable: F) -> Option<MoveDelta>
where
    F: Fn(CellCoord) -> bool,
{
    if delta.is_none() {
        return None;
    }

    candidates(delta)
        .into_iter()
        .flatten()
        .find(|candidate| is_walkable(origin.offset(*candidate)))
}

fn candidates(delta: MoveDelta) -> [Option<MoveDelta>; 3] {
    let diagonal = delta.is_diagonal().then_some(delta);
    let horizontal = (delta.dx() != 0).then(|| delta.horizontal());
    let vertical = (delta.dy() != 0).then(|| delta.vertical());
    [diagonal, horizontal, vertical]
}
