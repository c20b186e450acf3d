//! Grid-aligned actors and their per-tick movement state machine.

use tracing::debug;
use worldshift_core::{
    CellCoord, DirectionalInput, EntityKind, Event, MoveDelta, PixelPoint, SubCellOffset,
    TransferKind, WorldTag,
};
use worldshift_system_movement::{resolve_step, settle, MotionState};

use crate::{cell::CellReaction, level::Grid};

/// Actor occupying a level cell.
///
/// The grid position is authoritative and updates the instant a move is
/// committed; the sub-cell offset only tracks the visual slide into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    kind: EntityKind,
    cell: CellCoord,
    offset: SubCellOffset,
    world: WorldTag,
}

impl Entity {
    /// Creates a settled player in world 0 at the provided cell.
    #[must_use]
    pub fn player(cell: CellCoord) -> Self {
        Self {
            kind: EntityKind::Player,
            cell,
            offset: SubCellOffset::ZERO,
            world: WorldTag::default(),
        }
    }

    /// Kind of actor.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Cell the entity logically occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Remaining animation offset.
    #[must_use]
    pub const fn offset(&self) -> SubCellOffset {
        self.offset
    }

    /// World tag the entity carries.
    #[must_use]
    pub const fn world(&self) -> WorldTag {
        self.world
    }

    /// Overwrites the carried world tag.
    pub fn set_world(&mut self, world: WorldTag) {
        self.world = world;
    }

    /// Current motion state.
    #[must_use]
    pub const fn motion(&self) -> MotionState {
        MotionState::of(self.offset)
    }

    /// Upper-left world pixel at which the entity is drawn.
    #[must_use]
    pub const fn draw_origin(&self) -> PixelPoint {
        self.cell.pixel_origin().with_offset(self.offset)
    }

    /// Places the entity at `cell`, cancelling any in-flight animation.
    pub(crate) fn respawn_at(&mut self, cell: CellCoord) {
        self.cell = cell;
        self.offset = SubCellOffset::ZERO;
    }

    /// Advances the entity's state machine by one tick.
    ///
    /// Returns the transfer requested by the cell the entity settled in, if
    /// any. The entity stops processing the tick as soon as a transfer fires.
    pub(crate) fn tick(
        &mut self,
        grid: &Grid,
        input: DirectionalInput,
        out_events: &mut Vec<Event>,
    ) -> Option<TransferKind> {
        if self.motion() == MotionState::Animating {
            self.offset = settle(self.offset);
            if self.motion() == MotionState::Settled {
                out_events.push(Event::PlayerArrived { cell: self.cell });
                if let Some(kind) = self.enter_current_cell(grid, out_events) {
                    return Some(kind);
                }
            }
        }

        if self.motion() == MotionState::Settled {
            let delta = match self.kind {
                EntityKind::Player => input.delta(),
            };
            return self.steer(grid, delta, out_events);
        }

        None
    }

    fn enter_current_cell(
        &mut self,
        grid: &Grid,
        out_events: &mut Vec<Event>,
    ) -> Option<TransferKind> {
        let cell = grid.cell_at(self.cell)?;
        let reaction = cell.on_enter(self);
        self.absorb(reaction, out_events)
    }

    fn steer(
        &mut self,
        grid: &Grid,
        delta: MoveDelta,
        out_events: &mut Vec<Event>,
    ) -> Option<TransferKind> {
        let world = self.world;
        let step = resolve_step(self.cell, delta, |cell| grid.is_walkable(cell, world))?;

        let from = self.cell;
        let exit_reaction = match grid.cell_at(from) {
            Some(source) => source.on_exit(self),
            None => CellReaction::Nothing,
        };

        self.cell = from.offset(step);
        self.offset = SubCellOffset::for_step(step);
        out_events.push(Event::PlayerStepped {
            from,
            to: self.cell,
        });

        self.absorb(exit_reaction, out_events)
    }

    fn absorb(
        &mut self,
        reaction: CellReaction,
        out_events: &mut Vec<Event>,
    ) -> Option<TransferKind> {
        match reaction {
            CellReaction::Nothing => None,
            CellReaction::WorldShifted { from, to } => {
                debug!(%from, %to, cell = %self.cell, "world shifted");
                out_events.push(Event::WorldShifted { from, to });
                None
            }
            CellReaction::Transfer(kind) => Some(kind),
        }
    }
}
