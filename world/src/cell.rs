//! Grid occupants and their world-dependent behaviour.

use std::collections::{BTreeMap, BTreeSet};

use worldshift_core::{CellAppearance, TransferKind, WorldTag};

use crate::entity::Entity;

/// Single grid occupant. Void slots are represented by the absence of a cell.
///
/// Variant data is fixed at construction, so solidity is a pure function of
/// the variant and the world tag being tested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    /// Walkable ground.
    Floor,
    /// Permanently solid wall.
    Wall,
    /// Door that only lets the listed worlds through.
    WorldAccept {
        /// Worlds for which the door is open.
        accepted: BTreeSet<WorldTag>,
    },
    /// Pad that rewrites the world tag of entities that come to rest on it.
    WorldChange {
        /// Mapping from the world carried on entry to the world carried afterwards.
        transitions: BTreeMap<WorldTag, WorldTag>,
    },
    /// Pad that switches the active level once entered.
    LevelTransfer {
        /// Destination selected by the pad.
        kind: TransferKind,
    },
}

/// Side effect reported by a cell hook for the level set to act upon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellReaction {
    /// The hook had no observable effect.
    Nothing,
    /// The entity's world tag was rewritten.
    WorldShifted {
        /// World tag carried before the hook ran.
        from: WorldTag,
        /// World tag carried after the hook ran.
        to: WorldTag,
    },
    /// The active level must switch.
    Transfer(TransferKind),
}

impl Cell {
    /// Builds a door open for exactly the provided worlds.
    #[must_use]
    pub fn world_accept<I>(worlds: I) -> Self
    where
        I: IntoIterator<Item = WorldTag>,
    {
        Self::WorldAccept {
            accepted: worlds.into_iter().collect(),
        }
    }

    /// Builds a world-change pad from `(from, to)` pairs.
    #[must_use]
    pub fn world_change<I>(transitions: I) -> Self
    where
        I: IntoIterator<Item = (WorldTag, WorldTag)>,
    {
        Self::WorldChange {
            transitions: transitions.into_iter().collect(),
        }
    }

    /// Intrinsic solidity of the variant, ignoring any world gating.
    #[must_use]
    pub const fn solid_default(&self) -> bool {
        matches!(self, Self::Wall | Self::WorldAccept { .. })
    }

    /// Reports whether an entity carrying `world` is blocked by this cell.
    #[must_use]
    pub fn is_solid(&self, world: WorldTag) -> bool {
        match self {
            Self::WorldAccept { accepted } => !accepted.contains(&world),
            Self::Floor | Self::Wall | Self::WorldChange { .. } | Self::LevelTransfer { .. } => {
                self.solid_default()
            }
        }
    }

    /// Hook fired once an entity's animation settles inside this cell.
    pub fn on_enter(&self, entity: &mut Entity) -> CellReaction {
        match self {
            Self::WorldChange { transitions } => {
                let from = entity.world();
                match transitions.get(&from) {
                    Some(&to) => {
                        entity.set_world(to);
                        CellReaction::WorldShifted { from, to }
                    }
                    None => CellReaction::Nothing,
                }
            }
            Self::LevelTransfer { kind } => CellReaction::Transfer(*kind),
            Self::Floor | Self::Wall | Self::WorldAccept { .. } => CellReaction::Nothing,
        }
    }

    /// Hook fired the moment an entity commits to leaving this cell.
    pub fn on_exit(&self, _entity: &mut Entity) -> CellReaction {
        CellReaction::Nothing
    }

    /// Visual selector for this cell as seen from `world`.
    #[must_use]
    pub fn appearance(&self, world: WorldTag) -> CellAppearance {
        match self {
            Self::Floor => CellAppearance::Floor,
            Self::Wall => CellAppearance::Wall,
            Self::WorldAccept { accepted } => {
                if accepted.contains(&world) {
                    CellAppearance::DoorOpen
                } else {
                    CellAppearance::DoorLocked
                }
            }
            Self::WorldChange { transitions } => {
                if transitions.contains_key(&world) {
                    CellAppearance::Portal
                } else {
                    CellAppearance::DormantPortal
                }
            }
            Self::LevelTransfer { kind } => CellAppearance::Transfer(*kind),
        }
    }
}
