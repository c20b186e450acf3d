#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state management for Worldshift.
//!
//! The [`LevelSet`] owns every parsed level, the index of the active one and
//! the camera centre. All mutation flows through [`apply`]; read access flows
//! through the [`query`] module.

mod cell;
mod entity;
mod error;
mod legend;
mod level;

use tracing::{debug, info};
use worldshift_core::{Command, Event, PixelPoint, TransferKind};

pub use cell::{Cell, CellReaction};
pub use entity::Entity;
pub use error::LoadError;
pub use legend::{GlyphRule, Legend};
pub use level::Level;

/// Ordered collection of levels with the active index and camera position.
#[derive(Clone, Debug)]
pub struct LevelSet {
    levels: Vec<Level>,
    active: usize,
    camera: PixelPoint,
    tick_index: u64,
}

impl LevelSet {
    /// Creates a level set starting on the first level.
    ///
    /// The camera starts centred on the first level's spawn cell.
    pub fn new(levels: Vec<Level>) -> Result<Self, LoadError> {
        let first = levels.first().ok_or(LoadError::NoLevels)?;
        let camera = first.spawn().pixel_center();
        info!(levels = levels.len(), "level set ready");

        Ok(Self {
            levels,
            active: 0,
            camera,
            tick_index: 0,
        })
    }

    fn active_level_mut(&mut self) -> &mut Level {
        &mut self.levels[self.active]
    }

    fn respawn_active(&mut self, out_events: &mut Vec<Event>) {
        let spawn = self.active_level_mut().respawn_player();
        self.camera = spawn.pixel_center();
        out_events.push(Event::PlayerRespawned {
            level: self.active,
            cell: spawn,
        });
    }

    fn transfer(&mut self, kind: TransferKind, out_events: &mut Vec<Event>) {
        let previous = self.active;
        let carried = self.levels[previous].player().world();

        self.active = match kind {
            TransferKind::Next => (previous + 1) % self.levels.len(),
            TransferKind::First => 0,
        };
        debug!(
            from = previous,
            to = self.active,
            ?kind,
            world = %carried,
            level = self.levels[self.active].name().unwrap_or("unnamed"),
            "level transferred"
        );
        out_events.push(Event::LevelTransferred {
            kind,
            from: previous,
            to: self.active,
        });

        self.active_level_mut().player_mut().set_world(carried);
        self.respawn_active(out_events);
    }
}

/// Applies the provided command to the level set, mutating state deterministically.
pub fn apply(level_set: &mut LevelSet, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { input } => {
            level_set.tick_index = level_set.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: level_set.tick_index,
            });

            if let Some(kind) = level_set.active_level_mut().tick(input, out_events) {
                level_set.transfer(kind, out_events);
            }
        }
        Command::PanCamera { center } => {
            if level_set.camera != center {
                level_set.camera = center;
                out_events.push(Event::CameraMoved { center });
            }
        }
        Command::RespawnPlayer => level_set.respawn_active(out_events),
    }
}

/// Query functions that provide read-only access to the level set.
pub mod query {
    use worldshift_core::{
        CellCoord, DrawTarget, PixelPoint, PlayerSnapshot, ViewSize,
    };

    use super::{Cell, Level, LevelSet};

    /// Index of the level currently being played.
    #[must_use]
    pub fn active_index(level_set: &LevelSet) -> usize {
        level_set.active
    }

    /// Number of levels in the set.
    #[must_use]
    pub fn level_count(level_set: &LevelSet) -> usize {
        level_set.levels.len()
    }

    /// Provides read-only access to the level currently being played.
    #[must_use]
    pub fn active_level(level_set: &LevelSet) -> &Level {
        &level_set.levels[level_set.active]
    }

    /// Provides read-only access to every level, dormant ones included.
    #[must_use]
    pub fn levels(level_set: &LevelSet) -> &[Level] {
        &level_set.levels
    }

    /// Captures the active player's state.
    #[must_use]
    pub fn player(level_set: &LevelSet) -> PlayerSnapshot {
        let player = active_level(level_set).player();
        PlayerSnapshot {
            cell: player.cell(),
            offset: player.offset(),
            world: player.world(),
        }
    }

    /// World pixel the camera is centred on.
    #[must_use]
    pub fn camera(level_set: &LevelSet) -> PixelPoint {
        level_set.camera
    }

    /// Looks up a cell in the active level.
    #[must_use]
    pub fn cell_at(level_set: &LevelSet, coord: CellCoord) -> Option<&Cell> {
        active_level(level_set).cell_at(coord)
    }

    /// Number of logic ticks processed so far.
    #[must_use]
    pub fn tick_index(level_set: &LevelSet) -> u64 {
        level_set.tick_index
    }

    /// Draws the active level as seen through a viewport of `view` pixels.
    ///
    /// World-dependent cells use the active player's world tag.
    pub fn draw_active<T>(level_set: &LevelSet, view: ViewSize, target: &mut T)
    where
        T: DrawTarget + ?Sized,
    {
        let level = active_level(level_set);
        let scroll = view.scroll_offset(level_set.camera);
        level.draw(target, scroll, level.player().world());
    }
}
