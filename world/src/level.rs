//! Levels: a grid of cells, the entities inhabiting it, and the parser that builds both.

use worldshift_core::{
    CellCoord, DirectionalInput, DrawTarget, Event, PixelPoint, TransferKind, WorldTag, TILE_SIZE,
};

use crate::{
    cell::Cell,
    entity::Entity,
    error::LoadError,
    legend::{GlyphRule, Legend},
};

/// Widest or tallest level whose cells still have pixel coordinates in `i32`.
pub(crate) const MAX_EXTENT: usize = (i32::MAX / TILE_SIZE) as usize;

/// Dense row-major storage of optional cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Grid {
    columns: usize,
    rows: usize,
    cells: Vec<Option<Cell>>,
}

impl Grid {
    pub(crate) fn cell_at(&self, coord: CellCoord) -> Option<&Cell> {
        self.index(coord)
            .and_then(|index| self.cells.get(index))
            .and_then(Option::as_ref)
    }

    /// Missing cells are never walkable.
    pub(crate) fn is_walkable(&self, coord: CellCoord, world: WorldTag) -> bool {
        self.cell_at(coord).is_some_and(|cell| !cell.is_solid(world))
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        let column = usize::try_from(coord.column()).ok()?;
        let row = usize::try_from(coord.row()).ok()?;
        if column < self.columns && row < self.rows {
            Some(row * self.columns + column)
        } else {
            None
        }
    }

    fn iter(&self) -> impl Iterator<Item = (CellCoord, &Cell)> {
        let columns = self.columns;
        self.cells.iter().enumerate().filter_map(move |(index, slot)| {
            let cell = slot.as_ref()?;
            let column = i32::try_from(index % columns).ok()?;
            let row = i32::try_from(index / columns).ok()?;
            Some((CellCoord::new(column, row), cell))
        })
    }
}

/// A single playable level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    name: Option<String>,
    grid: Grid,
    entities: Vec<Entity>,
    player: usize,
    spawn: CellCoord,
}

impl Level {
    /// Parses a rectangular block of glyph rows into a level.
    ///
    /// Empty lines before the first row and after the last row are ignored.
    /// Lines holding only spaces are rows like any other.
    /// Every other row must be as wide as the first, every glyph must be known
    /// to `legend`, and exactly one player marker must be present.
    pub fn parse(source: &str, legend: &Legend) -> Result<Self, LoadError> {
        let mut lines: Vec<&str> = source.lines().collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            let _ = lines.pop();
        }
        let first_row = lines
            .iter()
            .position(|line| !line.is_empty())
            .ok_or(LoadError::EmptyLevel)?;
        let lines = &lines[first_row..];

        let columns = lines[0].chars().count();
        let rows = lines.len();
        if columns > MAX_EXTENT || rows > MAX_EXTENT {
            return Err(LoadError::LevelTooLarge { columns, rows });
        }

        let mut cells = Vec::with_capacity(columns * rows);
        let mut spawn: Option<CellCoord> = None;

        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != columns {
                return Err(LoadError::RaggedRow {
                    row,
                    expected: columns,
                    found,
                });
            }

            for (column, glyph) in line.chars().enumerate() {
                let rule = legend
                    .rule(glyph)
                    .ok_or(LoadError::UnrecognizedGlyph { glyph, column, row })?;

                if *rule == GlyphRule::PlayerSpawn {
                    let here = CellCoord::new(column as i32, row as i32);
                    if let Some(first) = spawn {
                        return Err(LoadError::DuplicatePlayer {
                            first,
                            second: here,
                        });
                    }
                    spawn = Some(here);
                }

                cells.push(rule.instantiate());
            }
        }

        let spawn = spawn.ok_or(LoadError::MissingPlayer)?;

        Ok(Self {
            name: None,
            grid: Grid {
                columns,
                rows,
                cells,
            },
            entities: vec![Entity::player(spawn)],
            player: 0,
            spawn,
        })
    }

    /// Attaches a human-readable name used in logs and summaries.
    #[must_use]
    pub fn with_name<T>(mut self, name: T) -> Self
    where
        T: Into<String>,
    {
        self.name = Some(name.into());
        self
    }

    /// Human-readable name, if one was attached.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.grid.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.grid.rows
    }

    /// Returns the cell at `coord`, or `None` for void and out-of-grid coordinates.
    #[must_use]
    pub fn cell_at(&self, coord: CellCoord) -> Option<&Cell> {
        self.grid.cell_at(coord)
    }

    /// Reports whether an entity carrying `world` may enter `coord`.
    #[must_use]
    pub fn is_walkable(&self, coord: CellCoord, world: WorldTag) -> bool {
        self.grid.is_walkable(coord, world)
    }

    /// Entities in draw order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// The level's player.
    #[must_use]
    pub fn player(&self) -> &Entity {
        &self.entities[self.player]
    }

    pub(crate) fn player_mut(&mut self) -> &mut Entity {
        &mut self.entities[self.player]
    }

    /// Cell recorded from the player marker.
    #[must_use]
    pub const fn spawn(&self) -> CellCoord {
        self.spawn
    }

    /// Advances every entity once, in list order.
    ///
    /// Returns the level transfer requested during the tick. The caller owns
    /// the level ordering and must carry the transfer out; remaining entities
    /// are not ticked once a transfer fires.
    pub fn tick(
        &mut self,
        input: DirectionalInput,
        out_events: &mut Vec<Event>,
    ) -> Option<TransferKind> {
        let Self { grid, entities, .. } = self;
        let grid: &Grid = grid;
        entities
            .iter_mut()
            .find_map(|entity| entity.tick(grid, input, out_events))
    }

    /// Dispatches every non-void cell, then every entity, to `target`.
    ///
    /// `scroll` is the world pixel drawn at the target's upper-left corner and
    /// `world` selects the visual of world-dependent cells.
    pub fn draw<T>(&self, target: &mut T, scroll: PixelPoint, world: WorldTag)
    where
        T: DrawTarget + ?Sized,
    {
        for (coord, cell) in self.grid.iter() {
            let position = coord.pixel_origin().relative_to(scroll);
            target.draw_cell(position, coord, cell.appearance(world));
        }

        for entity in &self.entities {
            let position = entity.draw_origin().relative_to(scroll);
            target.draw_entity(position, entity.kind(), entity.world());
        }
    }

    /// Returns the player to the spawn cell and cancels any in-flight animation.
    ///
    /// The carried world tag is left untouched.
    pub fn respawn_player(&mut self) -> CellCoord {
        let spawn = self.spawn;
        self.player_mut().respawn_at(spawn);
        spawn
    }
}
