#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Worldshift engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative level set, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical title shown by adapters when the experience boots.
pub const GAME_TITLE: &str = "Worldshift";

/// Side length of a single square tile measured in pixels.
///
/// Sub-cell animation offsets span `-TILE_SIZE..=TILE_SIZE` and decay by one
/// unit per tick, so a full step takes `TILE_SIZE` ticks to settle.
pub const TILE_SIZE: i32 = 16;

/// Commands that express all permissible level set mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the active level by exactly one fixed logic tick.
    Tick {
        /// Directional keys held while the tick was sampled.
        input: DirectionalInput,
    },
    /// Moves the camera so the view is centred on the provided pixel.
    PanCamera {
        /// World-space pixel the view should be centred on.
        center: PixelPoint,
    },
    /// Returns the active level's player to its spawn cell.
    RespawnPlayer,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Indicates that the simulation advanced by one logic tick.
    TimeAdvanced {
        /// Number of ticks processed since the level set was created.
        tick: u64,
    },
    /// Confirms that the player committed a move into a neighbouring cell.
    PlayerStepped {
        /// Cell the player occupied before the move.
        from: CellCoord,
        /// Cell the player occupies logically after the move.
        to: CellCoord,
    },
    /// Reports that the player's animation settled inside its current cell.
    PlayerArrived {
        /// Cell the player came to rest in.
        cell: CellCoord,
    },
    /// Reports that entering a cell rewrote the player's world tag.
    WorldShifted {
        /// World tag carried before entering the cell.
        from: WorldTag,
        /// World tag carried after entering the cell.
        to: WorldTag,
    },
    /// Announces that the active level changed.
    LevelTransferred {
        /// Kind of transfer cell that triggered the switch.
        kind: TransferKind,
        /// Index of the level that was active before the switch.
        from: usize,
        /// Index of the level that is active after the switch.
        to: usize,
    },
    /// Confirms that the active player was returned to its spawn cell.
    PlayerRespawned {
        /// Index of the level whose player respawned.
        level: usize,
        /// Spawn cell the player now occupies.
        cell: CellCoord,
    },
    /// Confirms that the camera centre moved.
    CameraMoved {
        /// Pixel the camera is now centred on.
        center: PixelPoint,
    },
}

/// Integer state carried by the player that gates access through doors.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WorldTag(i32);

impl WorldTag {
    /// Creates a new world tag with the provided numeric value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tag.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for WorldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "world {}", self.0)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so that neighbours of edge cells can be probed
/// without wrapping; lookups outside the grid simply miss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the coordinate displaced by the provided delta.
    #[must_use]
    pub const fn offset(self, delta: MoveDelta) -> Self {
        Self {
            column: self.column + delta.dx(),
            row: self.row + delta.dy(),
        }
    }

    /// Pixel position of the cell's upper-left corner in world space.
    #[must_use]
    pub const fn pixel_origin(self) -> PixelPoint {
        PixelPoint::new(self.column * TILE_SIZE, self.row * TILE_SIZE)
    }

    /// Pixel position of the cell's centre in world space.
    #[must_use]
    pub const fn pixel_center(self) -> PixelPoint {
        self.pixel_origin().translated(TILE_SIZE / 2, TILE_SIZE / 2)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Single-unit displacement along each axis, restricted to `-1..=1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MoveDelta {
    dx: i32,
    dy: i32,
}

impl MoveDelta {
    /// Delta that leaves a coordinate unchanged.
    pub const NONE: Self = Self { dx: 0, dy: 0 };

    /// Creates a new delta, clamping each axis to a single unit.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self {
            dx: clamp_unit(dx),
            dy: clamp_unit(dy),
        }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Vertical component.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }

    /// Reports whether the delta moves nowhere.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Reports whether the delta moves along both axes at once.
    #[must_use]
    pub const fn is_diagonal(&self) -> bool {
        self.dx != 0 && self.dy != 0
    }

    /// Horizontal component alone, with the vertical axis suppressed.
    #[must_use]
    pub const fn horizontal(&self) -> Self {
        Self { dx: self.dx, dy: 0 }
    }

    /// Vertical component alone, with the horizontal axis suppressed.
    #[must_use]
    pub const fn vertical(&self) -> Self {
        Self { dx: 0, dy: self.dy }
    }
}

const fn clamp_unit(value: i32) -> i32 {
    if value > 0 {
        1
    } else if value < 0 {
        -1
    } else {
        0
    }
}

/// Directional keys held during a single logic tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalInput {
    /// Whether the "up" key is held.
    pub up: bool,
    /// Whether the "down" key is held.
    pub down: bool,
    /// Whether the "left" key is held.
    pub left: bool,
    /// Whether the "right" key is held.
    pub right: bool,
}

impl DirectionalInput {
    /// Input with no keys held.
    pub const IDLE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Converts the held keys into a movement delta.
    ///
    /// Opposing keys cancel out on their axis.
    #[must_use]
    pub const fn delta(&self) -> MoveDelta {
        let dx = self.right as i32 - self.left as i32;
        let dy = self.down as i32 - self.up as i32;
        MoveDelta::new(dx, dy)
    }
}

/// Pixel-level animation offset applied to an entity while it slides into a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SubCellOffset {
    x: i32,
    y: i32,
}

impl SubCellOffset {
    /// Offset of an entity resting exactly on its cell.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Creates a new offset, clamping each axis to a single tile.
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x: x.clamp(-TILE_SIZE, TILE_SIZE),
            y: y.clamp(-TILE_SIZE, TILE_SIZE),
        }
    }

    /// Offset that places an entity back at its previous cell after committing `delta`.
    #[must_use]
    pub fn for_step(delta: MoveDelta) -> Self {
        Self::new(-TILE_SIZE * delta.dx(), -TILE_SIZE * delta.dy())
    }

    /// Horizontal offset in pixels.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical offset in pixels.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Reports whether both axes have reached zero.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// Pixel position expressed in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    x: i32,
    y: i32,
}

impl PixelPoint {
    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the point moved by the provided amounts.
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns the point displaced by a sub-cell offset.
    #[must_use]
    pub const fn with_offset(self, offset: SubCellOffset) -> Self {
        self.translated(offset.x(), offset.y())
    }

    /// Returns the point expressed relative to the provided origin.
    #[must_use]
    pub const fn relative_to(self, origin: PixelPoint) -> Self {
        Self {
            x: self.x - origin.x,
            y: self.y - origin.y,
        }
    }
}

/// Dimensions of the visible viewport measured in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewSize {
    width: i32,
    height: i32,
}

impl ViewSize {
    /// Creates a new viewport size. Negative dimensions collapse to zero.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// Width of the viewport.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height of the viewport.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Scroll offset (upper-left world pixel) for a view centred on `center`.
    #[must_use]
    pub const fn scroll_offset(&self, center: PixelPoint) -> PixelPoint {
        center.translated(-(self.width / 2), -(self.height / 2))
    }
}

impl Default for ViewSize {
    fn default() -> Self {
        Self {
            width: 320,
            height: 200,
        }
    }
}

/// Destination selected by a level transfer cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferKind {
    /// Advances to the following level, wrapping to the first after the last.
    Next,
    /// Returns to the first level.
    First,
}

/// Kinds of actors that may inhabit a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The player-controlled entity.
    Player,
}

/// Visual selector describing how a cell should look under a given world tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellAppearance {
    /// Walkable ground.
    Floor,
    /// Permanently solid wall.
    Wall,
    /// World-gated door that the current world may pass through.
    DoorOpen,
    /// World-gated door that blocks the current world.
    DoorLocked,
    /// World-change pad that would rewrite the current world tag.
    Portal,
    /// World-change pad with no mapping for the current world tag.
    DormantPortal,
    /// Level transfer pad.
    Transfer(TransferKind),
}

/// Immutable representation of the active player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Grid cell the player logically occupies.
    pub cell: CellCoord,
    /// Animation offset still to be consumed before the player settles.
    pub offset: SubCellOffset,
    /// World tag the player currently carries.
    pub world: WorldTag,
}

impl PlayerSnapshot {
    /// Reports whether the player rests exactly on its cell.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.offset.is_settled()
    }

    /// Upper-left pixel at which the player's tile is drawn.
    #[must_use]
    pub const fn draw_origin(&self) -> PixelPoint {
        self.cell.pixel_origin().with_offset(self.offset)
    }

    /// Pixel at the centre of the player's drawn tile.
    #[must_use]
    pub const fn draw_center(&self) -> PixelPoint {
        self.draw_origin().translated(TILE_SIZE / 2, TILE_SIZE / 2)
    }
}

/// Surface that receives the level's draw dispatch.
///
/// Levels call [`DrawTarget::draw_cell`] for every non-void cell in row-major
/// order, then [`DrawTarget::draw_entity`] for every entity in list order.
/// Positions are already shifted by the camera scroll offset.
pub trait DrawTarget {
    /// Receives a single non-void cell.
    fn draw_cell(&mut self, position: PixelPoint, cell: CellCoord, appearance: CellAppearance);

    /// Receives a single entity.
    fn draw_entity(&mut self, position: PixelPoint, kind: EntityKind, world: WorldTag);
}
