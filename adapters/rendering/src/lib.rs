#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Worldshift adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};
use worldshift_core::{
    CellAppearance, CellCoord, DirectionalInput, DrawTarget, EntityKind, PixelPoint,
    TransferKind, ViewSize, WorldTag, TILE_SIZE,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Flat colors assigned to every cell appearance and entity kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Walkable ground.
    pub floor: Color,
    /// Solid wall.
    pub wall: Color,
    /// Door the current world may pass.
    pub door_open: Color,
    /// Door blocking the current world.
    pub door_locked: Color,
    /// World-change pad that reacts to the current world.
    pub portal: Color,
    /// World-change pad with no mapping for the current world.
    pub dormant_portal: Color,
    /// Pad leading to the next level.
    pub transfer_next: Color,
    /// Pad leading back to the first level.
    pub transfer_first: Color,
    /// Player body.
    pub player: Color,
    /// Background behind void cells.
    pub clear: Color,
    /// Status line text.
    pub status_text: Color,
}

impl Palette {
    /// Color used to fill a cell with the provided appearance.
    #[must_use]
    pub const fn cell(&self, appearance: CellAppearance) -> Color {
        match appearance {
            CellAppearance::Floor => self.floor,
            CellAppearance::Wall => self.wall,
            CellAppearance::DoorOpen => self.door_open,
            CellAppearance::DoorLocked => self.door_locked,
            CellAppearance::Portal => self.portal,
            CellAppearance::DormantPortal => self.dormant_portal,
            CellAppearance::Transfer(TransferKind::Next) => self.transfer_next,
            CellAppearance::Transfer(TransferKind::First) => self.transfer_first,
        }
    }

    /// Color used to fill an entity body.
    ///
    /// Players outside world 0 are tinted lighter.
    #[must_use]
    pub fn entity(&self, kind: EntityKind, world: WorldTag) -> Color {
        let base = match kind {
            EntityKind::Player => self.player,
        };
        if world == WorldTag::default() {
            base
        } else {
            base.lighten(0.5)
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            floor: Color::from_rgb_u8(170, 100, 85),
            wall: Color::from_rgb_u8(55, 55, 55),
            door_open: Color::from_rgb_u8(0, 255, 0),
            door_locked: Color::from_rgb_u8(255, 0, 0),
            portal: Color::from_rgb_u8(40, 0, 64),
            dormant_portal: Color::from_rgb_u8(170, 100, 85),
            transfer_next: Color::from_rgb_u8(255, 200, 0),
            transfer_first: Color::from_rgb_u8(255, 120, 0),
            player: Color::from_rgb_u8(0, 255, 255),
            clear: Color::from_rgb_u8(0, 0, 170),
            status_text: Color::from_rgb_u8(255, 255, 255),
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Directional keys held on this frame.
    pub directional: DirectionalInput,
    /// Whether the adapter detected a respawn request on this frame.
    pub respawn: bool,
}

/// Cell queued for drawing, positioned in view pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneCell {
    /// Upper-left corner relative to the view origin.
    pub position: Vec2,
    /// Grid coordinate the cell belongs to.
    pub coord: CellCoord,
    /// Visual selected for the current world.
    pub appearance: CellAppearance,
}

/// Entity queued for drawing, positioned in view pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEntity {
    /// Upper-left corner of the entity's tile relative to the view origin.
    pub position: Vec2,
    /// Kind of actor.
    pub kind: EntityKind,
    /// World tag the actor carries.
    pub world: WorldTag,
}

impl SceneEntity {
    /// Inset of the entity body from its tile's upper-left corner.
    pub const BODY_INSET: f32 = 4.0;
    /// Side length of the square entity body.
    pub const BODY_EDGE: f32 = 8.0;

    /// Upper-left corner and size of the entity body in view pixels.
    #[must_use]
    pub fn body(&self) -> (Vec2, Vec2) {
        (
            self.position + Vec2::splat(Self::BODY_INSET),
            Vec2::splat(Self::BODY_EDGE),
        )
    }
}

/// Snapshot of everything an adapter needs to draw a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Size of the logical viewport in pixels.
    pub view: ViewSize,
    /// Side length of a single tile in pixels.
    pub tile_length: f32,
    /// Cells in draw order.
    pub cells: Vec<SceneCell>,
    /// Entities in draw order, drawn over the cells.
    pub entities: Vec<SceneEntity>,
    /// World tag used to pick world-dependent visuals.
    pub world: WorldTag,
    /// Index of the level being shown.
    pub level_index: usize,
    /// Number of levels in the running set.
    pub level_count: usize,
    /// Name of the level being shown, if it has one.
    pub level_name: Option<String>,
}

impl Scene {
    /// Creates an empty scene for the provided viewport.
    #[must_use]
    pub fn new(view: ViewSize) -> Self {
        Self {
            view,
            tile_length: TILE_SIZE as f32,
            cells: Vec::new(),
            entities: Vec::new(),
            world: WorldTag::default(),
            level_index: 0,
            level_count: 0,
            level_name: None,
        }
    }

    /// Clears the draw lists and returns a [`DrawTarget`] that refills them.
    pub fn record(&mut self) -> SceneRecorder<'_> {
        self.cells.clear();
        self.entities.clear();
        SceneRecorder { scene: self }
    }

    /// Short status line describing the level being shown.
    #[must_use]
    pub fn status_line(&self) -> String {
        let position = format!(
            "level {}/{}",
            self.level_index + 1,
            self.level_count.max(1)
        );
        match &self.level_name {
            Some(name) => format!("{position} {name} ({})", self.world),
            None => format!("{position} ({})", self.world),
        }
    }
}

/// Draw target that appends dispatched cells and entities to a [`Scene`].
#[derive(Debug)]
pub struct SceneRecorder<'a> {
    scene: &'a mut Scene,
}

impl DrawTarget for SceneRecorder<'_> {
    fn draw_cell(&mut self, position: PixelPoint, cell: CellCoord, appearance: CellAppearance) {
        self.scene.cells.push(SceneCell {
            position: to_vec2(position),
            coord: cell,
            appearance,
        });
    }

    fn draw_entity(&mut self, position: PixelPoint, kind: EntityKind, world: WorldTag) {
        self.scene.entities.push(SceneEntity {
            position: to_vec2(position),
            kind,
            world,
        });
    }
}

fn to_vec2(point: PixelPoint) -> Vec2 {
    Vec2::new(point.x() as f32, point.y() as f32)
}

/// Describes the data required to present a scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used for the window.
    pub window_title: String,
    /// Colors used for cells, entities and the background.
    pub palette: Palette,
    /// Magnification applied to the logical viewport.
    pub scale: f32,
    /// Scene that should be drawn.
    pub scene: Scene,
}

impl Presentation {
    /// Creates a new presentation descriptor.
    ///
    /// The scale must be a finite positive number.
    pub fn new<T>(
        window_title: T,
        palette: Palette,
        scale: f32,
        scene: Scene,
    ) -> Result<Self, RenderingError>
    where
        T: Into<String>,
    {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(RenderingError::InvalidScale { scale });
        }

        Ok(Self {
            window_title: window_title.into(),
            palette,
            scale,
            scene,
        })
    }

    /// Window size in screen pixels.
    #[must_use]
    pub fn window_size(&self) -> Vec2 {
        Vec2::new(
            self.scene.view.width() as f32,
            self.scene.view.height() as f32,
        ) * self.scale
    }
}

/// Rendering backend capable of presenting Worldshift scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the elapsed frame time,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Scale must be finite and positive to produce a visible window.
    InvalidScale {
        /// Provided scale that failed validation.
        scale: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScale { scale } => {
                write!(f, "scale must be a positive number (received {scale})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_distinguishes_door_states() {
        let palette = Palette::default();
        assert_ne!(
            palette.cell(CellAppearance::DoorOpen),
            palette.cell(CellAppearance::DoorLocked)
        );
        assert_eq!(
            palette.cell(CellAppearance::DormantPortal),
            palette.cell(CellAppearance::Floor)
        );
    }

    #[test]
    fn player_tint_follows_world() {
        let palette = Palette::default();
        assert_eq!(
            palette.entity(EntityKind::Player, WorldTag::default()),
            palette.player
        );
        assert_ne!(
            palette.entity(EntityKind::Player, WorldTag::new(2)),
            palette.player
        );
    }

    #[test]
    fn recorder_replaces_previous_frame() {
        let mut scene = Scene::new(ViewSize::default());
        {
            let mut recorder = scene.record();
            recorder.draw_cell(
                PixelPoint::new(0, 0),
                CellCoord::new(0, 0),
                CellAppearance::Wall,
            );
            recorder.draw_entity(PixelPoint::new(16, 0), EntityKind::Player, WorldTag::new(2));
        }
        assert_eq!(scene.cells.len(), 1);
        assert_eq!(scene.entities.len(), 1);

        {
            let mut recorder = scene.record();
            recorder.draw_cell(
                PixelPoint::new(-16, 32),
                CellCoord::new(3, 4),
                CellAppearance::Floor,
            );
        }
        assert_eq!(
            scene.cells,
            vec![SceneCell {
                position: Vec2::new(-16.0, 32.0),
                coord: CellCoord::new(3, 4),
                appearance: CellAppearance::Floor,
            }]
        );
        assert!(scene.entities.is_empty());
    }

    #[test]
    fn entity_body_sits_inside_tile() {
        let entity = SceneEntity {
            position: Vec2::new(16.0, 32.0),
            kind: EntityKind::Player,
            world: WorldTag::default(),
        };
        assert_eq!(entity.body(), (Vec2::new(20.0, 36.0), Vec2::splat(8.0)));
    }

    #[test]
    fn presentation_rejects_non_positive_scale() {
        let scene = Scene::new(ViewSize::default());
        let error = Presentation::new("Worldshift", Palette::default(), 0.0, scene)
            .expect_err("zero scale must be rejected");
        assert_eq!(error, RenderingError::InvalidScale { scale: 0.0 });
    }

    #[test]
    fn window_size_scales_view() {
        let scene = Scene::new(ViewSize::new(320, 200));
        let presentation = Presentation::new("Worldshift", Palette::default(), 3.0, scene)
            .expect("valid scale");
        assert_eq!(presentation.window_size(), Vec2::new(960.0, 600.0));
    }

    #[test]
    fn status_line_reports_level_and_world() {
        let mut scene = Scene::new(ViewSize::default());
        scene.level_index = 1;
        scene.level_count = 3;
        scene.world = WorldTag::new(2);
        scene.level_name = Some("doors".to_owned());
        assert_eq!(scene.status_line(), "level 2/3 doors (world 2)");
    }
}
