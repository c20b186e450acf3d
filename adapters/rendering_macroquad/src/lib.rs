#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad window for Worldshift.
//!
//! The logical viewport is scaled uniformly to fit the window and letterboxed
//! with the palette's clear color. Cells and entities are flat rectangles,
//! with the scene's status line printed in the top-left corner of the view.
//! Macroquad is built without its `audio` feature since the game is silent.

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_down, is_key_pressed, is_key_released, KeyCode};
use std::time::{Duration, Instant};
use tracing::info;
use worldshift_core::{DirectionalInput, ViewSize};
use worldshift_rendering::{
    Color, FrameInput, Palette, Presentation, RenderingBackend, Scene, SceneEntity,
};

/// Maps held keys to directional input. Arrow keys and WASD are equivalent.
pub fn directional_from_keys<F>(is_down: F) -> DirectionalInput
where
    F: Fn(KeyCode) -> bool,
{
    DirectionalInput {
        up: is_down(KeyCode::Up) || is_down(KeyCode::W),
        down: is_down(KeyCode::Down) || is_down(KeyCode::S),
        left: is_down(KeyCode::Left) || is_down(KeyCode::A),
        right: is_down(KeyCode::Right) || is_down(KeyCode::D),
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` released after being pressed quits the game loop.
    quit_requested: bool,
    /// `R` sends the player back to the level's spawn.
    respawn: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_released(KeyCode::Escape),
            respawn: is_key_pressed(KeyCode::R),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    render: Duration,
}

/// Height of status line glyphs in view pixels.
const STATUS_FONT_SIZE: f32 = 8.0;
/// Gap between the view's corner and the status line in view pixels.
const STATUS_MARGIN: f32 = 4.0;

/// Frame timing averaged over roughly one second of frames.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    simulation: Duration,
    render: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    avg_simulation: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Adds a frame and, once a second has passed, returns the averages and starts over.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation += breakdown.simulation;
        self.render += breakdown.render;

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let Self {
            elapsed,
            frames,
            simulation,
            render,
        } = std::mem::take(self);
        Some(FpsMetrics {
            per_second: frames as f32 / elapsed.as_secs_f32(),
            avg_simulation: simulation / frames,
            avg_render: render / frames,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let window_size = presentation.window_size();
        let Presentation {
            window_title,
            palette,
            scene,
            ..
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: window_size.x.round() as i32,
            window_height: window_size.y.round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(palette.clear);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = FrameInput {
                    directional: directional_from_keys(is_key_down),
                    respawn: keyboard.respawn,
                };

                let simulation_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let simulation = simulation_start.elapsed();

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                let metrics = SceneMetrics::from_view(
                    scene.view,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_cells(&scene, &palette, &metrics);
                draw_entities(&scene, &palette, &metrics);
                draw_letterbox(&metrics, palette.clear);
                draw_status_line(&scene, &palette, &metrics);
                let render = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation,
                    render,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        avg_simulation,
                        avg_render,
                    }) = fps_metrics
                    {
                        info!(
                            fps = format_args!("{per_second:.2}"),
                            sim_ms = avg_simulation.as_secs_f64() * 1_000.0,
                            render_ms = avg_render.as_secs_f64() * 1_000.0,
                            "frame timing"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Placement of the logical viewport inside the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
    view_size: Vec2,
    screen_size: Vec2,
}

impl SceneMetrics {
    fn from_view(view: ViewSize, screen_width: f32, screen_height: f32) -> Self {
        let view_width = view.width() as f32;
        let view_height = view.height() as f32;
        let scale = if view_width <= f32::EPSILON || view_height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / view_width).min(screen_height / view_height)
        };

        let view_size = Vec2::new(view_width, view_height) * scale;
        let screen_size = Vec2::new(screen_width, screen_height);
        let offset = ((screen_size - view_size) * 0.5).max(Vec2::ZERO);

        Self {
            scale,
            offset,
            view_size,
            screen_size,
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        self.offset + position * self.scale
    }

    /// Reports whether a rectangle in view pixels overlaps the visible area.
    fn is_visible(&self, position: Vec2, size: Vec2) -> bool {
        let unscaled = self.view_size / self.scale.max(f32::EPSILON);
        position.x < unscaled.x
            && position.y < unscaled.y
            && position.x + size.x > 0.0
            && position.y + size.y > 0.0
    }

    /// Screen position of the status line's baseline.
    fn status_baseline(&self) -> Vec2 {
        self.to_screen(Vec2::new(STATUS_MARGIN, STATUS_MARGIN + STATUS_FONT_SIZE))
    }

    /// Rectangles covering the window outside the viewport as `(origin, size)`.
    fn letterbox(&self) -> [(Vec2, Vec2); 4] {
        let right_edge = self.offset.x + self.view_size.x;
        let bottom_edge = self.offset.y + self.view_size.y;
        [
            (Vec2::ZERO, Vec2::new(self.screen_size.x, self.offset.y)),
            (
                Vec2::new(0.0, bottom_edge),
                Vec2::new(self.screen_size.x, self.screen_size.y - bottom_edge),
            ),
            (Vec2::ZERO, Vec2::new(self.offset.x, self.screen_size.y)),
            (
                Vec2::new(right_edge, 0.0),
                Vec2::new(self.screen_size.x - right_edge, self.screen_size.y),
            ),
        ]
    }
}

fn draw_cells(scene: &Scene, palette: &Palette, metrics: &SceneMetrics) {
    let tile = Vec2::splat(scene.tile_length);
    for cell in &scene.cells {
        if !metrics.is_visible(cell.position, tile) {
            continue;
        }
        fill_rect(
            metrics,
            cell.position,
            tile,
            palette.cell(cell.appearance),
        );
    }
}

fn draw_entities(scene: &Scene, palette: &Palette, metrics: &SceneMetrics) {
    for entity in &scene.entities {
        let (origin, size) = entity.body();
        if !metrics.is_visible(origin, size) {
            continue;
        }
        fill_rect(metrics, origin, size, entity_color(palette, entity));
    }
}

fn entity_color(palette: &Palette, entity: &SceneEntity) -> Color {
    palette.entity(entity.kind, entity.world)
}

fn draw_letterbox(metrics: &SceneMetrics, clear: Color) {
    let color = to_macroquad_color(clear);
    for (origin, size) in metrics.letterbox() {
        if size.x > 0.0 && size.y > 0.0 {
            macroquad::shapes::draw_rectangle(origin.x, origin.y, size.x, size.y, color);
        }
    }
}

fn draw_status_line(scene: &Scene, palette: &Palette, metrics: &SceneMetrics) {
    let baseline = metrics.status_baseline();
    macroquad::text::draw_text(
        &scene.status_line(),
        baseline.x,
        baseline.y,
        STATUS_FONT_SIZE * metrics.scale,
        to_macroquad_color(palette.status_text),
    );
}

fn fill_rect(metrics: &SceneMetrics, origin: Vec2, size: Vec2, color: Color) {
    let screen = metrics.to_screen(origin);
    let scaled = size * metrics.scale;
    macroquad::shapes::draw_rectangle(
        screen.x,
        screen.y,
        scaled.x,
        scaled.y,
        to_macroquad_color(color),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec2_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).length() <= 1e-4,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn metrics_scale_view_to_fit_window() {
        let metrics = SceneMetrics::from_view(ViewSize::new(320, 200), 960.0, 600.0);
        assert!((metrics.scale - 3.0).abs() <= 1e-4);
        assert_vec2_close(metrics.offset, Vec2::ZERO);
        assert_vec2_close(metrics.to_screen(Vec2::new(16.0, 8.0)), Vec2::new(48.0, 24.0));
    }

    #[test]
    fn metrics_letterbox_wide_windows() {
        let metrics = SceneMetrics::from_view(ViewSize::new(320, 200), 1200.0, 600.0);
        assert!((metrics.scale - 3.0).abs() <= 1e-4);
        assert_vec2_close(metrics.offset, Vec2::new(120.0, 0.0));

        let [top, bottom, left, right] = metrics.letterbox();
        assert_vec2_close(top.1, Vec2::new(1200.0, 0.0));
        assert_vec2_close(bottom.1, Vec2::new(1200.0, 0.0));
        assert_vec2_close(left.1, Vec2::new(120.0, 600.0));
        assert_vec2_close(right.0, Vec2::new(1080.0, 0.0));
        assert_vec2_close(right.1, Vec2::new(120.0, 600.0));
    }

    #[test]
    fn cells_outside_view_are_culled() {
        let metrics = SceneMetrics::from_view(ViewSize::new(320, 200), 640.0, 400.0);
        let tile = Vec2::splat(16.0);
        assert!(metrics.is_visible(Vec2::new(-8.0, -8.0), tile));
        assert!(metrics.is_visible(Vec2::new(310.0, 190.0), tile));
        assert!(!metrics.is_visible(Vec2::new(-16.0, 0.0), tile));
        assert!(!metrics.is_visible(Vec2::new(320.0, 0.0), tile));
        assert!(!metrics.is_visible(Vec2::new(0.0, 200.0), tile));
    }

    #[test]
    fn status_line_sits_inside_letterboxed_view() {
        let metrics = SceneMetrics::from_view(ViewSize::new(320, 200), 1200.0, 600.0);
        assert_vec2_close(metrics.status_baseline(), Vec2::new(132.0, 36.0));
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = FrameBreakdown {
            frame: Duration::from_millis(250),
            simulation: Duration::from_millis(4),
            render: Duration::from_millis(2),
        };
        for _ in 0..3 {
            assert!(counter.record_frame(frame).is_none());
        }

        let metrics = counter.record_frame(frame).expect("one second elapsed");
        assert!((metrics.per_second - 4.0).abs() <= 1e-3);
        assert_eq!(metrics.avg_simulation, Duration::from_millis(4));
        assert_eq!(metrics.avg_render, Duration::from_millis(2));
        assert!(counter.record_frame(frame).is_none());
    }
}
