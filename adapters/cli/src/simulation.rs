//! Fixed-rate driver that feeds the level set and camera system from frame input.

use std::time::Duration;

use tracing::{debug, info};
use worldshift_core::{Command, DirectionalInput, Event};
use worldshift_rendering::{FrameInput, Scene};
use worldshift_system_camera::FollowCamera;
use worldshift_world::{self as world, query, LevelSet};

/// Converts variable frame durations into a whole number of logic ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
    max_ticks_per_frame: u32,
}

impl FixedTimestep {
    /// Catch-up cap applied when frames arrive late.
    pub(crate) const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 8;

    /// Creates a timestep running `tick_rate` ticks per second.
    pub(crate) fn new(tick_rate: u32, max_ticks_per_frame: u32) -> Self {
        Self {
            step: Duration::from_secs(1) / tick_rate.max(1),
            accumulator: Duration::ZERO,
            max_ticks_per_frame: max_ticks_per_frame.max(1),
        }
    }

    /// Duration of a single logic tick.
    pub(crate) const fn step(&self) -> Duration {
        self.step
    }

    /// Accumulates `frame` and returns how many ticks are owed.
    ///
    /// Backlog beyond the per-frame cap is discarded.
    pub(crate) fn advance(&mut self, frame: Duration) -> u32 {
        self.accumulator += frame;

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_ticks_per_frame {
            self.accumulator -= self.step;
            ticks += 1;
        }

        if self.accumulator >= self.step {
            debug!(
                dropped_ms = self.accumulator.as_secs_f64() * 1_000.0,
                "simulation fell behind"
            );
            self.accumulator = Duration::ZERO;
        }

        ticks
    }
}

/// Level set, camera system and timestep bundled for adapters.
#[derive(Debug)]
pub(crate) struct Simulation {
    level_set: LevelSet,
    camera: FollowCamera,
    timestep: FixedTimestep,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Simulation {
    pub(crate) fn new(level_set: LevelSet, camera: FollowCamera, timestep: FixedTimestep) -> Self {
        Self {
            level_set,
            camera,
            timestep,
            events: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub(crate) fn level_set(&self) -> &LevelSet {
        &self.level_set
    }

    /// Applies one frame of input, running as many ticks as the timestep owes.
    pub(crate) fn advance(&mut self, frame: Duration, input: FrameInput) {
        if input.respawn {
            let _ = self.respawn();
        }

        for _ in 0..self.timestep.advance(frame) {
            let _ = self.tick(input.directional);
        }
    }

    /// Runs exactly one logic tick and returns the events it produced.
    pub(crate) fn tick(&mut self, input: DirectionalInput) -> &[Event] {
        self.events.clear();
        world::apply(&mut self.level_set, Command::Tick { input }, &mut self.events);

        self.camera.handle(
            &self.events,
            &query::player(&self.level_set),
            query::camera(&self.level_set),
            &mut self.commands,
        );
        for command in self.commands.drain(..) {
            world::apply(&mut self.level_set, command, &mut self.events);
        }

        self.log_events();
        &self.events
    }

    /// Sends the active player back to its spawn.
    pub(crate) fn respawn(&mut self) -> &[Event] {
        self.events.clear();
        world::apply(&mut self.level_set, Command::RespawnPlayer, &mut self.events);
        self.log_events();
        &self.events
    }

    /// Refreshes `scene` with the active level as seen through the camera.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        let view = scene.view;
        query::draw_active(&self.level_set, view, &mut scene.record());

        let level = query::active_level(&self.level_set);
        scene.world = query::player(&self.level_set).world;
        scene.level_index = query::active_index(&self.level_set);
        scene.level_count = query::level_count(&self.level_set);
        scene.level_name = level.name().map(str::to_owned);
    }

    fn log_events(&self) {
        for event in &self.events {
            match event {
                Event::LevelTransferred { kind, to, .. } => {
                    let level = &query::levels(&self.level_set)[*to];
                    info!(
                        ?kind,
                        level = to + 1,
                        name = level.name().unwrap_or("unnamed"),
                        "entered level"
                    );
                }
                Event::PlayerRespawned { level: index, cell } => {
                    debug!(level = *index, %cell, "player respawned");
                }
                _ => {}
            }
        }
    }
}
