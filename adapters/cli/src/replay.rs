//! Headless scripted runs driven by a JSON list of input frames.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use worldshift_core::{DirectionalInput, Event, WorldTag};
use worldshift_world::query;

use crate::simulation::Simulation;

/// Input held for `repeat` consecutive ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ReplayFrame {
    #[serde(default)]
    pub(crate) input: DirectionalInput,
    #[serde(default = "single_tick")]
    pub(crate) repeat: u32,
    /// Respawns the player before the frame's ticks run.
    #[serde(default)]
    pub(crate) respawn: bool,
}

const fn single_tick() -> u32 {
    1
}

/// Final state and event tallies printed after a replay.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub(crate) struct ReplaySummary {
    pub(crate) ticks: u64,
    pub(crate) level: usize,
    pub(crate) level_name: Option<String>,
    pub(crate) column: i32,
    pub(crate) row: i32,
    pub(crate) world: WorldTag,
    pub(crate) steps: usize,
    pub(crate) world_shifts: usize,
    pub(crate) transfers: usize,
    pub(crate) respawns: usize,
}

impl ReplaySummary {
    fn tally(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::PlayerStepped { .. } => self.steps += 1,
                Event::WorldShifted { .. } => self.world_shifts += 1,
                Event::LevelTransferred { .. } => self.transfers += 1,
                Event::PlayerRespawned { .. } => self.respawns += 1,
                Event::TimeAdvanced { .. }
                | Event::PlayerArrived { .. }
                | Event::CameraMoved { .. } => {}
            }
        }
    }
}

pub(crate) fn load_script(path: &Path) -> Result<Vec<ReplayFrame>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read replay script {}", path.display()))?;
    parse_script(&text).with_context(|| format!("invalid replay script {}", path.display()))
}

pub(crate) fn parse_script(text: &str) -> Result<Vec<ReplayFrame>> {
    serde_json::from_str(text).context("replay script must be a JSON array of frames")
}

/// Feeds every frame to `simulation` one tick at a time.
pub(crate) fn run(simulation: &mut Simulation, script: &[ReplayFrame]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for frame in script {
        if frame.respawn {
            summary.tally(simulation.respawn());
        }
        for _ in 0..frame.repeat {
            summary.tally(simulation.tick(frame.input));
        }
    }

    let level_set = simulation.level_set();
    let player = query::player(level_set);
    summary.ticks = query::tick_index(level_set);
    summary.level = query::active_index(level_set);
    summary.level_name = query::active_level(level_set).name().map(str::to_owned);
    summary.column = player.cell.column();
    summary.row = player.cell.row();
    summary.world = player.world;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::FixedTimestep;
    use worldshift_core::TILE_SIZE;
    use worldshift_system_camera::FollowCamera;
    use worldshift_world::{Legend, Level, LevelSet};

    fn simulation(source: &str) -> Simulation {
        let level = Level::parse(source, &Legend::standard()).expect("valid level");
        Simulation::new(
            LevelSet::new(vec![level]).expect("level set"),
            FollowCamera::default(),
            FixedTimestep::new(60, FixedTimestep::DEFAULT_MAX_TICKS_PER_FRAME),
        )
    }

    #[test]
    fn script_defaults_missing_fields() {
        let script = parse_script(r#"[{ "input": { "right": true } }, { "repeat": 3 }]"#)
            .expect("valid script");
        assert_eq!(script.len(), 2);
        assert!(script[0].input.right);
        assert_eq!(script[0].repeat, 1);
        assert_eq!(script[1].input, DirectionalInput::IDLE);
        assert_eq!(script[1].repeat, 3);
        assert!(!script[1].respawn);
    }

    #[test]
    fn script_rejects_unknown_fields() {
        assert!(parse_script(r#"[{ "jump": true }]"#).is_err());
    }

    #[test]
    fn replay_walks_onto_world_change_pad() {
        let script = parse_script(&format!(
            r#"[{{ "input": {{ "right": true }}, "repeat": 1 }}, {{ "repeat": {} }}]"#,
            TILE_SIZE
        ))
        .expect("valid script");
        let mut simulation = simulation("P1,");
        let summary = run(&mut simulation, &script);

        assert_eq!(summary.ticks, TILE_SIZE as u64 + 1);
        assert_eq!((summary.column, summary.row), (1, 0));
        assert_eq!(summary.world, WorldTag::new(2));
        assert_eq!(summary.steps, 1);
        assert_eq!(summary.world_shifts, 1);
        assert_eq!(summary.transfers, 0);
    }

    #[test]
    fn identical_scripts_produce_identical_summaries() {
        let script = parse_script(
            r#"[
                { "input": { "right": true, "down": true }, "repeat": 40 },
                { "respawn": true, "repeat": 0 },
                { "input": { "down": true }, "repeat": 40 }
            ]"#,
        )
        .expect("valid script");

        let first = run(&mut simulation("P,,\n,1,\n,,2"), &script);
        let second = run(&mut simulation("P,,\n,1,\n,,2"), &script);
        assert_eq!(first, second);
        assert_eq!(first.respawns, 1);
    }
}
