#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Worldshift experience.

mod pack;
mod replay;
mod simulation;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use worldshift_core::ViewSize;
use worldshift_rendering::{Palette, Presentation, RenderingBackend, Scene};
use worldshift_rendering_macroquad::MacroquadBackend;
use worldshift_system_camera::{Border, FollowCamera};
use worldshift_world::query;

use self::{
    pack::LevelPack,
    simulation::{FixedTimestep, Simulation},
};

/// Tile-based world-shifting puzzle platformer.
#[derive(Debug, Parser)]
#[command(name = "worldshift", version, about, long_about = None)]
struct Args {
    /// TOML level pack manifest to play instead of the built-in levels.
    #[arg(long, value_name = "FILE", conflicts_with = "levels")]
    pack: Option<PathBuf>,

    /// Plain-text level file; repeat to build an ordered set.
    #[arg(long = "level", value_name = "FILE")]
    levels: Vec<PathBuf>,

    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,

    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,

    /// Window magnification of the 320x200 viewport.
    #[arg(long, default_value_t = 3.0)]
    scale: f32,

    /// Logic ticks per second.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    tick_rate: u32,

    /// Default log filter; `RUST_LOG` takes precedence when set.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Load and validate every level, print a summary and exit.
    #[arg(long, conflicts_with = "replay")]
    check: bool,

    /// Run a JSON input script headlessly and print the final state.
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,
}

impl Args {
    fn load_pack(&self) -> Result<LevelPack> {
        if let Some(path) = &self.pack {
            LevelPack::load_manifest(path)
        } else if !self.levels.is_empty() {
            LevelPack::from_level_files(&self.levels)
        } else {
            LevelPack::builtin()
        }
    }
}

/// Entry point for the Worldshift command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let pack = args.load_pack()?;
    if args.check {
        print_summary(&pack);
        return Ok(());
    }

    let title = pack.title.clone();
    let view = ViewSize::default();
    let timestep = FixedTimestep::new(args.tick_rate, FixedTimestep::DEFAULT_MAX_TICKS_PER_FRAME);
    debug!(step = ?timestep.step(), "fixed timestep configured");
    let simulation = Simulation::new(
        pack.into_level_set()?,
        FollowCamera::new(view, Border::default()),
        timestep,
    );

    if let Some(path) = &args.replay {
        let script = replay::load_script(path)?;
        let mut simulation = simulation;
        let summary = replay::run(&mut simulation, &script);
        let json =
            serde_json::to_string_pretty(&summary).context("failed to encode replay summary")?;
        println!("{json}");
        return Ok(());
    }

    run_windowed(&args, title, view, simulation)
}

fn init_logging(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("invalid log level {default_filter:?}"))?,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("failed to install log subscriber")
}

fn print_summary(pack: &LevelPack) {
    println!("{}: {} level(s)", pack.title, pack.levels.len());
    for (index, level) in pack.levels.iter().enumerate() {
        println!(
            "  {:>2}. {:<16} {}x{} spawn {}",
            index + 1,
            level.name().unwrap_or("unnamed"),
            level.columns(),
            level.rows(),
            level.spawn(),
        );
    }
}

fn run_windowed(args: &Args, title: String, view: ViewSize, simulation: Simulation) -> Result<()> {
    let mut scene = Scene::new(view);
    simulation.populate_scene(&mut scene);
    let presentation = Presentation::new(title, Palette::default(), args.scale, scene)
        .context("invalid presentation settings")?;

    info!(
        levels = query::level_count(simulation.level_set()),
        tick_rate = args.tick_rate,
        "starting"
    );

    let mut simulation = simulation;
    MacroquadBackend::default()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .run(presentation, move |frame, input, scene| {
            simulation.advance(frame, input);
            simulation.populate_scene(scene);
        })
}
