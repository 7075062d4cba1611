//! Maze Ball entry point
//!
//! Generates a maze, prints it, and runs the simulation headless.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;

use maze_ball::Settings;
use maze_ball::maze::{SeededRandom, generate, render_ascii};
use maze_ball::sim::{
    GameEvent, GamePhase, MazeGeometry, Stepper, TickInput, WorldState, direction_for_key,
};

/// Settings file read when --config is not given
const DEFAULT_CONFIG_PATH: &str = "maze-ball.json";
/// Headless frame time (60 fps)
const FRAME_DT: f32 = 1.0 / 60.0;

/// Random maze with a ball to steer through it
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Settings file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maze rows
    #[arg(long)]
    rows: Option<usize>,

    /// Maze columns
    #[arg(long)]
    cols: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Key presses to replay, one per frame (w/a/s/d, anything else waits)
    #[arg(long, default_value = "")]
    moves: String,

    /// Frames to simulate after the moves run out
    #[arg(long, default_value_t = 0)]
    frames: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::load_or_default(Path::new(DEFAULT_CONFIG_PATH)),
    };
    if let Some(rows) = args.rows {
        settings.rows = rows;
    }
    if let Some(cols) = args.cols {
        settings.cols = cols;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    settings.validate()?;

    let mut random = SeededRandom::new(settings.seed.unwrap_or_else(time_seed));
    log::info!(
        "Maze Ball starting: {}x{} maze, seed {}",
        settings.rows,
        settings.cols,
        random.seed()
    );

    let maze = generate(settings.rows, settings.cols, &mut random)
        .context("maze generation failed")?;
    print!("{}", render_ascii(&maze));

    let geometry = MazeGeometry::emit(
        &maze,
        settings.arena(),
        settings.wall_thickness,
        settings.border_thickness,
    );
    let mut world = WorldState::new(&geometry, settings.physics());
    let mut stepper = Stepper::new();

    let script: Vec<TickInput> = args
        .moves
        .chars()
        .map(|key| TickInput {
            impulse: direction_for_key(key),
            ..Default::default()
        })
        .chain(std::iter::repeat_n(TickInput::default(), args.frames as usize))
        .collect();

    for input in &script {
        stepper.advance(&mut world, input, FRAME_DT);
        for event in world.drain_events() {
            match event {
                GameEvent::CollisionStart { a, b } => {
                    log::debug!("Contact {a} <-> {b} at tick {}", world.time_ticks)
                }
                GameEvent::Won { tick } => println!("Goal reached at tick {tick}!"),
            }
        }
    }

    if let Some(ball) = world.ball() {
        log::info!(
            "Stopped after {} ticks: ball at ({:.1}, {:.1}), phase {:?}",
            world.time_ticks,
            ball.pos.x,
            ball.pos.y,
            world.phase
        );
    }
    if world.phase != GamePhase::Won && !script.is_empty() {
        println!("Goal not reached after {} ticks", world.time_ticks);
    }

    Ok(())
}

/// Seed from the wall clock when none is configured
fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
