//! Maze Ball - steer a ball through a random perfect maze
//!
//! Core modules:
//! - `maze`: Maze generation (randomized backtracking, injected randomness)
//! - `sim`: Deterministic simulation (geometry, collisions, win state)
//! - `settings`: JSON-backed configuration

pub mod maze;
pub mod settings;
pub mod sim;

pub use maze::{Maze, MazeError, generate};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Maze defaults
    pub const DEFAULT_ROWS: usize = 10;
    pub const DEFAULT_COLS: usize = 10;
    /// Largest grid the generator accepts (rows * cols)
    pub const MAX_CELLS: usize = 1 << 22;

    /// Arena defaults
    pub const DEFAULT_ARENA_WIDTH: f32 = 800.0;
    pub const DEFAULT_ARENA_HEIGHT: f32 = 600.0;
    pub const DEFAULT_WALL_THICKNESS: f32 = 5.0;
    pub const DEFAULT_BORDER_THICKNESS: f32 = 2.0;

    /// Goal size relative to a cell
    pub const GOAL_SCALE: f32 = 0.7;
    /// Ball radius relative to the smaller cell side
    pub const BALL_RADIUS_FRACTION: f32 = 0.25;

    /// Velocity added per key press (units/s)
    pub const DEFAULT_IMPULSE: f32 = 60.0;
    /// Gravity after the win (units/s²)
    pub const DEFAULT_GRAVITY: f32 = 600.0;
    pub const DEFAULT_RESTITUTION: f32 = 0.5;
    /// Absolute ball speed cap (units/s)
    pub const BALL_MAX_SPEED: f32 = 900.0;
    /// Most the ball may travel in one tick, as a fraction of its radius.
    /// Below 1 the ball can never end a tick inside a rectangle it was clear of.
    pub const BALL_MAX_TRAVEL: f32 = 0.9;
    /// Separation still counted as touching, so resting contacts don't flicker
    pub const CONTACT_SLOP: f32 = 0.5;
}
