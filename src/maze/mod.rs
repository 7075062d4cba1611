//! Maze generation
//!
//! Pure and deterministic given its random source:
//! - No ambient RNG (randomness is injected)
//! - No recursion (explicit walk stack)
//! - Output is immutable once generated

pub mod error;
pub mod generator;
pub mod random;
pub mod render;

pub use error::MazeError;
pub use generator::{Cell, Direction, Maze, generate, generate_signed};
pub use random::{RandomSource, RecordingRandom, ScriptedRandom, SeededRandom};
pub use render::render_ascii;
