//! Deterministic simulation module
//!
//! Turns a generated maze into bodies and steps them. This module must stay
//! pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, ball_rect_collision, bounce_velocity};
pub use geometry::{MazeGeometry, Obstacle, border_obstacles, cell_center, wall_obstacles};
pub use state::{
    Body, BodyLabel, GameEvent, GamePhase, PhysicsParams, Shape, WorldState, is_win_pair,
};
pub use tick::{Stepper, TickInput, direction_for_key, direction_vector, tick};
