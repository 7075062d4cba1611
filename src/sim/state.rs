//! World state and core simulation types
//!
//! Everything a tick reads or writes lives here, and all of it can be
//! serialized.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{MazeGeometry, Obstacle};
use crate::consts::*;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball is steerable, walls are static
    Playing,
    /// Simulation frozen
    Paused,
    /// Ball reached the goal; gravity on, walls released. Never left.
    Won,
}

/// What a body represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyLabel {
    /// Interior maze wall (released on win)
    Wall,
    /// Arena edge (always static)
    Border,
    Goal,
    Ball,
}

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect { half_extents: Vec2 },
    Circle { radius: f32 },
}

/// A rigid body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub label: BodyLabel,
    pub shape: Shape,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Static bodies never move
    pub is_static: bool,
}

impl Body {
    fn from_obstacle(id: u32, obstacle: &Obstacle) -> Self {
        Self {
            id,
            label: obstacle.label,
            shape: Shape::Rect {
                half_extents: obstacle.half_extents(),
            },
            pos: obstacle.center,
            vel: Vec2::ZERO,
            is_static: true,
        }
    }

    fn ball(id: u32, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            label: BodyLabel::Ball,
            shape: Shape::Circle { radius },
            pos,
            vel: Vec2::ZERO,
            is_static: false,
        }
    }

    /// Half extents of a rectangle body
    pub fn half_extents(&self) -> Option<Vec2> {
        match self.shape {
            Shape::Rect { half_extents } => Some(half_extents),
            Shape::Circle { .. } => None,
        }
    }

    pub fn radius(&self) -> Option<f32> {
        match self.shape {
            Shape::Circle { radius } => Some(radius),
            Shape::Rect { .. } => None,
        }
    }
}

/// Events produced during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Two bodies touched this tick but not on the previous one
    CollisionStart { a: u32, b: u32 },
    /// Ball reached the goal
    Won { tick: u64 },
}

/// Tunable physics values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsParams {
    /// Velocity change per steering impulse (units/s)
    pub impulse: f32,
    /// Downward acceleration once gravity is enabled (units/s²)
    pub gravity: f32,
    /// Fraction of normal speed kept after a bounce
    pub restitution: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            impulse: DEFAULT_IMPULSE,
            gravity: DEFAULT_GRAVITY,
            restitution: DEFAULT_RESTITUTION,
        }
    }
}

/// True when the pair is `{Ball, Goal}` in either order
#[inline]
pub fn is_win_pair(a: BodyLabel, b: BodyLabel) -> bool {
    matches!(
        (a, b),
        (BodyLabel::Ball, BodyLabel::Goal) | (BodyLabel::Goal, BodyLabel::Ball)
    )
}

/// Complete world state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    pub arena: Vec2,
    /// Released walls rest on this line
    pub floor: f32,
    pub phase: GamePhase,
    pub gravity_enabled: bool,
    pub params: PhysicsParams,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// All bodies (sorted by id for determinism)
    pub bodies: Vec<Body>,
    /// Pending events, oldest first
    pub events: Vec<GameEvent>,
    /// Bodies touching the ball at the end of the last tick (sorted)
    pub(crate) contacts: Vec<u32>,
    ball_id: u32,
    /// Next entity ID
    next_id: u32,
}

impl WorldState {
    /// Build the world for one maze layout
    pub fn new(geometry: &MazeGeometry, params: PhysicsParams) -> Self {
        let mut state = Self {
            arena: geometry.arena,
            floor: geometry.floor,
            phase: GamePhase::Playing,
            gravity_enabled: false,
            params,
            time_ticks: 0,
            bodies: Vec::with_capacity(geometry.obstacle_count() + 1),
            events: Vec::new(),
            contacts: Vec::new(),
            ball_id: 0,
            next_id: 1,
        };

        for obstacle in geometry
            .walls
            .iter()
            .chain(geometry.borders.iter())
            .chain(std::iter::once(&geometry.goal))
        {
            let id = state.next_entity_id();
            state.bodies.push(Body::from_obstacle(id, obstacle));
        }

        let ball_id = state.next_entity_id();
        state
            .bodies
            .push(Body::ball(ball_id, geometry.ball_start, geometry.ball_radius));
        state.ball_id = ball_id;

        log::info!(
            "World ready: {} bodies ({} walls)",
            state.bodies.len(),
            geometry.walls.len()
        );

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn ball_id(&self) -> u32 {
        self.ball_id
    }

    pub fn ball(&self) -> Option<&Body> {
        self.body(self.ball_id)
    }

    pub fn ball_mut(&mut self) -> Option<&mut Body> {
        let id = self.ball_id;
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn body(&self, id: u32) -> Option<&Body> {
        self.bodies
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &self.bodies[i])
    }

    pub fn bodies_with_label(&self, label: BodyLabel) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.iter().filter(move |b| b.label == label)
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Switch to the won state: gravity on, every maze wall dynamic.
    ///
    /// All effects land together. Returns false if already won.
    pub fn win(&mut self) -> bool {
        if self.phase == GamePhase::Won {
            return false;
        }

        self.phase = GamePhase::Won;
        self.gravity_enabled = true;
        let mut released = 0;
        for body in self.bodies.iter_mut().filter(|b| b.label == BodyLabel::Wall) {
            body.is_static = false;
            released += 1;
        }
        self.events.push(GameEvent::Won {
            tick: self.time_ticks,
        });

        log::info!(
            "Goal reached at tick {}, releasing {} walls",
            self.time_ticks,
            released
        );
        true
    }
}
