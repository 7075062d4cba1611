//! Fixed timestep simulation tick
//!
//! Core loop that advances the world deterministically.

use glam::Vec2;

use super::collision::{ball_rect_collision, bounce_velocity};
use super::state::{BodyLabel, GameEvent, GamePhase, WorldState, is_win_pair};
use crate::consts::*;
use crate::maze::Direction;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Steering impulse for the ball (one key press)
    pub impulse: Option<Direction>,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    pub fn steer(dir: Direction) -> Self {
        Self {
            impulse: Some(dir),
            ..Default::default()
        }
    }
}

/// WASD steering keys
pub fn direction_for_key(key: char) -> Option<Direction> {
    match key.to_ascii_lowercase() {
        'w' => Some(Direction::Up),
        'd' => Some(Direction::Right),
        's' => Some(Direction::Down),
        'a' => Some(Direction::Left),
        _ => None,
    }
}

/// Unit vector for a direction in world space (+y down)
#[inline]
pub fn direction_vector(dir: Direction) -> Vec2 {
    let (dr, dc) = dir.offset();
    Vec2::new(dc as f32, dr as f32)
}

/// Advance the world by one fixed timestep
pub fn tick(state: &mut WorldState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::Won => {}
        }
    }

    if state.phase == GamePhase::Paused {
        return;
    }

    state.time_ticks += 1;

    let impulse = input
        .impulse
        .map(|dir| direction_vector(dir) * state.params.impulse);
    let gravity = if state.gravity_enabled {
        Vec2::new(0.0, state.params.gravity)
    } else {
        Vec2::ZERO
    };
    let floor = state.floor;

    for body in state.bodies.iter_mut().filter(|b| !b.is_static) {
        if let Some(radius) = body.radius() {
            if let Some(impulse) = impulse {
                body.vel += impulse;
            }
            body.vel = (body.vel + gravity * dt).clamp_length_max(max_ball_speed(radius, dt));
        } else {
            body.vel += gravity * dt;
        }
        body.pos += body.vel * dt;

        // Released walls settle on the floor
        if let Some(half) = body.half_extents() {
            if body.pos.y + half.y >= floor {
                body.pos.y = floor - half.y;
                body.vel = Vec2::ZERO;
            }
        }
    }

    resolve_ball_contacts(state);
}

/// Ball speed cap: never more than `BALL_MAX_TRAVEL` radii per tick
fn max_ball_speed(radius: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return BALL_MAX_SPEED;
    }
    BALL_MAX_SPEED.min(radius * BALL_MAX_TRAVEL / dt)
}

/// Push the ball out of every rectangle it overlaps, then report new contacts.
///
/// A contact starts on real overlap and stays alive while the gap is within
/// `CONTACT_SLOP`.
fn resolve_ball_contacts(state: &mut WorldState) {
    let ball_id = state.ball_id();
    let Some(ball_idx) = state.bodies.iter().position(|b| b.id == ball_id) else {
        return;
    };
    let Some(radius) = state.bodies[ball_idx].radius() else {
        return;
    };
    let restitution = state.params.restitution;

    let mut touching: Vec<(u32, BodyLabel)> = Vec::new();
    for i in 0..state.bodies.len() {
        if i == ball_idx {
            continue;
        }
        let other = &state.bodies[i];
        let Some(half) = other.half_extents() else {
            continue;
        };
        let (other_id, other_label, center) = (other.id, other.label, other.pos);

        let ball = &mut state.bodies[ball_idx];
        let result = ball_rect_collision(ball.pos, radius + CONTACT_SLOP, center, half);
        if !result.hit {
            continue;
        }

        let depth = result.penetration - CONTACT_SLOP;
        if depth > 0.0 {
            ball.pos += result.normal * depth;
            ball.vel = bounce_velocity(ball.vel, result.normal, restitution);
            touching.push((other_id, other_label));
        } else if state.contacts.binary_search(&other_id).is_ok() {
            touching.push((other_id, other_label));
        }
    }

    let mut reached_goal = false;
    for &(id, label) in &touching {
        if state.contacts.binary_search(&id).is_ok() {
            continue;
        }
        state.events.push(GameEvent::CollisionStart { a: ball_id, b: id });
        reached_goal |= is_win_pair(BodyLabel::Ball, label);
    }
    state.contacts = touching.into_iter().map(|(id, _)| id).collect();

    if reached_goal {
        state.win();
    }
}

/// Turns variable frame times into whole fixed ticks
#[derive(Debug, Clone, Default)]
pub struct Stepper {
    accumulator: f32,
    /// One-shot input waiting for the next tick
    pending: TickInput,
}

impl Stepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many ticks as `frame_dt` covers, at most `MAX_SUBSTEPS`.
    ///
    /// `input` is applied on the first tick that runs, even if that happens
    /// on a later frame. Returns the number of ticks run.
    pub fn advance(&mut self, state: &mut WorldState, input: &TickInput, frame_dt: f32) -> u32 {
        if input.impulse.is_some() {
            self.pending.impulse = input.impulse;
        }
        self.pending.pause ^= input.pause;

        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = std::mem::take(&mut self.pending);
            tick(state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        // Drop the backlog rather than spiral
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Maze, ScriptedRandom, SeededRandom, generate};
    use crate::sim::geometry::MazeGeometry;
    use crate::Settings;
    use crate::sim::state::PhysicsParams;

    fn scripted_two_by_two() -> Maze {
        let mut trace = vec![0, 0];
        for _ in 0..4 {
            trace.extend([3, 2, 1, 0]);
        }
        generate(2, 2, &mut ScriptedRandom::new(trace)).unwrap()
    }

    fn world_for(maze: &Maze, arena: Vec2, params: PhysicsParams) -> WorldState {
        let geometry = MazeGeometry::emit(maze, arena, 5.0, 2.0);
        WorldState::new(&geometry, params)
    }

    fn goal_id(state: &WorldState) -> u32 {
        state
            .bodies_with_label(BodyLabel::Goal)
            .map(|b| b.id)
            .next()
            .unwrap()
    }

    #[test]
    fn test_impulse_changes_velocity() {
        let maze = generate(3, 3, &mut SeededRandom::new(1)).unwrap();
        let mut state = world_for(&maze, Vec2::splat(300.0), PhysicsParams::default());
        let start = state.ball().unwrap().pos;

        tick(&mut state, &TickInput::steer(Direction::Right), SIM_DT);
        let ball = state.ball().unwrap();
        assert!((ball.vel - Vec2::new(DEFAULT_IMPULSE, 0.0)).length() < 1e-4);
        assert!(ball.pos.x > start.x);
        assert_eq!(state.time_ticks, 1);

        tick(&mut state, &TickInput::steer(Direction::Up), SIM_DT);
        let ball = state.ball().unwrap();
        assert!((ball.vel - Vec2::new(DEFAULT_IMPULSE, -DEFAULT_IMPULSE)).length() < 1e-4);
    }

    #[test]
    fn test_direction_keys() {
        assert_eq!(direction_for_key('w'), Some(Direction::Up));
        assert_eq!(direction_for_key('D'), Some(Direction::Right));
        assert_eq!(direction_for_key('s'), Some(Direction::Down));
        assert_eq!(direction_for_key('a'), Some(Direction::Left));
        assert_eq!(direction_for_key('x'), None);
        assert_eq!(direction_vector(Direction::Up), Vec2::new(0.0, -1.0));
        assert_eq!(direction_vector(Direction::Right), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_tick_pause() {
        let maze = generate(3, 3, &mut SeededRandom::new(2)).unwrap();
        let mut state = world_for(&maze, Vec2::splat(300.0), PhysicsParams::default());

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        // Frozen while paused
        tick(&mut state, &TickInput::steer(Direction::Down), SIM_DT);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.ball().unwrap().vel, Vec2::ZERO);

        // Unpause
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_ball_stays_inside_border() {
        // 1x2 corridor: no interior walls, goal in the right cell
        let maze = generate(1, 2, &mut SeededRandom::new(0)).unwrap();
        let params = PhysicsParams {
            restitution: 0.0,
            ..Default::default()
        };
        let mut state = world_for(&maze, Vec2::new(200.0, 100.0), params);
        let radius = state.ball().unwrap().radius().unwrap();

        for i in 0..300 {
            let input = if i < 60 {
                TickInput::steer(Direction::Left)
            } else {
                TickInput::default()
            };
            tick(&mut state, &input, SIM_DT);
            let ball = state.ball().unwrap();
            // Left border's inner face sits at x = 1
            assert!(ball.pos.x - radius >= 1.0 - 1e-3, "tick {i}: {}", ball.pos.x);
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_reaching_goal_wins_and_releases_walls() {
        let maze = scripted_two_by_two();
        let mut state = world_for(&maze, Vec2::splat(200.0), PhysicsParams::default());
        let goal = goal_id(&state);
        assert_eq!(state.bodies_with_label(BodyLabel::Wall).count(), 1);

        // Drop the ball just above the goal in the bottom-right cell
        if let Some(ball) = state.ball_mut() {
            ball.pos = Vec2::new(150.0, 80.0);
            ball.vel = Vec2::new(0.0, 120.0);
        }

        let mut events = Vec::new();
        for _ in 0..240 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            events.extend(state.drain_events());
            if state.phase == GamePhase::Won {
                break;
            }
        }

        assert_eq!(state.phase, GamePhase::Won);
        assert!(state.gravity_enabled);
        let won_at = events
            .iter()
            .position(|e| matches!(e, GameEvent::Won { .. }))
            .unwrap();
        let touched_at = events
            .iter()
            .position(|e| *e == GameEvent::CollisionStart { a: state.ball_id(), b: goal })
            .unwrap();
        assert!(touched_at < won_at);

        // Keep running: walls fall, the transition never repeats
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            events.extend(state.drain_events());
        }
        let wins = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Won { .. }))
            .count();
        assert_eq!(wins, 1);
        assert_eq!(state.phase, GamePhase::Won);

        for wall in state.bodies_with_label(BodyLabel::Wall) {
            assert!(!wall.is_static);
            let half = wall.half_extents().unwrap();
            assert!((wall.pos.y + half.y - state.floor).abs() < 1e-3);
        }
        assert!(state.bodies_with_label(BodyLabel::Border).all(|b| b.is_static));
    }

    #[test]
    fn test_single_cell_wins_immediately() {
        // Ball spawns inside the goal
        let maze = generate(1, 1, &mut SeededRandom::new(0)).unwrap();
        let mut state = world_for(&maze, Vec2::splat(100.0), PhysicsParams::default());
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Won);
    }

    #[test]
    fn test_won_ignores_pause() {
        let maze = generate(2, 2, &mut SeededRandom::new(5)).unwrap();
        let mut state = world_for(&maze, Vec2::splat(200.0), PhysicsParams::default());
        state.win();

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_collision_start_once_per_contact() {
        let maze = generate(1, 2, &mut SeededRandom::new(0)).unwrap();
        let params = PhysicsParams {
            restitution: 0.0,
            ..Default::default()
        };
        let mut state = world_for(&maze, Vec2::new(200.0, 100.0), params);
        let ball_id = state.ball_id();

        // Push into the top border and hold there
        let mut starts = 0;
        for i in 0..240 {
            let input = if i % 10 == 0 {
                TickInput::steer(Direction::Up)
            } else {
                TickInput::default()
            };
            tick(&mut state, &input, SIM_DT);
            starts += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::CollisionStart { a, .. } if *a == ball_id))
                .count();
        }
        assert_eq!(starts, 1);
    }

    #[test]
    fn test_ball_cannot_pass_closed_wall_at_any_cell_size() {
        // Started at (1, 1): the only closed wall separates (1, 0) from (1, 1)
        let mut trace = vec![1, 1];
        for _ in 0..4 {
            trace.extend([3, 2, 1, 0]);
        }
        let maze = generate(2, 2, &mut ScriptedRandom::new(trace)).unwrap();
        assert!(!maze.vertical_walls()[1][0]);

        // Smallest cell validation allows is just over twice the wall thickness
        for cell in [100.0, 40.0, 16.0, 10.5] {
            let settings = Settings {
                rows: 2,
                cols: 2,
                arena_width: 2.0 * cell,
                arena_height: 2.0 * cell,
                ..Default::default()
            };
            settings.validate().unwrap();
            let geometry = MazeGeometry::emit(
                &maze,
                settings.arena(),
                settings.wall_thickness,
                settings.border_thickness,
            );
            let mut state = WorldState::new(&geometry, settings.physics());
            let radius = geometry.ball_radius;
            let wall_face = cell - settings.wall_thickness / 2.0;

            if let Some(ball) = state.ball_mut() {
                ball.pos = Vec2::new(cell / 2.0, 1.5 * cell);
                ball.vel = Vec2::new(10_000.0, 0.0);
            }
            for i in 0..240 {
                tick(&mut state, &TickInput::steer(Direction::Right), SIM_DT);
                let ball = state.ball().unwrap();
                assert!(
                    ball.vel.length() * SIM_DT <= radius,
                    "cell {cell}, tick {i}: speed {}",
                    ball.vel.length()
                );
                assert!(
                    ball.pos.x + radius <= wall_face + 1e-3,
                    "cell {cell}, tick {i}: ball at {} crossed wall face {wall_face}",
                    ball.pos.x
                );
            }
            assert_eq!(state.phase, GamePhase::Playing);
        }
    }

    #[test]
    fn test_speed_cap_follows_ball_size() {
        assert_eq!(max_ball_speed(100.0, SIM_DT), BALL_MAX_SPEED);
        let small = max_ball_speed(1.5, SIM_DT);
        assert!(small < BALL_MAX_SPEED);
        assert!(small * SIM_DT < 1.5);
    }

    #[test]
    fn test_near_miss_is_not_a_contact() {
        let maze = scripted_two_by_two();
        let mut state = world_for(&maze, Vec2::splat(200.0), PhysicsParams::default());
        let radius = state.ball().unwrap().radius().unwrap();
        // Goal in the bottom-right cell: center (150, 150), 70 wide
        let goal_top = 150.0 - 35.0;

        if let Some(ball) = state.ball_mut() {
            ball.pos = Vec2::new(150.0, goal_top - radius - 0.4);
        }
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.drain_events().is_empty());
        assert_eq!(state.phase, GamePhase::Playing);

        if let Some(ball) = state.ball_mut() {
            ball.pos = Vec2::new(150.0, goal_top - radius + 0.3);
        }
        tick(&mut state, &TickInput::default(), SIM_DT);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::CollisionStart {
            a: state.ball_id(),
            b: goal_id(&state)
        }));
        assert_eq!(state.phase, GamePhase::Won);
    }

    #[test]
    fn test_determinism() {
        let maze = generate(6, 6, &mut SeededRandom::new(99999)).unwrap();
        let mut state1 = world_for(&maze, Vec2::splat(600.0), PhysicsParams::default());
        let mut state2 = world_for(&maze, Vec2::splat(600.0), PhysicsParams::default());

        let inputs = [
            TickInput::steer(Direction::Right),
            TickInput::default(),
            TickInput::steer(Direction::Down),
            TickInput::steer(Direction::Down),
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.phase, state2.phase);
        let (b1, b2) = (state1.ball().unwrap(), state2.ball().unwrap());
        assert_eq!(b1.pos, b2.pos);
        assert_eq!(b1.vel, b2.vel);
    }

    #[test]
    fn test_stepper_substeps() {
        let maze = generate(3, 3, &mut SeededRandom::new(4)).unwrap();
        let mut state = world_for(&maze, Vec2::splat(300.0), PhysicsParams::default());
        let mut stepper = Stepper::new();

        // Too short for a tick: the impulse waits
        let ran = stepper.advance(&mut state, &TickInput::steer(Direction::Right), SIM_DT * 0.5);
        assert_eq!(ran, 0);
        assert_eq!(state.ball().unwrap().vel, Vec2::ZERO);

        let ran = stepper.advance(&mut state, &TickInput::default(), SIM_DT * 2.0);
        assert_eq!(ran, 2);
        assert_eq!(state.time_ticks, 2);
        // Applied once, not per substep
        assert!((state.ball().unwrap().vel.x - DEFAULT_IMPULSE).abs() < 1e-4);

        // Long frames are capped
        let ran = stepper.advance(&mut state, &TickInput::default(), 1.0);
        assert_eq!(ran, MAX_SUBSTEPS);
    }
}
