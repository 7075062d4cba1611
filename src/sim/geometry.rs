//! Maze topology to world geometry
//!
//! World coordinates match screen space: origin top-left, +y pointing down.
//! A cell `(row, col)` spans `[col*uw, (col+1)*uw] × [row*uh, (row+1)*uh]`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::BodyLabel;
use crate::consts::{BALL_RADIUS_FRACTION, GOAL_SCALE};
use crate::maze::{Cell, Maze};

/// A static axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub label: BodyLabel,
    pub center: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    pub fn new(label: BodyLabel, center: Vec2, size: Vec2) -> Self {
        Self {
            label,
            center,
            size,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }
}

/// Center of a cell in world space
#[inline]
pub fn cell_center(cell: Cell, unit: Vec2) -> Vec2 {
    Vec2::new(
        cell.col as f32 * unit.x + unit.x / 2.0,
        cell.row as f32 * unit.y + unit.y / 2.0,
    )
}

/// One obstacle per closed interior wall.
///
/// Horizontal walls come first (row-major), then vertical walls (row-major).
pub fn wall_obstacles(maze: &Maze, unit: Vec2, thickness: f32) -> Vec<Obstacle> {
    let mut walls = Vec::new();

    for (row, flags) in maze.horizontal_walls().iter().enumerate() {
        for (col, &open) in flags.iter().enumerate() {
            if open {
                continue;
            }
            walls.push(Obstacle::new(
                BodyLabel::Wall,
                Vec2::new(
                    col as f32 * unit.x + unit.x / 2.0,
                    row as f32 * unit.y + unit.y,
                ),
                Vec2::new(unit.x, thickness),
            ));
        }
    }

    for (row, flags) in maze.vertical_walls().iter().enumerate() {
        for (col, &open) in flags.iter().enumerate() {
            if open {
                continue;
            }
            walls.push(Obstacle::new(
                BodyLabel::Wall,
                Vec2::new(
                    col as f32 * unit.x + unit.x,
                    row as f32 * unit.y + unit.y / 2.0,
                ),
                Vec2::new(thickness, unit.y),
            ));
        }
    }

    walls
}

/// Four rectangles centered on the arena edges: top, bottom, left, right
pub fn border_obstacles(arena: Vec2, thickness: f32) -> [Obstacle; 4] {
    let half = arena / 2.0;
    [
        Obstacle::new(
            BodyLabel::Border,
            Vec2::new(half.x, 0.0),
            Vec2::new(arena.x, thickness),
        ),
        Obstacle::new(
            BodyLabel::Border,
            Vec2::new(half.x, arena.y),
            Vec2::new(arena.x, thickness),
        ),
        Obstacle::new(
            BodyLabel::Border,
            Vec2::new(0.0, half.y),
            Vec2::new(thickness, arena.y),
        ),
        Obstacle::new(
            BodyLabel::Border,
            Vec2::new(arena.x, half.y),
            Vec2::new(thickness, arena.y),
        ),
    ]
}

/// Everything the world needs to place bodies for one maze
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeGeometry {
    pub arena: Vec2,
    /// Cell size
    pub unit: Vec2,
    pub walls: Vec<Obstacle>,
    pub borders: [Obstacle; 4],
    pub goal: Obstacle,
    pub ball_start: Vec2,
    pub ball_radius: f32,
    /// Y coordinate released walls come to rest on
    pub floor: f32,
}

impl MazeGeometry {
    /// Lay out `maze` over an `arena`-sized world.
    ///
    /// The ball starts in the top-left cell and the goal sits in the
    /// bottom-right cell, whatever cell the generator started from.
    pub fn emit(maze: &Maze, arena: Vec2, wall_thickness: f32, border_thickness: f32) -> Self {
        let unit = Vec2::new(arena.x / maze.cols() as f32, arena.y / maze.rows() as f32);

        let goal_cell = Cell::new(maze.rows() - 1, maze.cols() - 1);
        let goal = Obstacle::new(
            BodyLabel::Goal,
            cell_center(goal_cell, unit),
            unit * GOAL_SCALE,
        );

        Self {
            arena,
            unit,
            walls: wall_obstacles(maze, unit, wall_thickness),
            borders: border_obstacles(arena, border_thickness),
            goal,
            ball_start: cell_center(Cell::new(0, 0), unit),
            ball_radius: unit.x.min(unit.y) * BALL_RADIUS_FRACTION,
            floor: arena.y - border_thickness / 2.0,
        }
    }

    /// Total static rectangles (walls, borders, goal)
    pub fn obstacle_count(&self) -> usize {
        self.walls.len() + self.borders.len() + 1
    }
}
