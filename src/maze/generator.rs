//! Randomized backtracking maze generator
//!
//! Walks the grid depth-first from a random start cell, visiting neighbors in
//! a freshly shuffled order at every cell. A wall is opened only when the walk
//! steps into an unvisited cell, so the open walls always form a spanning tree:
//! `rows * cols - 1` passages, every cell reachable, no loops.
//!
//! The walk keeps its own stack of frames instead of recursing, so a long
//! corridor cannot exhaust the call stack. Each frame remembers its shuffled
//! candidates and how far it got through them. The order of random draws is
//! the same as a recursive walk that shuffles on entering each cell.

use serde::{Deserialize, Serialize};

use super::error::MazeError;
use super::random::RandomSource;
use crate::consts::MAX_CELLS;

/// Direction from a cell to one of its four neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Candidate order before shuffling
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// (row, col) offset
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }
}

/// A grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A generated perfect maze
///
/// `vertical_walls[r][c]` is true when the wall between `(r, c)` and
/// `(r, c + 1)` is open. `horizontal_walls[r][c]` is true when the wall
/// between `(r, c)` and `(r + 1, c)` is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    rows: usize,
    cols: usize,
    visited: Vec<Vec<bool>>,
    vertical_walls: Vec<Vec<bool>>,
    horizontal_walls: Vec<Vec<bool>>,
    start: Cell,
}

impl Maze {
    /// Every wall closed, nothing visited
    fn closed(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            visited: vec![vec![false; cols]; rows],
            vertical_walls: vec![vec![false; cols - 1]; rows],
            horizontal_walls: vec![vec![false; cols]; rows - 1],
            start: Cell::new(0, 0),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn visited(&self) -> &[Vec<bool>] {
        &self.visited
    }

    /// `rows × (cols - 1)` open flags between horizontally adjacent cells
    pub fn vertical_walls(&self) -> &[Vec<bool>] {
        &self.vertical_walls
    }

    /// `(rows - 1) × cols` open flags between vertically adjacent cells
    pub fn horizontal_walls(&self) -> &[Vec<bool>] {
        &self.horizontal_walls
    }

    /// Cell the generator started its walk from
    pub fn start(&self) -> Cell {
        self.start
    }

    /// Neighbor of `cell` in `dir`, if it lies inside the grid
    pub fn step(&self, cell: Cell, dir: Direction) -> Option<Cell> {
        let (dr, dc) = dir.offset();
        let row = cell.row.checked_add_signed(dr)?;
        let col = cell.col.checked_add_signed(dc)?;
        (row < self.rows && col < self.cols).then_some(Cell::new(row, col))
    }

    /// Whether the wall on the `dir` side of `cell` is open.
    ///
    /// The outer boundary is always closed.
    pub fn is_open(&self, cell: Cell, dir: Direction) -> bool {
        if self.step(cell, dir).is_none() {
            return false;
        }
        match dir {
            Direction::Left => self.vertical_walls[cell.row][cell.col - 1],
            Direction::Right => self.vertical_walls[cell.row][cell.col],
            Direction::Up => self.horizontal_walls[cell.row - 1][cell.col],
            Direction::Down => self.horizontal_walls[cell.row][cell.col],
        }
    }

    /// Neighbors reachable from `cell` through an open wall
    pub fn open_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |&dir| self.is_open(cell, dir))
            .filter_map(move |dir| self.step(cell, dir))
    }

    /// Total open walls across both matrices
    pub fn open_wall_count(&self) -> usize {
        self.vertical_walls
            .iter()
            .chain(self.horizontal_walls.iter())
            .flatten()
            .filter(|&&open| open)
            .count()
    }

    fn open_wall(&mut self, cell: Cell, dir: Direction) {
        match dir {
            Direction::Left => self.vertical_walls[cell.row][cell.col - 1] = true,
            Direction::Right => self.vertical_walls[cell.row][cell.col] = true,
            Direction::Up => self.horizontal_walls[cell.row - 1][cell.col] = true,
            Direction::Down => self.horizontal_walls[cell.row][cell.col] = true,
        }
    }
}

/// One cell of the walk: its shuffled candidates and the next one to try
struct Frame {
    cell: Cell,
    candidates: [Direction; 4],
    next: usize,
}

/// Generate a `rows × cols` maze
pub fn generate<R: RandomSource>(
    rows: usize,
    cols: usize,
    random: &mut R,
) -> Result<Maze, MazeError> {
    if rows == 0 || cols == 0 {
        return Err(MazeError::InvalidDimension {
            rows: i64::try_from(rows).unwrap_or(i64::MAX),
            cols: i64::try_from(cols).unwrap_or(i64::MAX),
        });
    }
    if rows.checked_mul(cols).is_none_or(|cells| cells > MAX_CELLS) {
        return Err(MazeError::TooLarge { rows, cols });
    }

    let mut maze = Maze::closed(rows, cols);
    let start = Cell::new(random.next_int(rows), random.next_int(cols));
    maze.start = start;

    let mut stack: Vec<Frame> = Vec::new();
    enter(&mut maze, start, random, &mut stack);
    let mut deepest = stack.len();

    while let Some(frame) = stack.last_mut() {
        let Some(&dir) = frame.candidates.get(frame.next) else {
            stack.pop();
            continue;
        };
        frame.next += 1;
        let cell = frame.cell;

        let Some(next) = maze.step(cell, dir) else {
            continue;
        };
        if maze.visited[next.row][next.col] {
            continue;
        }

        maze.open_wall(cell, dir);
        enter(&mut maze, next, random, &mut stack);
        deepest = deepest.max(stack.len());
    }

    log::debug!(
        "Generated {}x{} maze from ({}, {}): {} open walls, max depth {}",
        rows,
        cols,
        start.row,
        start.col,
        maze.open_wall_count(),
        deepest
    );

    Ok(maze)
}

/// Generate from signed dimensions, rejecting anything below 1
pub fn generate_signed<R: RandomSource>(
    rows: i64,
    cols: i64,
    random: &mut R,
) -> Result<Maze, MazeError> {
    let invalid = MazeError::InvalidDimension { rows, cols };
    if rows < 1 || cols < 1 {
        return Err(invalid);
    }
    let rows = usize::try_from(rows).map_err(|_| invalid)?;
    let cols = usize::try_from(cols).map_err(|_| invalid)?;
    generate(rows, cols, random)
}

/// Mark `cell` visited and push its frame. Already-visited cells are ignored.
fn enter<R: RandomSource>(maze: &mut Maze, cell: Cell, random: &mut R, stack: &mut Vec<Frame>) {
    if maze.visited[cell.row][cell.col] {
        return;
    }
    maze.visited[cell.row][cell.col] = true;

    let mut candidates = Direction::ALL;
    random.shuffle(&mut candidates);
    stack.push(Frame {
        cell,
        candidates,
        next: 0,
    });
}
