use std::fmt;

/// Errors raised while generating a maze
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeError {
    /// Rows or columns below 1
    InvalidDimension { rows: i64, cols: i64 },
    /// More cells than `MAX_CELLS`
    TooLarge { rows: usize, cols: usize },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::InvalidDimension { rows, cols } => write!(
                f,
                "invalid maze dimensions {rows}x{cols}: rows and columns must be at least 1"
            ),
            MazeError::TooLarge { rows, cols } => write!(
                f,
                "maze of {rows}x{cols} exceeds the limit of {} cells",
                crate::consts::MAX_CELLS
            ),
        }
    }
}

impl std::error::Error for MazeError {}
