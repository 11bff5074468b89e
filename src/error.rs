use crate::maze::Cell;

/// Errors reported by maze generation and maze solving.
///
/// `Cancelled` and `NoPathFound` both mean "no result", but they are kept apart so
/// the caller can tell a user abort from a search that ran dry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("invalid maze dimensions {width}x{height}: width and height must be at least 1")]
    InvalidDimensions { width: u16, height: u16 },
    #[error("start cell {0} is not part of the maze")]
    StartNotFound(Cell),
    #[error("end cell {0} is not part of the maze")]
    EndNotFound(Cell),
    #[error("no path found from {start} to {end}")]
    NoPathFound { start: Cell, end: Cell },
    #[error("cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, MazeError>;
