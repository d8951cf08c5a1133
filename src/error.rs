//! Error types
//!
//! One enum per concern. Library code returns these and propagates with `?`.

use thiserror::Error;

use crate::sim::Coord;

/// Errors raised while constructing or mutating a maze
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze size must be positive")]
    ZeroSize,

    #[error("maze size {size} exceeds the supported maximum of {max}")]
    SizeTooLarge { size: usize, max: usize },

    #[error("seed text must not be empty")]
    EmptySeed,

    #[error("coordinate ({}, {}) is outside a {size}x{size} maze", coord.row, coord.col)]
    OutOfBounds { coord: Coord, size: usize },

    #[error("cells ({}, {}) and ({}, {}) are not adjacent", a.row, a.col, b.row, b.col)]
    NotAdjacent { a: Coord, b: Coord },

    #[error("a {size}x{size} maze needs {expected} cells, found {found}")]
    CellCount {
        size: usize,
        expected: usize,
        found: usize,
    },

    #[error("cell {index} claims coordinate ({}, {})", coord.row, coord.col)]
    MisplacedCell { index: usize, coord: Coord },

    #[error("cell ({}, {}) is open to the outside", coord.row, coord.col)]
    OpenBorder { coord: Coord },

    #[error("wall between ({}, {}) and ({}, {}) is open on one side only", a.row, a.col, b.row, b.col)]
    AsymmetricWall { a: Coord, b: Coord },
}

/// Errors raised when submitting a leaderboard entry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    #[error("nickname is required")]
    EmptyNickname,

    #[error("nickname is {len} characters long, the limit is {max}")]
    NicknameTooLong { len: usize, max: usize },
}

/// Errors raised while loading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, MazeError>;
