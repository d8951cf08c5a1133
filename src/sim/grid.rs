//! Grid coordinates, cardinal directions and per-cell wall flags

use serde::{Deserialize, Serialize};

/// Integer cell coordinate. Rows grow south, columns grow east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Neighbouring coordinate in `dir`, or `None` if it leaves a `size`x`size` grid
    pub fn step(self, dir: Direction, size: usize) -> Option<Coord> {
        let (d_row, d_col) = dir.delta();
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        (row < size && col < size).then_some(Coord { row, col })
    }

    /// Direction from `self` to an orthogonally adjacent `other`
    pub fn direction_to(self, other: Coord) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|dir| self.step(*dir, usize::MAX) == Some(other))
    }

    pub fn manhattan(self, other: Coord) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// Cardinal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Fixed enumeration order. Maze generation depends on it, so changing it
    /// changes which maze every day-key produces.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// (row, col) offset
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub fn rotate_left(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::East => Direction::North,
            Direction::South => Direction::East,
            Direction::West => Direction::South,
        }
    }

    pub fn rotate_right(self) -> Self {
        self.rotate_left().opposite()
    }
}

/// Wall flags of a single cell (`true` = closed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Walls {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl Walls {
    pub const CLOSED: Walls = Walls {
        north: true,
        east: true,
        south: true,
        west: true,
    };

    pub fn is_closed(&self, dir: Direction) -> bool {
        match dir {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    pub fn is_open(&self, dir: Direction) -> bool {
        !self.is_closed(dir)
    }

    /// Only `Maze::open_passage` may call this, so both sides stay in sync
    pub(crate) fn open(&mut self, dir: Direction) {
        match dir {
            Direction::North => self.north = false,
            Direction::East => self.east = false,
            Direction::South => self.south = false,
            Direction::West => self.west = false,
        }
    }

    pub fn open_count(&self) -> usize {
        Direction::ALL.iter().filter(|d| self.is_open(**d)).count()
    }
}

/// A maze cell: its coordinate and wall flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub coord: Coord,
    walls: Walls,
}

impl Cell {
    pub(crate) fn closed(coord: Coord) -> Self {
        Self {
            coord,
            walls: Walls::CLOSED,
        }
    }

    pub fn walls(&self) -> &Walls {
        &self.walls
    }

    pub(crate) fn walls_mut(&mut self) -> &mut Walls {
        &mut self.walls
    }
}
