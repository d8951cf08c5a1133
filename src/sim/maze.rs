//! Maze grid and the seeded depth-first builder

use serde::{Deserialize, Serialize};

use super::grid::{Cell, Coord, Direction};
use super::rng::SeededRng;
use crate::error::{MazeError, Result};

/// Largest accepted side length
pub const MAX_MAZE_SIZE: usize = 512;

/// A square maze. Built once per day-key and read-only afterwards.
///
/// `Maze::default()` is the zero-cell placeholder used before a maze exists.
/// Deserialized mazes are checked for layout, closed border and wall symmetry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMaze")]
pub struct Maze {
    size: usize,
    /// Row-major
    cells: Vec<Cell>,
}

/// Unchecked wire form of a `Maze`
#[derive(Deserialize)]
struct RawMaze {
    size: usize,
    cells: Vec<Cell>,
}

impl TryFrom<RawMaze> for Maze {
    type Error = MazeError;

    fn try_from(raw: RawMaze) -> Result<Self> {
        let RawMaze { size, cells } = raw;
        if size > MAX_MAZE_SIZE {
            return Err(MazeError::SizeTooLarge {
                size,
                max: MAX_MAZE_SIZE,
            });
        }
        if cells.len() != size * size {
            return Err(MazeError::CellCount {
                size,
                expected: size * size,
                found: cells.len(),
            });
        }

        let maze = Self { size, cells };
        for (index, cell) in maze.cells.iter().enumerate() {
            let coord = Coord::new(index / size, index % size);
            if cell.coord != coord {
                return Err(MazeError::MisplacedCell {
                    index,
                    coord: cell.coord,
                });
            }
            for dir in Direction::ALL {
                if cell.walls().is_closed(dir) {
                    continue;
                }
                let Some(next) = coord.step(dir, size) else {
                    return Err(MazeError::OpenBorder { coord });
                };
                if maze.cells[maze.index(next)].walls().is_closed(dir.opposite()) {
                    return Err(MazeError::AsymmetricWall { a: coord, b: next });
                }
            }
        }
        Ok(maze)
    }
}

impl Maze {
    /// A `size`x`size` grid with every wall closed
    pub fn closed(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(MazeError::ZeroSize);
        }
        if size > MAX_MAZE_SIZE {
            return Err(MazeError::SizeTooLarge {
                size,
                max: MAX_MAZE_SIZE,
            });
        }

        let cells = (0..size * size)
            .map(|i| Cell::closed(Coord::new(i / size, i % size)))
            .collect();
        Ok(Self { size, cells })
    }

    /// Build the maze for a seed text (normally the day-key)
    pub fn build(size: usize, seed_text: &str) -> Result<Self> {
        if seed_text.trim().is_empty() {
            return Err(MazeError::EmptySeed);
        }
        let mut rng = SeededRng::from_text(seed_text);
        let maze = Self::generate(size, &mut rng)?;
        log::debug!("Built {size}x{size} maze for seed {seed_text:?}");
        Ok(maze)
    }

    /// Carve a perfect maze with a randomized depth-first backtracker.
    ///
    /// Neighbours are considered in `Direction::ALL` order and one is picked
    /// with a single draw from `rng`.
    pub fn generate(size: usize, rng: &mut SeededRng) -> Result<Self> {
        let mut maze = Self::closed(size)?;
        let mut visited = vec![false; size * size];
        let mut stack = Vec::with_capacity(size * size);

        let start = maze.start();
        visited[maze.index(start)] = true;
        stack.push(start);

        let mut candidates: Vec<Coord> = Vec::with_capacity(4);
        while let Some(&current) = stack.last() {
            candidates.clear();
            candidates.extend(
                Direction::ALL
                    .iter()
                    .filter_map(|dir| current.step(*dir, size))
                    .filter(|next| !visited[maze.index(*next)]),
            );

            if candidates.is_empty() {
                stack.pop();
                continue;
            }

            let next = candidates[rng.pick_index(candidates.len())];
            maze.open_passage(current, next)?;
            visited[maze.index(next)] = true;
            stack.push(next);
        }

        debug_assert!(visited.iter().all(|v| *v));
        Ok(maze)
    }

    /// Open the wall between two adjacent cells, on both sides
    pub fn open_passage(&mut self, a: Coord, b: Coord) -> Result<()> {
        self.check_bounds(a)?;
        self.check_bounds(b)?;
        let dir = a.direction_to(b).ok_or(MazeError::NotAdjacent { a, b })?;

        let ia = self.index(a);
        let ib = self.index(b);
        self.cells[ia].walls_mut().open(dir);
        self.cells[ib].walls_mut().open(dir.opposite());
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> Coord {
        Coord::new(0, 0)
    }

    pub fn goal(&self) -> Coord {
        let last = self.size.saturating_sub(1);
        Coord::new(last, last)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.contains(coord).then(|| &self.cells[self.index(coord)])
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Whether one can pass from `coord` towards `dir`. The outer edge is always closed.
    pub fn is_open(&self, coord: Coord, dir: Direction) -> bool {
        match self.cell(coord) {
            Some(cell) => cell.walls().is_open(dir) && coord.step(dir, self.size).is_some(),
            None => false,
        }
    }

    /// Cells reachable from `coord` through one open wall
    pub fn open_neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |dir| self.is_open(coord, *dir))
            .filter_map(move |dir| coord.step(dir, self.size))
    }

    /// Number of open walls between distinct cells (each counted once)
    pub fn open_edge_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                [Direction::East, Direction::South]
                    .iter()
                    .filter(|dir| self.is_open(cell.coord, **dir))
                    .count()
            })
            .sum()
    }

    fn index(&self, coord: Coord) -> usize {
        coord.row * self.size + coord.col
    }

    fn check_bounds(&self, coord: Coord) -> Result<()> {
        if self.contains(coord) {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds {
                coord,
                size: self.size,
            })
        }
    }
}
