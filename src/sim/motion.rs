//! Continuous, collision-aware movement through the maze
//!
//! Walls have no thickness. A position is kept at least `CLAMP_EPSILON` away
//! from any closed boundary so `floor()` of each coordinate always names the
//! occupied cell.

use glam::DVec2;

use super::grid::{Coord, Direction};
use super::maze::Maze;

/// Largest per-axis movement in one sub-step (grid units)
pub const MAX_SUB_STEP: f64 = 0.05;
/// Gap kept between the position and a closed wall
pub const CLAMP_EPSILON: f64 = 1e-4;
/// Hard cap on sub-steps per call. Bounds the loop even when rounding keeps
/// the remaining displacement from reaching zero, and limits the distance
/// covered by one call to `MAX_SUB_STEPS * MAX_SUB_STEP`.
pub const MAX_SUB_STEPS: u32 = 200;
/// Remaining displacement below this counts as done
const SETTLE_EPSILON: f64 = 1e-6;

/// Cell occupied by a continuous position (x ↔ column, y ↔ row)
pub fn cell_at(position: DVec2, size: usize) -> Coord {
    let last = size.saturating_sub(1);
    // `as usize` saturates negatives and NaN to 0
    let col = (position.x.floor() as usize).min(last);
    let row = (position.y.floor() as usize).min(last);
    Coord::new(row, col)
}

/// Pull a position back inside the grid interior.
///
/// Non-finite coordinates are reset to the centre of the first row/column.
pub fn clamp_to_grid(position: DVec2, size: usize) -> DVec2 {
    if size == 0 {
        return position;
    }
    let max = size as f64 - CLAMP_EPSILON;
    let axis = |v: f64| {
        if v.is_finite() {
            v.clamp(CLAMP_EPSILON, max)
        } else {
            0.5
        }
    };
    DVec2::new(axis(position.x), axis(position.y))
}

/// Move `position` by `delta`, stopping short of closed walls.
///
/// The request is split into sub-steps of at most `MAX_SUB_STEP` per axis so
/// a large displacement cannot tunnel through a wall. Within each sub-step the
/// horizontal axis is resolved before the vertical one, which lets the mover
/// slide along a wall and round corners.
pub fn integrate_motion(position: DVec2, delta: DVec2, maze: &Maze) -> DVec2 {
    if maze.is_empty() {
        return position;
    }

    let start = clamp_to_grid(position, maze.size());
    if start != position && position.is_finite() {
        log::warn!(
            "Position ({:.4}, {:.4}) outside the grid, clamped to ({:.4}, {:.4})",
            position.x,
            position.y,
            start.x,
            start.y
        );
    }

    let mut pos = start;
    let mut remaining = DVec2::new(finite_or_zero(delta.x), finite_or_zero(delta.y));

    for _ in 0..MAX_SUB_STEPS {
        if remaining.x.abs() <= SETTLE_EPSILON && remaining.y.abs() <= SETTLE_EPSILON {
            break;
        }

        let new_x = slide_x(maze, pos, limit_step(remaining.x));
        let moved_x = new_x - pos.x;
        pos.x = new_x;
        remaining.x -= moved_x;

        let new_y = slide_y(maze, pos, limit_step(remaining.y));
        let moved_y = new_y - pos.y;
        pos.y = new_y;
        remaining.y -= moved_y;

        // Pinned on every axis that still wants to move; the next sub-step
        // would be identical.
        if moved_x.abs() < SETTLE_EPSILON && moved_y.abs() < SETTLE_EPSILON {
            break;
        }
    }

    pos
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

fn limit_step(remaining: f64) -> f64 {
    remaining.clamp(-MAX_SUB_STEP, MAX_SUB_STEP)
}

fn slide_x(maze: &Maze, pos: DVec2, dx: f64) -> f64 {
    if dx == 0.0 {
        return pos.x;
    }
    let cell = cell_at(pos, maze.size());
    let left = cell.col as f64;
    let mut x = pos.x + dx;

    if dx > 0.0 {
        if !maze.is_open(cell, Direction::East) {
            x = x.min(left + 1.0 - CLAMP_EPSILON);
        }
    } else if !maze.is_open(cell, Direction::West) {
        x = x.max(left + CLAMP_EPSILON);
    }

    x.clamp(CLAMP_EPSILON, maze.size() as f64 - CLAMP_EPSILON)
}

fn slide_y(maze: &Maze, pos: DVec2, dy: f64) -> f64 {
    if dy == 0.0 {
        return pos.y;
    }
    let cell = cell_at(pos, maze.size());
    let top = cell.row as f64;
    let mut y = pos.y + dy;

    if dy > 0.0 {
        if !maze.is_open(cell, Direction::South) {
            y = y.min(top + 1.0 - CLAMP_EPSILON);
        }
    } else if !maze.is_open(cell, Direction::North) {
        y = y.max(top + CLAMP_EPSILON);
    }

    y.clamp(CLAMP_EPSILON, maze.size() as f64 - CLAMP_EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze::tests::walls_symmetric;
    use crate::sim::rng::SeededRng;
    use crate::sim::solver::solve_between;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn open_row(size: usize, row: usize) -> Maze {
        let mut maze = Maze::closed(size).unwrap();
        for col in 1..size {
            maze.open_passage(Coord::new(row, col - 1), Coord::new(row, col))
                .unwrap();
        }
        maze
    }

    #[test]
    fn test_stops_short_of_closed_wall() {
        let mut maze = Maze::closed(4).unwrap();
        maze.open_passage(Coord::new(0, 0), Coord::new(0, 1)).unwrap();

        let pos = integrate_motion(DVec2::new(0.5, 0.5), DVec2::new(5.0, 0.0), &maze);
        assert!((pos.x - (2.0 - CLAMP_EPSILON)).abs() < EPS);
        assert!((pos.y - 0.5).abs() < EPS);
        assert_eq!(cell_at(pos, 4), Coord::new(0, 1));

        let pos = integrate_motion(DVec2::new(0.5, 0.5), DVec2::new(0.0, 3.0), &maze);
        assert!((pos.y - (1.0 - CLAMP_EPSILON)).abs() < EPS);
        assert_eq!(cell_at(pos, 4), Coord::new(0, 0));
    }

    #[test]
    fn test_outer_edge_is_closed() {
        let maze = open_row(4, 0);
        let pos = integrate_motion(DVec2::new(0.5, 0.5), DVec2::new(-2.0, -2.0), &maze);
        assert!((pos.x - CLAMP_EPSILON).abs() < EPS);
        assert!((pos.y - CLAMP_EPSILON).abs() < EPS);

        let pos = integrate_motion(DVec2::new(3.5, 0.5), DVec2::new(2.0, 0.0), &maze);
        assert!((pos.x - (4.0 - CLAMP_EPSILON)).abs() < EPS);
    }

    #[test]
    fn test_sub_step_cap_bounds_travel() {
        let maze = open_row(16, 0);
        let pos = integrate_motion(DVec2::new(0.5, 0.5), DVec2::new(15.0, 0.0), &maze);
        let cap = MAX_SUB_STEPS as f64 * MAX_SUB_STEP;
        assert!((pos.x - (0.5 + cap)).abs() < 1e-9);
    }

    #[test]
    fn test_slides_around_corner() {
        let mut maze = Maze::closed(2).unwrap();
        maze.open_passage(Coord::new(0, 0), Coord::new(1, 0)).unwrap();
        maze.open_passage(Coord::new(1, 0), Coord::new(1, 1)).unwrap();

        let pos = integrate_motion(DVec2::new(0.5, 0.5), DVec2::new(1.0, 1.0), &maze);
        assert_eq!(cell_at(pos, 2), Coord::new(1, 1));
        assert!((pos.x - 1.5).abs() < 1e-6);
        assert!((pos.y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_bounds_start_is_clamped() {
        let maze = open_row(4, 0);
        let pos = integrate_motion(DVec2::new(-3.0, 7.0), DVec2::ZERO, &maze);
        assert!((pos.x - CLAMP_EPSILON).abs() < EPS);
        assert!((pos.y - (4.0 - CLAMP_EPSILON)).abs() < EPS);

        let pos = integrate_motion(DVec2::new(f64::NAN, 0.5), DVec2::ZERO, &maze);
        assert_eq!(pos, DVec2::new(0.5, 0.5));
    }

    #[test]
    fn test_non_finite_delta_is_ignored() {
        let maze = open_row(4, 0);
        let start = DVec2::new(1.5, 0.5);
        let pos = integrate_motion(start, DVec2::new(f64::INFINITY, f64::NAN), &maze);
        assert_eq!(pos, start);
    }

    #[test]
    fn test_empty_maze_returns_input() {
        let start = DVec2::new(0.5, 0.5);
        assert_eq!(
            integrate_motion(start, DVec2::new(1.0, 0.0), &Maze::default()),
            start
        );
    }

    #[test]
    fn test_idempotent_for_identical_inputs() {
        let maze = Maze::build(8, "2024-01-01").unwrap();
        let a = integrate_motion(DVec2::new(0.5, 0.5), DVec2::new(0.7, 0.3), &maze);
        let b = integrate_motion(DVec2::new(0.5, 0.5), DVec2::new(0.7, 0.3), &maze);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_never_crosses_closed_wall(
            size in 2usize..10,
            seed in any::<u64>(),
            steps in prop::collection::vec((-0.6f64..0.6, -0.6f64..0.6), 1..60),
        ) {
            let maze = Maze::generate(size, &mut SeededRng::new(seed)).unwrap();
            let mut pos = DVec2::new(0.5, 0.5);

            for (dx, dy) in steps {
                let before = cell_at(pos, size);
                pos = integrate_motion(pos, DVec2::new(dx, dy), &maze);
                let after = cell_at(pos, size);

                prop_assert!(pos.x > 0.0 && pos.x < size as f64);
                prop_assert!(pos.y > 0.0 && pos.y < size as f64);

                // The route actually taken is a monotone staircase through open
                // walls, so in a tree its length matches the Manhattan distance.
                let route = solve_between(&maze, before, after);
                prop_assert_eq!(route.len() - 1, before.manhattan(after));
            }
            prop_assert!(walls_symmetric(&maze));
        }
    }
}
