//! Shortest-path solver (breadth-first over open walls)

use std::collections::VecDeque;

use super::grid::Coord;
use super::maze::Maze;

/// Shortest route from the start to the goal.
///
/// Empty only if the goal is unreachable, which a built maze never allows.
pub fn solve(maze: &Maze) -> Vec<Coord> {
    if maze.is_empty() {
        return Vec::new();
    }
    let path = solve_between(maze, maze.start(), maze.goal());
    if path.is_empty() {
        log::error!(
            "No route from start to goal in a {0}x{0} maze; the maze is not fully connected",
            maze.size()
        );
    }
    path
}

/// Shortest route between two cells, inclusive of both ends
pub fn solve_between(maze: &Maze, from: Coord, to: Coord) -> Vec<Coord> {
    if !maze.contains(from) || !maze.contains(to) {
        return Vec::new();
    }

    let size = maze.size();
    let index = |c: Coord| c.row * size + c.col;
    let mut visited = vec![false; size * size];
    let mut parent: Vec<Option<Coord>> = vec![None; size * size];
    let mut queue = VecDeque::new();

    visited[index(from)] = true;
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        if current == to {
            break;
        }
        for next in maze.open_neighbors(current) {
            if visited[index(next)] {
                continue;
            }
            visited[index(next)] = true;
            parent[index(next)] = Some(current);
            queue.push_back(next);
        }
    }

    if !visited[index(to)] {
        return Vec::new();
    }

    let mut path = Vec::new();
    let mut cursor = Some(to);
    while let Some(c) = cursor {
        path.push(c);
        cursor = parent[index(c)];
    }
    path.reverse();
    path
}

/// Whether `path` runs start→goal with each step through an open wall
pub fn is_valid_solution(maze: &Maze, path: &[Coord]) -> bool {
    match (path.first(), path.last()) {
        (Some(first), Some(last)) if *first == maze.start() && *last == maze.goal() => path
            .windows(2)
            .all(|pair| maze.open_neighbors(pair[0]).any(|n| n == pair[1])),
        _ => false,
    }
}
