//! First-person projection by grid raycasting
//!
//! Each screen column casts one ray through the cell grid with a DDA walk:
//! always cross whichever boundary (vertical or horizontal) is nearer along the
//! ray, and stop at the first closed wall.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::grid::{Coord, Direction};
use super::maze::Maze;
use super::motion::clamp_to_grid;
use super::state::Pose;

/// Number of depth shades handed to the renderer
pub const SHADE_LEVELS: usize = 4;

/// Nearest distance used when turning a distance into a wall height
const MIN_PROJECTED_DISTANCE: f64 = 1e-3;

/// Axis of the wall face a ray stopped at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallOrientation {
    /// Ray crossed an x boundary (a north-south wall)
    Vertical,
    /// Ray crossed a y boundary (an east-west wall)
    Horizontal,
    /// Ray ran out of range before hitting anything
    None,
}

/// Result of a single ray
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Raw distance along the ray to the wall (or the range limit)
    pub distance: f64,
    pub orientation: WallOrientation,
    /// Distance along the ray to the goal cell's centre, if the ray passed through it
    pub goal_distance: Option<f64>,
}

/// Cast one ray from `origin` at `angle` (radians, 0 = east, π/2 = south)
pub fn cast_ray(maze: &Maze, origin: DVec2, angle: f64, max_distance: f64) -> RayHit {
    let size = maze.size();
    if size == 0 {
        return RayHit {
            distance: 0.0,
            orientation: WallOrientation::None,
            goal_distance: None,
        };
    }

    let dir = DVec2::new(angle.cos(), angle.sin());
    let step_x = axis_step(dir.x);
    let step_y = axis_step(dir.y);
    let delta_x = axis_delta(dir.x);
    let delta_y = axis_delta(dir.y);
    let mut side_x = first_crossing(origin.x, step_x, delta_x);
    let mut side_y = first_crossing(origin.y, step_y, delta_y);

    let last = size - 1;
    let mut col = (origin.x.floor().max(0.0) as usize).min(last);
    let mut row = (origin.y.floor().max(0.0) as usize).min(last);
    let goal = maze.goal();

    let mut goal_distance = (Coord::new(row, col) == goal).then_some(0.0);
    let mut hit = RayHit {
        distance: max_distance,
        orientation: WallOrientation::None,
        goal_distance: None,
    };

    let max_iterations = size * size * 4;
    for _ in 0..max_iterations {
        let crosses_vertical = side_x < side_y;
        let boundary = if crosses_vertical { side_x } else { side_y };
        if boundary > max_distance {
            break;
        }

        let here = Coord::new(row, col);
        if crosses_vertical {
            let wall = if step_x > 0 { Direction::East } else { Direction::West };
            if step_x == 0 || !maze.is_open(here, wall) {
                hit.distance = boundary;
                hit.orientation = WallOrientation::Vertical;
                break;
            }
            col = col.wrapping_add_signed(step_x);
            side_x += delta_x;
        } else {
            let wall = if step_y > 0 { Direction::South } else { Direction::North };
            if step_y == 0 || !maze.is_open(here, wall) {
                hit.distance = boundary;
                hit.orientation = WallOrientation::Horizontal;
                break;
            }
            row = row.wrapping_add_signed(step_y);
            side_y += delta_y;
        }

        if goal_distance.is_none() && Coord::new(row, col) == goal {
            let centre = DVec2::new(goal.col as f64 + 0.5, goal.row as f64 + 0.5);
            let projected = (centre - origin).dot(dir);
            if projected > 0.0 {
                goal_distance = Some(projected);
            }
        }
    }

    hit.goal_distance = goal_distance;
    hit
}

fn axis_step(component: f64) -> isize {
    if component > 0.0 {
        1
    } else if component < 0.0 {
        -1
    } else {
        0
    }
}

/// Ray length between successive boundaries on one axis
fn axis_delta(component: f64) -> f64 {
    if component == 0.0 {
        f64::INFINITY
    } else {
        (1.0 / component).abs()
    }
}

/// Ray length to the first boundary on one axis
fn first_crossing(origin: f64, step: isize, delta: f64) -> f64 {
    match step {
        0 => f64::INFINITY,
        s if s > 0 => (origin.floor() + 1.0 - origin) * delta,
        _ => (origin - origin.floor()) * delta,
    }
}

/// One screen column of the first-person view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnSample {
    /// Absolute ray angle
    pub angle: f64,
    /// Raw ray distance
    pub distance: f64,
    /// Fish-eye corrected distance (perpendicular to the view direction)
    pub corrected_distance: f64,
    pub orientation: WallOrientation,
    /// Depth shade, 0 = nearest
    pub shade: usize,
    /// Raw distance to the goal centre along this ray, if visible
    pub goal_distance: Option<f64>,
}

impl ColumnSample {
    /// Wall height for a viewport `viewport_height` tall, capped to the viewport
    pub fn wall_height(&self, viewport_height: f64) -> f64 {
        (viewport_height / self.corrected_distance.max(MIN_PROJECTED_DISTANCE))
            .min(viewport_height)
    }
}

/// A full first-person frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub columns: Vec<ColumnSample>,
    /// Column that best faces the goal, if any ray saw it
    pub goal_column: Option<usize>,
}

impl Projection {
    /// "No data" result
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Fish-eye corrected goal distance in the goal column
    pub fn goal_distance(&self) -> Option<f64> {
        let column = self.columns.get(self.goal_column?)?;
        let raw = column.distance.max(MIN_PROJECTED_DISTANCE);
        column
            .goal_distance
            .map(|d| d * column.corrected_distance / raw)
    }
}

/// Map a corrected distance to a shade index in `[0, SHADE_LEVELS)`
pub fn shade_for(distance: f64, max_depth: f64) -> usize {
    if max_depth.is_nan() || max_depth <= 0.0 || !distance.is_finite() {
        return SHADE_LEVELS - 1;
    }
    let level = (distance.max(0.0) / max_depth * SHADE_LEVELS as f64).floor() as usize;
    level.min(SHADE_LEVELS - 1)
}

/// Render the view from `pose` as `column_count` evenly spaced rays across `fov`.
///
/// `fov` must lie in (0, π), otherwise the view is empty. A pose outside the
/// grid is viewed from its clamped position.
pub fn project(
    maze: &Maze,
    pose: &Pose,
    fov: f64,
    column_count: usize,
    max_depth: f64,
) -> Projection {
    if maze.is_empty() || column_count == 0 {
        return Projection::empty();
    }
    if !fov.is_finite() || fov <= 0.0 || fov >= std::f64::consts::PI {
        log::warn!("Field of view {fov} outside (0, π), nothing projected");
        return Projection::empty();
    }

    let max_distance = maze.size() as f64 * std::f64::consts::SQRT_2;
    let origin = clamp_to_grid(pose.position, maze.size());
    let goal = maze.goal();
    let goal_centre = DVec2::new(goal.col as f64 + 0.5, goal.row as f64 + 0.5);
    let to_goal = goal_centre - origin;
    let goal_bearing = to_goal.y.atan2(to_goal.x);

    let mut columns = Vec::with_capacity(column_count);
    let mut goal_column: Option<(usize, f64)> = None;

    for i in 0..column_count {
        let offset = -fov / 2.0 + fov * (i as f64 + 0.5) / column_count as f64;
        let angle = pose.heading + offset;
        let ray = cast_ray(maze, origin, angle, max_distance);
        let corrected = ray.distance * offset.cos();

        if ray.goal_distance.is_some() {
            let miss = angle_between(angle, goal_bearing);
            if goal_column.is_none_or(|(_, best)| miss < best) {
                goal_column = Some((i, miss));
            }
        }

        columns.push(ColumnSample {
            angle,
            distance: ray.distance,
            corrected_distance: corrected,
            orientation: ray.orientation,
            shade: shade_for(corrected, max_depth),
            goal_distance: ray.goal_distance,
        });
    }

    Projection {
        columns,
        goal_column: goal_column.map(|(i, _)| i),
    }
}

/// Absolute angular difference folded into [0, π]
fn angle_between(a: f64, b: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let diff = (a - b).rem_euclid(TAU);
    if diff > PI { TAU - diff } else { diff }
}
