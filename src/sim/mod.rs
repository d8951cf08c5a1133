//! Deterministic maze core
//!
//! Everything in here is pure and deterministic:
//! - Seeded RNG only, passed explicitly
//! - Fixed neighbour enumeration order
//! - Bounded loops with explicit caps
//! - No rendering, clock or platform dependencies

pub mod grid;
pub mod maze;
pub mod motion;
pub mod raycast;
pub mod rng;
pub mod solver;
pub mod state;
pub mod tick;

pub use grid::{Cell, Coord, Direction, Walls};
pub use maze::{MAX_MAZE_SIZE, Maze};
pub use motion::{
    CLAMP_EPSILON, MAX_SUB_STEP, MAX_SUB_STEPS, cell_at, clamp_to_grid, integrate_motion,
};
pub use raycast::{
    ColumnSample, Projection, RayHit, SHADE_LEVELS, WallOrientation, cast_ray, project, shade_for,
};
pub use rng::{SeededRng, hash_to_seed};
pub use solver::{is_valid_solution, solve, solve_between};
pub use state::{Pose, RunEvent, RunPhase, RunState};
pub use tick::{MotionTuning, TickInput, TickOutcome, tick};
