//! Run state and core session types
//!
//! Everything a single player's run owns lives here. The maze itself is shared
//! and read-only; only the pose, phase and clock change per tick.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::grid::Coord;
use super::motion::cell_at;
use crate::consts::START_POSITION;
use crate::normalize_angle;

/// Continuous viewer position plus heading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// x ↔ column, y ↔ row, in grid units
    pub position: DVec2,
    /// Radians in [0, 2π). 0 faces east, π/2 faces south.
    pub heading: f64,
}

impl Pose {
    pub fn new(position: DVec2, heading: f64) -> Self {
        Self {
            position,
            heading: normalize_angle(heading),
        }
    }

    /// Centre of the start cell, facing east
    pub fn start() -> Self {
        Self::new(START_POSITION, 0.0)
    }

    /// Unit vector along the heading
    pub fn forward(&self) -> DVec2 {
        DVec2::new(self.heading.cos(), self.heading.sin())
    }

    /// Return a copy turned by `delta` radians
    pub fn rotated(&self, delta: f64) -> Self {
        Self::new(self.position, self.heading + delta)
    }

    pub fn cell(&self, size: usize) -> Coord {
        cell_at(self.position, size)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::start()
    }
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// Waiting in the lobby
    #[default]
    Ready,
    /// Timer running, input accepted
    Playing,
    /// Goal reached; terminal until the next `start`
    Complete,
}

/// Something the caller should react to after a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RunEvent {
    /// Occupied cell changed (for the overview map)
    EnteredCell(Coord),
    /// Goal reached. Emitted once per run.
    Completed { elapsed_ms: u64 },
}

/// A single player's run (small, `Copy`, replaced wholesale every tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub pose: Pose,
    /// Cell occupied at the end of the last tick
    pub cell: Coord,
    pub phase: RunPhase,
    /// Seconds of simulated play
    pub elapsed_secs: f64,
}

impl RunState {
    /// Fresh run waiting to start
    pub fn new() -> Self {
        Self {
            pose: Pose::start(),
            cell: Coord::new(0, 0),
            phase: RunPhase::Ready,
            elapsed_secs: 0.0,
        }
    }

    /// Begin (or restart) a run from the start cell
    pub fn start(&self) -> Self {
        Self {
            phase: RunPhase::Playing,
            ..Self::new()
        }
    }

    /// Back to the lobby, discarding progress
    pub fn reset(&self) -> Self {
        Self::new()
    }

    pub fn is_playing(&self) -> bool {
        self.phase == RunPhase::Playing
    }

    pub fn elapsed_ms(&self) -> u64 {
        (self.elapsed_secs.max(0.0) * 1000.0).round() as u64
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
