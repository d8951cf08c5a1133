//! Daily Maze - one seeded maze per calendar day, raced in first person
//!
//! Core modules:
//! - `sim`: Deterministic core (maze generation, solving, motion, raycasting, run ticks)
//! - `daily`: Day keys and the shared maze of the day
//! - `leaderboard`: Ranked finishes for the current day
//! - `settings`: Tunables loaded from JSON
//! - `error`: Error types

pub mod daily;
pub mod error;
pub mod leaderboard;
pub mod settings;
pub mod sim;

pub use daily::{DailyChallenge, DailyMaze, day_key, format_duration};
pub use error::{LeaderboardError, MazeError, SettingsError};
pub use leaderboard::{DailyLeaderboard, LeaderboardEntry, Submission};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    use glam::DVec2;

    /// Side length of the daily maze
    pub const MAZE_SIZE: usize = 40;

    /// Where every run begins (centre of the start cell)
    pub const START_POSITION: DVec2 = DVec2::new(0.5, 0.5);

    /// Player movement speed (cells per second)
    pub const MOVE_SPEED: f64 = 1.0;
    /// Player turn speed (radians per second)
    pub const TURN_SPEED: f64 = std::f64::consts::PI * 1.4;
    /// Longest frame the run update accepts (seconds)
    pub const MAX_FRAME_DT: f64 = 0.12;

    /// Horizontal field of view of the first-person camera
    pub const FIELD_OF_VIEW: f64 = std::f64::consts::FRAC_PI_3;
    /// Rays cast per frame
    pub const COLUMN_COUNT: usize = 120;
    /// Distance at which walls reach the darkest shade
    pub const MAX_SHADE_DEPTH: f64 = 8.0;

    /// Leaderboard size
    pub const LEADERBOARD_LIMIT: usize = 10;
    /// Longest accepted nickname (characters)
    pub const MAX_NICKNAME_LEN: usize = 32;
    /// Hours east of UTC at which the daily maze rolls over (KST)
    pub const DAY_OFFSET_HOURS: i32 = 9;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}
