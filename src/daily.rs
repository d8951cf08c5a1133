//! The maze of the day
//!
//! A day-key seeds one maze that every player shares. On rollover a brand new
//! `DailyMaze` is built and swapped in; runs holding the previous `Arc` keep
//! playing on the maze they started with.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::error::Result;
use crate::sim::{Coord, Maze, solve};

/// Calendar date (`YYYY-MM-DD`) of `now` in a zone `offset_hours` east of UTC
pub fn day_key(now: DateTime<Utc>, offset_hours: i32) -> String {
    let offset = FixedOffset::east_opt(offset_hours.saturating_mul(3600)).unwrap_or_else(|| {
        log::warn!("Day offset of {offset_hours}h is out of range, using UTC");
        Utc.fix()
    });
    now.with_timezone(&offset)
        .date_naive()
        .format("%Y-%m-%d")
        .to_string()
}

/// Format a run time as `MM:SS.t`
pub fn format_duration(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!(
        "{:02}:{:02}.{}",
        total_secs / 60,
        total_secs % 60,
        (ms % 1000) / 100
    )
}

/// One day's maze and its lazily computed solution
#[derive(Debug)]
pub struct DailyMaze {
    day_key: String,
    maze: Arc<Maze>,
    solution: OnceLock<Vec<Coord>>,
}

impl DailyMaze {
    pub fn build(day_key: &str, size: usize) -> Result<Self> {
        let maze = Maze::build(size, day_key)?;
        Ok(Self {
            day_key: day_key.to_string(),
            maze: Arc::new(maze),
            solution: OnceLock::new(),
        })
    }

    pub fn day_key(&self) -> &str {
        &self.day_key
    }

    pub fn maze(&self) -> &Arc<Maze> {
        &self.maze
    }

    /// Start→goal route, solved on first use and cached for this maze
    pub fn solution(&self) -> &[Coord] {
        self.solution.get_or_init(|| {
            let path = solve(&self.maze);
            log::debug!(
                "Solved maze for {}: {} cells on the route",
                self.day_key,
                path.len()
            );
            path
        })
    }
}

/// Keeps the current `DailyMaze` in step with the clock
#[derive(Debug)]
pub struct DailyChallenge {
    size: usize,
    offset_hours: i32,
    current: Arc<DailyMaze>,
}

impl DailyChallenge {
    pub fn new(size: usize, offset_hours: i32, now: DateTime<Utc>) -> Result<Self> {
        let key = day_key(now, offset_hours);
        let current = Arc::new(DailyMaze::build(&key, size)?);
        log::info!("Daily maze ready for {key} ({size}x{size})");
        Ok(Self {
            size,
            offset_hours,
            current,
        })
    }

    /// Today's maze. Hold on to the `Arc` for the length of a run.
    pub fn current(&self) -> Arc<DailyMaze> {
        Arc::clone(&self.current)
    }

    pub fn day_key(&self) -> &str {
        self.current.day_key()
    }

    /// Rebuild if the day changed. Returns `true` on rollover.
    pub fn refresh(&mut self, now: DateTime<Utc>) -> Result<bool> {
        let key = day_key(now, self.offset_hours);
        if key == self.current.day_key() {
            return Ok(false);
        }
        let next = DailyMaze::build(&key, self.size)?;
        log::info!("Day rolled over from {} to {key}", self.current.day_key());
        self.current = Arc::new(next);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::is_valid_solution;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_day_key_respects_offset() {
        let now = at(2024, 1, 1, 16);
        assert_eq!(day_key(now, 0), "2024-01-01");
        assert_eq!(day_key(now, 9), "2024-01-02");
        assert_eq!(day_key(at(2024, 1, 1, 2), -5), "2023-12-31");
        // Invalid offsets fall back to UTC
        assert_eq!(day_key(now, 48), "2024-01-01");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00.0");
        assert_eq!(format_duration(61_250), "01:01.2");
        assert_eq!(format_duration(3_599_999), "59:59.9");
    }

    #[test]
    fn test_solution_is_cached() {
        let daily = DailyMaze::build("2024-01-01", 8).unwrap();
        let first = daily.solution().as_ptr();
        let second = daily.solution().as_ptr();
        assert_eq!(first, second);
        assert!(is_valid_solution(daily.maze(), daily.solution()));
    }

    #[test]
    fn test_rollover_swaps_maze_wholesale() {
        let mut challenge = DailyChallenge::new(8, 0, at(2024, 1, 1, 10)).unwrap();
        let in_progress = challenge.current();
        let snapshot = (**in_progress.maze()).clone();

        assert!(!challenge.refresh(at(2024, 1, 1, 23)).unwrap());
        assert!(Arc::ptr_eq(&in_progress, &challenge.current()));

        assert!(challenge.refresh(at(2024, 1, 2, 0)).unwrap());
        assert_eq!(challenge.day_key(), "2024-01-02");
        assert!(!Arc::ptr_eq(&in_progress, &challenge.current()));
        // The run that started yesterday still sees yesterday's maze
        assert_eq!(**in_progress.maze(), snapshot);
        assert_eq!(in_progress.day_key(), "2024-01-01");
    }

    #[test]
    fn test_invalid_size_is_an_error() {
        assert!(DailyChallenge::new(0, 9, at(2024, 1, 1, 0)).is_err());
    }
}
