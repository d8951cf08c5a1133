//! Daily leaderboard
//!
//! Ranks finishes by how early in the day they were recorded, ties broken by
//! the faster run. The board only holds one day; a submission for a new
//! day-key clears it first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::consts::{LEADERBOARD_LIMIT, MAX_NICKNAME_LEN};
use crate::error::LeaderboardError;

/// A single finish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub nickname: String,
    /// When the run finished
    pub completed_at: DateTime<Utc>,
    /// How long the run took
    pub duration_ms: u64,
}

/// Outcome of a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub entry: LeaderboardEntry,
    /// 1-indexed rank, `None` if the entry did not make the board
    pub rank: Option<usize>,
    /// The board after insertion
    pub entries: Vec<LeaderboardEntry>,
}

/// Top finishes for one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLeaderboard {
    day_key: String,
    limit: usize,
    entries: Vec<LeaderboardEntry>,
}

impl DailyLeaderboard {
    /// Empty board for `day_key` holding at most `limit` entries
    pub fn new(day_key: &str, limit: usize) -> Self {
        Self {
            day_key: day_key.to_string(),
            limit: limit.max(1),
            entries: Vec::new(),
        }
    }

    pub fn day_key(&self) -> &str {
        &self.day_key
    }

    /// Copy of the current board, best first
    pub fn entries(&self) -> Vec<LeaderboardEntry> {
        self.entries.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Switch to `day_key`, dropping the previous day's entries. Returns
    /// `true` if the day changed.
    pub fn roll_over(&mut self, day_key: &str) -> bool {
        if self.day_key == day_key {
            return false;
        }
        log::info!(
            "Leaderboard rolled over from {} to {day_key} ({} entries dropped)",
            self.day_key,
            self.entries.len()
        );
        self.day_key = day_key.to_string();
        self.entries.clear();
        true
    }

    /// Record a finish for `day_key`
    pub fn record(
        &mut self,
        day_key: &str,
        nickname: &str,
        completed_at: DateTime<Utc>,
        duration_ms: u64,
    ) -> Result<Submission, LeaderboardError> {
        let nickname = validate_nickname(nickname)?;
        self.roll_over(day_key);

        let entry = LeaderboardEntry {
            nickname,
            completed_at,
            duration_ms,
        };

        // Find insertion point (ascending finish time, then duration)
        let pos = self
            .entries
            .iter()
            .position(|e| ranks_before(&entry, e))
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry.clone());
        self.entries.truncate(self.limit);

        let rank = (pos < self.limit).then_some(pos + 1);
        match rank {
            Some(rank) => log::info!("{} placed #{rank} on {}", entry.nickname, self.day_key),
            None => log::debug!("{} did not make the board", entry.nickname),
        }

        Ok(Submission {
            entry,
            rank,
            entries: self.entries(),
        })
    }
}

fn ranks_before(a: &LeaderboardEntry, b: &LeaderboardEntry) -> bool {
    (a.completed_at, a.duration_ms) < (b.completed_at, b.duration_ms)
}

/// Trim and length-check a nickname
pub fn validate_nickname(raw: &str) -> Result<String, LeaderboardError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LeaderboardError::EmptyNickname);
    }
    let len = trimmed.chars().count();
    if len > MAX_NICKNAME_LEN {
        return Err(LeaderboardError::NicknameTooLong {
            len,
            max: MAX_NICKNAME_LEN,
        });
    }
    Ok(trimmed.to_string())
}

impl Default for DailyLeaderboard {
    fn default() -> Self {
        Self::new("", LEADERBOARD_LIMIT)
    }
}
