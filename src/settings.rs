//! Game settings
//!
//! Read from an optional JSON file; any field left out keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::{MAX_MAZE_SIZE, MotionTuning};

/// Camera quality preset (number of rays per frame)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Rays cast per frame for this preset
    pub fn column_count(&self) -> usize {
        match self {
            QualityPreset::Low => COLUMN_COUNT / 2,
            QualityPreset::Medium => COLUMN_COUNT,
            QualityPreset::High => COLUMN_COUNT * 2,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Maze ===
    /// Side length of the daily maze
    pub maze_size: usize,
    /// Hours east of UTC where the day rolls over
    pub day_offset_hours: i32,

    // === Camera ===
    pub quality: QualityPreset,
    /// Horizontal field of view (radians)
    pub field_of_view: f64,
    /// Overrides the preset's ray count when set
    pub column_count: Option<usize>,
    /// Distance at which walls reach the darkest shade
    pub max_shade_depth: f64,

    // === Movement ===
    pub move_speed: f64,
    pub turn_speed: f64,
    pub max_frame_dt: f64,

    // === Leaderboard ===
    pub leaderboard_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            maze_size: MAZE_SIZE,
            day_offset_hours: DAY_OFFSET_HOURS,

            quality: QualityPreset::Medium,
            field_of_view: FIELD_OF_VIEW,
            column_count: None,
            max_shade_depth: MAX_SHADE_DEPTH,

            move_speed: MOVE_SPEED,
            turn_speed: TURN_SPEED,
            max_frame_dt: MAX_FRAME_DT,

            leaderboard_limit: LEADERBOARD_LIMIT,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Load from `path`. A missing file gives the defaults; a malformed or
    /// out-of-range one is an error.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the core cannot work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.maze_size == 0 || self.maze_size > MAX_MAZE_SIZE {
            return Err(invalid(
                "maze_size",
                format!("must be between 1 and {MAX_MAZE_SIZE}"),
            ));
        }
        if !(-23..=23).contains(&self.day_offset_hours) {
            return Err(invalid("day_offset_hours", "must be within ±23".into()));
        }
        if !positive(self.field_of_view) || self.field_of_view >= std::f64::consts::PI {
            return Err(invalid("field_of_view", "must be in (0, π)".into()));
        }
        if self.column_count == Some(0) {
            return Err(invalid("column_count", "must be positive".into()));
        }
        for (field, value) in [
            ("max_shade_depth", self.max_shade_depth),
            ("move_speed", self.move_speed),
            ("turn_speed", self.turn_speed),
            ("max_frame_dt", self.max_frame_dt),
        ] {
            if !positive(value) {
                return Err(invalid(field, "must be positive".into()));
            }
        }
        if self.leaderboard_limit == 0 {
            return Err(invalid("leaderboard_limit", "must be positive".into()));
        }
        Ok(())
    }

    /// Effective ray count
    pub fn column_count(&self) -> usize {
        self.column_count
            .unwrap_or_else(|| self.quality.column_count())
    }

    pub fn motion_tuning(&self) -> MotionTuning {
        MotionTuning {
            move_speed: self.move_speed,
            turn_speed: self.turn_speed,
            max_frame_dt: self.max_frame_dt,
        }
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn invalid(field: &'static str, reason: String) -> SettingsError {
    SettingsError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.maze_size, 40);
        assert_eq!(settings.column_count(), COLUMN_COUNT);
        assert_eq!(settings.motion_tuning(), MotionTuning::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "maze_size": 12, "quality": "high" }"#).unwrap();
        assert_eq!(settings.maze_size, 12);
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.column_count(), COLUMN_COUNT * 2);
        assert_eq!(settings.day_offset_hours, DAY_OFFSET_HOURS);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::from_preset(QualityPreset::Low);
        settings.column_count = Some(33);
        let back = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back, settings);
        assert_eq!(back.column_count(), 33);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{ "maze_size": 0 }"#),
            Err(SettingsError::Invalid { field: "maze_size", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "move_speed": -1.0 }"#),
            Err(SettingsError::Invalid { field: "move_speed", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "field_of_view": 4.0 }"#),
            Err(SettingsError::Invalid { field: "field_of_view", .. })
        ));
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = Path::new("/nonexistent/daily-maze/settings.json");
        assert_eq!(Settings::load(path).unwrap(), Settings::default());
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }
}
