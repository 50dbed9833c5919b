//! Core data types for the Pomodoro widget.
//!
//! This module defines the data structures used for:
//! - Timer phase and run status
//! - State snapshots handed to the display layer
//! - The persisted statistics record
//! - Widget configuration with validation

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Canonical length of a focus phase (45 minutes).
pub const FOCUS_SECONDS: u32 = 45 * 60;

/// Canonical length of a break phase (15 minutes).
pub const BREAK_SECONDS: u32 = 15 * 60;

/// Minutes credited to the focus total for every completed session.
pub const FOCUS_MINUTES_PER_SESSION: u32 = 45;

/// Seconds between a completed focus phase and the switch to break.
pub const DEFAULT_CELEBRATION_DELAY_SECS: u64 = 3;

/// Upper bound accepted for the celebration delay.
pub const MAX_CELEBRATION_DELAY_SECS: u64 = 60;

// ============================================================================
// Phase
// ============================================================================

/// The interval the timer is currently counting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Work interval
    #[default]
    Focus,
    /// Rest interval
    Break,
}

impl Phase {
    /// Returns the canonical duration of the phase in seconds.
    pub fn duration_seconds(&self) -> u32 {
        match self {
            Phase::Focus => FOCUS_SECONDS,
            Phase::Break => BREAK_SECONDS,
        }
    }

    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Focus => "focus",
            Phase::Break => "break",
        }
    }
}

// ============================================================================
// RunStatus
// ============================================================================

/// Whether the countdown is advancing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RunStatus {
    /// Not started, reset, or just completed
    #[default]
    Idle,
    /// Counting down, one tick per second
    Running,
    /// Stopped mid-phase with time remaining
    Paused,
}

impl RunStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Idle => "idle",
            RunStatus::Running => "running",
            RunStatus::Paused => "paused",
        }
    }
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// Point-in-time copy of the engine state for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub status: RunStatus,
    pub phase: Phase,
    pub remaining_seconds: u32,
    pub total_seconds: u32,
}

// ============================================================================
// StatsRecord
// ============================================================================

/// Cumulative statistics, persisted as a single JSON record.
///
/// Missing fields read as zero. `totalFocusTime` is the field name older
/// records used for the focus total and is still accepted on read;
/// `totalFocusMinutes` wins when a record carries both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredStatsRecord")]
pub struct StatsRecord {
    /// Completed focus sessions
    pub session_count: u32,
    /// Minutes credited across all completed focus sessions
    pub total_focus_minutes: u32,
}

/// On-disk shape of [`StatsRecord`], with both names of the focus total.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct StoredStatsRecord {
    session_count: u32,
    total_focus_minutes: Option<u32>,
    total_focus_time: Option<u32>,
}

impl From<StoredStatsRecord> for StatsRecord {
    fn from(stored: StoredStatsRecord) -> Self {
        Self {
            session_count: stored.session_count,
            total_focus_minutes: stored
                .total_focus_minutes
                .or(stored.total_focus_time)
                .unwrap_or(0),
        }
    }
}

// ============================================================================
// WidgetConfig
// ============================================================================

/// Runtime configuration for the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Directory holding the stats record (platform data dir when unset)
    pub data_dir: Option<PathBuf>,
    /// Delay between focus completion and the switch to break
    pub celebration_delay_secs: u64,
    /// Whether completion cues are emitted
    pub sound: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            celebration_delay_secs: DEFAULT_CELEBRATION_DELAY_SECS,
            sound: true,
        }
    }
}

impl WidgetConfig {
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_celebration_delay_secs(mut self, secs: u64) -> Self {
        self.celebration_delay_secs = secs;
        self
    }

    pub fn with_sound(mut self, sound: bool) -> Self {
        self.sound = sound;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.celebration_delay_secs > MAX_CELEBRATION_DELAY_SECS {
            return Err(format!(
                "celebration delay must be between 0 and {} seconds",
                MAX_CELEBRATION_DELAY_SECS
            ));
        }
        if let Some(dir) = &self.data_dir {
            if dir.as_os_str().is_empty() {
                return Err("data directory must not be empty".to_string());
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod phase_tests {
        use super::*;

        #[test]
        fn test_default_is_focus() {
            assert_eq!(Phase::default(), Phase::Focus);
        }

        #[test]
        fn test_durations() {
            assert_eq!(Phase::Focus.duration_seconds(), 2700);
            assert_eq!(Phase::Break.duration_seconds(), 900);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(Phase::Focus.as_str(), "focus");
            assert_eq!(Phase::Break.as_str(), "break");
        }
    }

    mod run_status_tests {
        use super::*;

        #[test]
        fn test_default_is_idle() {
            assert_eq!(RunStatus::default(), RunStatus::Idle);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(RunStatus::Idle.as_str(), "idle");
            assert_eq!(RunStatus::Running.as_str(), "running");
            assert_eq!(RunStatus::Paused.as_str(), "paused");
        }
    }

    mod stats_record_tests {
        use super::*;

        #[test]
        fn test_serializes_camel_case() {
            let record = StatsRecord {
                session_count: 3,
                total_focus_minutes: 135,
            };
            let json = serde_json::to_string(&record).unwrap();
            assert_eq!(json, r#"{"sessionCount":3,"totalFocusMinutes":135}"#);
        }

        #[test]
        fn test_missing_fields_default_to_zero() {
            let record: StatsRecord = serde_json::from_str(r#"{"sessionCount":2}"#).unwrap();
            assert_eq!(record.session_count, 2);
            assert_eq!(record.total_focus_minutes, 0);

            let empty: StatsRecord = serde_json::from_str("{}").unwrap();
            assert_eq!(empty, StatsRecord::default());
        }

        #[test]
        fn test_accepts_legacy_focus_time_field() {
            let record: StatsRecord =
                serde_json::from_str(r#"{"sessionCount":4,"totalFocusTime":180}"#).unwrap();
            assert_eq!(record.total_focus_minutes, 180);
        }

        #[test]
        fn test_current_field_wins_over_legacy_field() {
            let record: StatsRecord = serde_json::from_str(
                r#"{"sessionCount":7,"totalFocusMinutes":315,"totalFocusTime":270}"#,
            )
            .unwrap();
            assert_eq!(record.session_count, 7);
            assert_eq!(record.total_focus_minutes, 315);

            let json = serde_json::to_string(&record).unwrap();
            assert_eq!(json, r#"{"sessionCount":7,"totalFocusMinutes":315}"#);
        }

        #[test]
        fn test_rejects_negative_counts() {
            let result = serde_json::from_str::<StatsRecord>(r#"{"sessionCount":-1}"#);
            assert!(result.is_err());
        }
    }

    mod widget_config_tests {
        use super::*;

        #[test]
        fn test_default() {
            let config = WidgetConfig::default();
            assert_eq!(config.data_dir, None);
            assert_eq!(config.celebration_delay_secs, 3);
            assert!(config.sound);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_builders() {
            let config = WidgetConfig::default()
                .with_data_dir("/tmp/pomodoro")
                .with_celebration_delay_secs(0)
                .with_sound(false);
            assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/pomodoro")));
            assert_eq!(config.celebration_delay_secs, 0);
            assert!(!config.sound);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_validate_delay_out_of_range() {
            let config = WidgetConfig::default().with_celebration_delay_secs(61);
            let err = config.validate().unwrap_err();
            assert!(err.contains("celebration delay"));
        }

        #[test]
        fn test_validate_empty_data_dir() {
            let config = WidgetConfig::default().with_data_dir("");
            assert!(config.validate().is_err());
        }
    }
}
