//! Pomodoro Widget Library
//!
//! This library provides the core of a single-user Pomodoro focus widget:
//! 45 minute focus phases alternating with 15 minute breaks, and a persisted
//! count of completed sessions. It includes:
//! - Timer engine with its run-status state machine and phase switching
//! - Scheduler seam for ticks and the deferred focus-to-break switch
//! - Stats store with file-backed persistence
//! - Completion cues (terminal bell, silent, mock)
//! - Terminal display and the single-task event loop

pub mod app;
pub mod cli;
pub mod engine;
pub mod notify;
pub mod runtime;
pub mod stats;
pub mod types;

// Re-export commonly used types for convenience
pub use app::{PomodoroWidget, WidgetView};
pub use engine::{ManualScheduler, Scheduler, TimerEngine, TimerEvent, TokioScheduler};
pub use notify::{Celebration, MockCelebration, NotifyError, SilentCelebration, TerminalBell};
pub use stats::{FileStorage, MemoryStorage, StatsStorage, StatsStore, StorageError};
pub use types::{Phase, RunStatus, StatsRecord, TimerSnapshot, WidgetConfig};
