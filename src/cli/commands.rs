//! Command-line arguments and interactive commands.
//!
//! Uses clap derive for the startup flags. While the widget runs, commands
//! are read one per line from stdin and parsed with [`Command::parse_input`].

use std::path::PathBuf;

use clap::Parser;

use crate::types::{WidgetConfig, DEFAULT_CELEBRATION_DELAY_SECS, MAX_CELEBRATION_DELAY_SECS};

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro focus widget for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro-widget",
    version,
    about = "A 45/15 minute Pomodoro focus widget",
    long_about = "A terminal Pomodoro widget: 45 minute focus sessions, 15 minute breaks,\n\
                  and a persisted count of completed sessions.\n\n\
                  Type commands while it runs: start (s), pause (p), reset (r), status, quit (q)."
)]
pub struct Cli {
    /// Directory holding the stats record (defaults to the platform data dir)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Seconds to celebrate a finished focus session before the break (0-60)
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_CELEBRATION_DELAY_SECS,
        value_parser = clap::value_parser!(u64).range(0..=MAX_CELEBRATION_DELAY_SECS)
    )]
    pub celebration_delay: u64,

    /// Disable completion cues
    #[arg(long)]
    pub no_sound: bool,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the widget configuration from the parsed flags.
    pub fn to_config(&self) -> WidgetConfig {
        WidgetConfig {
            data_dir: self.data_dir.clone(),
            celebration_delay_secs: self.celebration_delay,
            sound: !self.no_sound,
        }
    }
}

// ============================================================================
// Interactive Commands
// ============================================================================

/// Commands accepted while the widget runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Reset the current phase
    Reset,
    /// Print the current state
    Status,
    /// Leave the widget
    Quit,
}

impl Command {
    /// Parses one line of user input. Case and surrounding whitespace are
    /// ignored; unknown input yields `None`.
    pub fn parse_input(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "start" | "s" | "resume" => Some(Self::Start),
            "pause" | "p" => Some(Self::Pause),
            "reset" | "r" => Some(Self::Reset),
            "status" | "st" => Some(Self::Status),
            "quit" | "q" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
