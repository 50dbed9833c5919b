//! Display utilities for the Pomodoro widget.
//!
//! This module provides:
//! - Clock, focus-time and progress formatting
//! - The widget's status labels
//! - The [`Renderer`] trait the event loop reports to
//! - [`TerminalRenderer`], which draws the widget as text

use std::io::{self, Stdout, Write};

use crate::app::WidgetView;
use crate::engine::TimerEvent;
use crate::types::{Phase, RunStatus};

/// Width of the text progress bar.
const BAR_WIDTH: usize = 20;

const HELP_TEXT: &str = "Commands: start (s), pause (p), reset (r), status, quit (q)";

// ============================================================================
// Display
// ============================================================================

/// Formatting helpers for widget output.
pub struct Display;

impl Display {
    /// Formats seconds as zero-padded `MM:SS`.
    pub fn format_clock(total_seconds: u32) -> String {
        let (minutes, seconds) = Self::format_time(total_seconds);
        format!("{:02}:{:02}", minutes, seconds)
    }

    /// Formats a minute total as `Hh Mm`.
    pub fn format_focus_time(total_minutes: u32) -> String {
        format!("{}h {}m", total_minutes / 60, total_minutes % 60)
    }

    /// Heading shown for each phase.
    pub fn phase_title(phase: Phase) -> &'static str {
        match phase {
            Phase::Focus => "Pomodoro Session",
            Phase::Break => "Break Time",
        }
    }

    /// Short status label.
    pub fn status_label(status: RunStatus, phase: Phase) -> &'static str {
        match (status, phase) {
            (RunStatus::Running, Phase::Focus) => "Focus Time",
            (RunStatus::Running, Phase::Break) => "Break Active",
            (RunStatus::Paused, _) => "Paused",
            (RunStatus::Idle, _) => "Ready",
        }
    }

    /// One-line description under the clock.
    pub fn phase_caption(status: RunStatus, phase: Phase) -> &'static str {
        match (status, phase) {
            (RunStatus::Running, Phase::Focus) => "Focusing...",
            (RunStatus::Running, Phase::Break) => "Taking a break",
            (RunStatus::Paused, _) => "Timer paused",
            (RunStatus::Idle, Phase::Focus) => "Ready to focus",
            (RunStatus::Idle, Phase::Break) => "Ready for break",
        }
    }

    /// Whether the break indicator is lit.
    pub fn break_status(phase: Phase) -> &'static str {
        match phase {
            Phase::Focus => "Waiting",
            Phase::Break => "Active",
        }
    }

    /// Draws `fraction` as a bar of `width` cells.
    pub fn progress_bar(fraction: f64, width: usize) -> String {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let filled = ((fraction * width as f64).round() as usize).min(width);
        format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
    }

    /// Formats a fraction as a whole percentage.
    pub fn format_percent(fraction: f64) -> String {
        format!("{:>3}%", (fraction.clamp(0.0, 1.0) * 100.0).floor() as u32)
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// Reports input that is not a command.
    pub fn show_unknown_command(input: &str) {
        eprintln!("unknown command: {:?}", input.trim());
        eprintln!("{}", HELP_TEXT);
    }

    /// Formats remaining seconds as (minutes, seconds).
    fn format_time(total_seconds: u32) -> (u32, u32) {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        (minutes, seconds)
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Receives widget updates from the event loop.
pub trait Renderer {
    /// Called for every engine event, with the state after the event.
    fn on_event(&mut self, event: &TimerEvent, view: &WidgetView);

    /// Called when the user asks for the current state.
    fn on_status(&mut self, view: &WidgetView);
}

/// Draws the widget as lines of text.
///
/// Ticks redraw a single clock line in place; everything else is printed on
/// its own line.
pub struct TerminalRenderer<W: Write = Stdout> {
    out: W,
    mid_line: bool,
}

impl TerminalRenderer<Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            mid_line: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Prints the full widget panel.
    pub fn show_panel(&mut self, view: &WidgetView) {
        let snapshot = &view.snapshot;
        let lines = [
            format!(
                "{} - {}",
                Display::phase_title(snapshot.phase),
                Display::phase_caption(snapshot.status, snapshot.phase)
            ),
            format!(
                "  Timer:    {}  {} {}",
                Display::format_clock(snapshot.remaining_seconds),
                Display::progress_bar(view.progress, BAR_WIDTH),
                Display::format_percent(view.progress)
            ),
            format!(
                "  Status:   {}",
                Display::status_label(snapshot.status, snapshot.phase)
            ),
            format!("  Break:    {}", Display::break_status(snapshot.phase)),
            format!("  Sessions: {}", view.stats.session_count),
            format!(
                "  Focus:    {}",
                Display::format_focus_time(view.stats.total_focus_minutes)
            ),
        ];
        for line in lines {
            self.line(&line);
        }
    }

    /// Prints the command help.
    pub fn show_help(&mut self) {
        self.line(HELP_TEXT);
    }

    fn redraw_clock(&mut self, view: &WidgetView) {
        let _ = write!(
            self.out,
            "\r  {}  {} {}",
            Display::format_clock(view.snapshot.remaining_seconds),
            Display::progress_bar(view.progress, BAR_WIDTH),
            Display::format_percent(view.progress)
        );
        let _ = self.out.flush();
        self.mid_line = true;
    }

    fn line(&mut self, text: &str) {
        if self.mid_line {
            let _ = writeln!(self.out);
            self.mid_line = false;
        }
        let _ = writeln!(self.out, "{}", text);
        let _ = self.out.flush();
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn on_event(&mut self, event: &TimerEvent, view: &WidgetView) {
        match *event {
            TimerEvent::Tick { .. } => self.redraw_clock(view),
            TimerEvent::Started {
                phase,
                remaining_seconds,
            } => self.line(&format!(
                "> {} - {}",
                Display::status_label(RunStatus::Running, phase),
                Display::format_clock(remaining_seconds)
            )),
            TimerEvent::Paused { remaining_seconds } => self.line(&format!(
                "|| Paused at {}",
                Display::format_clock(remaining_seconds)
            )),
            TimerEvent::Reset {
                phase,
                remaining_seconds,
            } => self.line(&format!(
                "[] Reset - {} {}",
                Display::phase_title(phase),
                Display::format_clock(remaining_seconds)
            )),
            TimerEvent::FocusCompleted => self.line(&format!(
                "* Session complete! {} sessions, {} focused. Break starts shortly.",
                view.stats.session_count,
                Display::format_focus_time(view.stats.total_focus_minutes)
            )),
            TimerEvent::BreakCompleted => self.line("* Break over."),
            TimerEvent::PhaseChanged {
                phase,
                remaining_seconds,
            } => self.line(&format!(
                "{} - {} ({})",
                Display::phase_title(phase),
                Display::phase_caption(view.snapshot.status, phase),
                Display::format_clock(remaining_seconds)
            )),
        }
    }

    fn on_status(&mut self, view: &WidgetView) {
        self.show_panel(view);
    }
}

// ============================================================================
// Tests
// ============================================================================
