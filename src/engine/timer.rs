//! Timer engine for the Pomodoro widget.
//!
//! This module provides the countdown state machine:
//! - Run status transitions (Idle → Running ⇄ Paused → Idle)
//! - Focus/break phase switching on completion
//! - Event firing for the display layer and stats
//! - The cancellable deferred switch from focus to break

use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::{debug, info, trace};

use super::scheduler::{DeferredHandle, Scheduler, TickSubscription};
use crate::types::{Phase, RunStatus, TimerSnapshot, DEFAULT_CELEBRATION_DELAY_SECS};

// ============================================================================
// TimerEvent
// ============================================================================

/// State-change events emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started or resumed
    Started {
        phase: Phase,
        remaining_seconds: u32,
    },
    /// Countdown paused
    Paused { remaining_seconds: u32 },
    /// Countdown reset to the phase's full duration
    Reset {
        phase: Phase,
        remaining_seconds: u32,
    },
    /// One second elapsed
    Tick { remaining_seconds: u32 },
    /// A focus phase ran to zero
    FocusCompleted,
    /// A break phase ran to zero
    BreakCompleted,
    /// The engine moved to a new phase
    PhaseChanged {
        phase: Phase,
        remaining_seconds: u32,
    },
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Countdown state machine driven by an external [`Scheduler`].
///
/// Invariants:
/// - `remaining_seconds <= total_seconds`, and `total_seconds > 0`
/// - `Running` holds exactly while a tick subscription is active
/// - `Paused` implies `remaining_seconds > 0`
/// - at most one deferred phase switch is pending, and only while `Idle`
pub struct TimerEngine<S: Scheduler> {
    status: RunStatus,
    phase: Phase,
    remaining_seconds: u32,
    total_seconds: u32,
    scheduler: S,
    tick_subscription: Option<TickSubscription>,
    pending_switch: Option<DeferredHandle>,
    celebration_delay: Duration,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl<S: Scheduler> TimerEngine<S> {
    /// Creates an idle engine at the start of a focus phase.
    pub fn new(scheduler: S, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        let total_seconds = Phase::Focus.duration_seconds();
        Self {
            status: RunStatus::Idle,
            phase: Phase::Focus,
            remaining_seconds: total_seconds,
            total_seconds,
            scheduler,
            tick_subscription: None,
            pending_switch: None,
            celebration_delay: Duration::from_secs(DEFAULT_CELEBRATION_DELAY_SECS),
            event_tx,
        }
    }

    /// Sets the delay between focus completion and the switch to break.
    pub fn with_celebration_delay(mut self, delay: Duration) -> Self {
        self.celebration_delay = delay;
        self
    }

    /// Starts or resumes the countdown.
    ///
    /// Returns false without side effects when already running, or when
    /// the phase has run out and is waiting for its deferred switch.
    pub fn start(&mut self) -> bool {
        if self.status == RunStatus::Running {
            debug!("start ignored: already running");
            return false;
        }
        if self.remaining_seconds == 0 {
            debug!("start ignored: phase switch pending");
            return false;
        }

        self.tick_subscription = Some(self.scheduler.subscribe_ticks());
        self.status = RunStatus::Running;
        info!(
            phase = self.phase.as_str(),
            remaining = self.remaining_seconds,
            "timer started"
        );

        self.emit(TimerEvent::Started {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
        });
        true
    }

    /// Pauses a running countdown, keeping the remaining time.
    pub fn pause(&mut self) -> bool {
        if self.status != RunStatus::Running {
            debug!(status = self.status.as_str(), "pause ignored: not running");
            return false;
        }

        // Ticks stop before the status changes.
        self.cancel_ticks();
        self.status = RunStatus::Paused;
        info!(remaining = self.remaining_seconds, "timer paused");

        self.emit(TimerEvent::Paused {
            remaining_seconds: self.remaining_seconds,
        });
        true
    }

    /// Restores the full duration of the current phase and goes idle.
    ///
    /// Valid in every state. Also cancels a pending deferred phase switch so
    /// it cannot overwrite the reset.
    pub fn reset(&mut self) -> bool {
        self.cancel_ticks();
        self.cancel_pending_switch();

        self.status = RunStatus::Idle;
        self.total_seconds = self.phase.duration_seconds();
        self.remaining_seconds = self.total_seconds;
        info!(phase = self.phase.as_str(), "timer reset");

        self.emit(TimerEvent::Reset {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
        });
        true
    }

    /// Advances the countdown by one second.
    ///
    /// Returns true if this tick completed the phase. Ticks that arrive
    /// while not running are ignored.
    pub fn tick(&mut self) -> bool {
        if self.status != RunStatus::Running {
            trace!(status = self.status.as_str(), "tick ignored");
            return false;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.emit(TimerEvent::Tick {
            remaining_seconds: self.remaining_seconds,
        });

        if self.remaining_seconds == 0 {
            self.complete();
            return true;
        }
        false
    }

    /// Applies a deferred phase switch delivered by the scheduler.
    ///
    /// Returns false for any handle other than the one currently pending,
    /// such as a task that fired after a reset.
    pub fn run_deferred(&mut self, handle: DeferredHandle) -> bool {
        if self.pending_switch != Some(handle) {
            debug!(id = handle.0, "stale deferred phase switch ignored");
            return false;
        }

        self.pending_switch = None;
        self.enter_phase(Phase::Break);
        true
    }

    /// Fraction of the current phase already elapsed, in `[0, 1]`.
    pub fn progress_fraction(&self) -> f64 {
        let elapsed = 1.0 - f64::from(self.remaining_seconds) / f64::from(self.total_seconds);
        elapsed.clamp(0.0, 1.0)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            status: self.status,
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
            total_seconds: self.total_seconds,
        }
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    /// Returns true while a completed focus phase waits for its break.
    pub fn has_pending_phase_switch(&self) -> bool {
        self.pending_switch.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Handles a phase running to zero.
    fn complete(&mut self) {
        self.cancel_ticks();
        self.status = RunStatus::Idle;

        match self.phase {
            Phase::Focus => {
                info!("focus session completed");
                self.emit(TimerEvent::FocusCompleted);

                let handle = self.scheduler.schedule_deferred(self.celebration_delay);
                self.pending_switch = Some(handle);
            }
            Phase::Break => {
                info!("break completed");
                self.emit(TimerEvent::BreakCompleted);
                self.enter_phase(Phase::Focus);
            }
        }
    }

    fn enter_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.total_seconds = phase.duration_seconds();
        self.remaining_seconds = self.total_seconds;
        info!(phase = phase.as_str(), "phase changed");

        self.emit(TimerEvent::PhaseChanged {
            phase,
            remaining_seconds: self.remaining_seconds,
        });
    }

    fn cancel_ticks(&mut self) {
        if let Some(subscription) = self.tick_subscription.take() {
            self.scheduler.unsubscribe_ticks(subscription);
        }
    }

    fn cancel_pending_switch(&mut self) {
        if let Some(handle) = self.pending_switch.take() {
            self.scheduler.cancel_deferred(handle);
            debug!(id = handle.0, "pending phase switch cancelled");
        }
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            trace!(?event, "event receiver dropped");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
