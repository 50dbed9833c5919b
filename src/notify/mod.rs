//! Completion cues for the Pomodoro widget.
//!
//! A finished focus session is celebrated, and a short chime marks the end
//! of any phase. Both go through the [`Celebration`] trait, so the timer
//! never depends on how (or whether) a cue is delivered:
//!
//! - [`TerminalBell`]: rings the terminal bell on stderr
//! - [`SilentCelebration`]: does nothing (`--no-sound`)
//! - [`MockCelebration`]: records calls for tests

mod error;

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tracing::debug;

pub use error::NotifyError;

/// Trait for completion cue implementations.
pub trait Celebration {
    /// Celebrates a completed focus session.
    ///
    /// # Errors
    ///
    /// Returns an error if the cue could not be delivered.
    fn celebrate(&self) -> Result<(), NotifyError>;

    /// Plays the short cue that marks the end of any phase.
    ///
    /// # Errors
    ///
    /// Returns an error if the cue could not be delivered.
    fn chime(&self) -> Result<(), NotifyError>;
}

/// Rings the terminal bell.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl TerminalBell {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn ring(times: usize) -> Result<(), NotifyError> {
        let mut stderr = std::io::stderr().lock();
        for _ in 0..times {
            stderr.write_all(b"\x07")?;
        }
        stderr.flush()?;
        Ok(())
    }
}

impl Celebration for TerminalBell {
    fn celebrate(&self) -> Result<(), NotifyError> {
        debug!("celebrating focus session");
        Self::ring(2)
    }

    fn chime(&self) -> Result<(), NotifyError> {
        Self::ring(1)
    }
}

/// Emits no cues at all.
#[derive(Debug, Default)]
pub struct SilentCelebration;

impl Celebration for SilentCelebration {
    fn celebrate(&self) -> Result<(), NotifyError> {
        Ok(())
    }

    fn chime(&self) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Mock celebration for testing.
#[derive(Debug, Default)]
pub struct MockCelebration {
    celebrate_calls: AtomicUsize,
    chime_calls: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockCelebration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn celebrate_count(&self) -> usize {
        self.celebrate_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn chime_count(&self) -> usize {
        self.chime_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), NotifyError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Unavailable("mock failure".to_string()));
        }
        Ok(())
    }
}

impl Celebration for MockCelebration {
    fn celebrate(&self) -> Result<(), NotifyError> {
        self.celebrate_calls.fetch_add(1, Ordering::SeqCst);
        self.check()
    }

    fn chime(&self) -> Result<(), NotifyError> {
        self.chime_calls.fetch_add(1, Ordering::SeqCst);
        self.check()
    }
}

impl<T: Celebration + ?Sized> Celebration for std::sync::Arc<T> {
    fn celebrate(&self) -> Result<(), NotifyError> {
        (**self).celebrate()
    }

    fn chime(&self) -> Result<(), NotifyError> {
        (**self).chime()
    }
}
