//! Notification error types.

use thiserror::Error;

/// Errors raised by celebration and chime backends.
///
/// These are always swallowed at the widget boundary; a failed cue never
/// affects the timer.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Writing the cue to the output failed.
    #[error("failed to emit notification cue: {0}")]
    Output(#[from] std::io::Error),

    /// The backend is not available in this environment.
    #[error("notification backend unavailable: {0}")]
    Unavailable(String),
}
