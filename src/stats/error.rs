//! Stats persistence error types.
//!
//! None of these errors reach the user: the store logs them and carries on
//! with its in-memory counters.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing the stats record.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No platform data directory could be determined.
    #[error("could not determine a data directory for the stats record")]
    DataDirNotFound,

    /// The record exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
