//! Persisted session statistics.
//!
//! This module keeps the completed-session count and the cumulative focus
//! minutes:
//! - `store`: the [`StatsStore`] counters and their load/record operations
//! - `storage`: key-value backends ([`FileStorage`], [`MemoryStorage`])
//! - `error`: [`StorageError`]
//!
//! The record is a single JSON value stored under the key `pomodoroData`:
//!
//! ```text
//! {"sessionCount": 3, "totalFocusMinutes": 135}
//! ```

mod error;
mod storage;
mod store;

pub use error::StorageError;
pub use storage::{open_storage, storage_or_memory, FileStorage, MemoryStorage, StatsStorage};
pub use store::{StatsStore, STATS_RECORD_KEY};
