//! Cumulative focus statistics.

use tracing::{info, warn};

use super::storage::StatsStorage;
use crate::types::{StatsRecord, FOCUS_MINUTES_PER_SESSION};

/// Storage key of the persisted record.
pub const STATS_RECORD_KEY: &str = "pomodoroData";

/// Session counter and focus-minute total, persisted after every change.
///
/// The in-memory record is authoritative for the process lifetime; storage
/// failures are logged and never surface to the caller.
pub struct StatsStore<P: StatsStorage> {
    record: StatsRecord,
    storage: P,
}

impl<P: StatsStorage> StatsStore<P> {
    /// Loads the last persisted record.
    ///
    /// Falls back to zeroed counters if nothing is stored, the read fails,
    /// or the stored text is not a valid record.
    pub fn load(storage: P) -> Self {
        let record = match storage.read(STATS_RECORD_KEY) {
            Ok(Some(text)) => match serde_json::from_str::<StatsRecord>(&text) {
                Ok(record) => record,
                Err(e) => {
                    warn!(error = %e, "stored stats record is malformed, starting from zero");
                    StatsRecord::default()
                }
            },
            Ok(None) => StatsRecord::default(),
            Err(e) => {
                warn!(error = %e, "failed to read stats record, starting from zero");
                StatsRecord::default()
            }
        };

        info!(
            sessions = record.session_count,
            focus_minutes = record.total_focus_minutes,
            "stats loaded"
        );
        Self { record, storage }
    }

    /// Counts one completed focus session and persists the result.
    pub fn record_focus_completion(&mut self) -> StatsRecord {
        self.record.session_count = self.record.session_count.saturating_add(1);
        self.record.total_focus_minutes = self
            .record
            .total_focus_minutes
            .saturating_add(FOCUS_MINUTES_PER_SESSION);

        self.persist();
        self.record
    }

    pub fn record(&self) -> StatsRecord {
        self.record
    }

    pub fn session_count(&self) -> u32 {
        self.record.session_count
    }

    pub fn total_focus_minutes(&self) -> u32 {
        self.record.total_focus_minutes
    }

    pub fn storage(&self) -> &P {
        &self.storage
    }

    fn persist(&mut self) {
        let text = match serde_json::to_string(&self.record) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "failed to serialize stats record");
                return;
            }
        };

        if let Err(e) = self.storage.write(STATS_RECORD_KEY, &text) {
            warn!(error = %e, "failed to persist stats record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::storage::{FileStorage, MemoryStorage};

    mod load_tests {
        use super::*;

        #[test]
        fn test_load_empty_storage() {
            let store = StatsStore::load(MemoryStorage::new());
            assert_eq!(store.record(), StatsRecord::default());
        }

        #[test]
        fn test_load_existing_record() {
            let storage = MemoryStorage::with_entry(
                STATS_RECORD_KEY,
                r#"{"sessionCount":3,"totalFocusMinutes":135}"#,
            );
            let store = StatsStore::load(storage);

            assert_eq!(store.session_count(), 3);
            assert_eq!(store.total_focus_minutes(), 135);
        }

        #[test]
        fn test_load_record_with_both_focus_fields() {
            let storage = MemoryStorage::with_entry(
                STATS_RECORD_KEY,
                r#"{"sessionCount":7,"totalFocusMinutes":315,"totalFocusTime":315}"#,
            );
            let mut store = StatsStore::load(storage);

            assert_eq!(store.session_count(), 7);
            assert_eq!(store.total_focus_minutes(), 315);

            store.record_focus_completion();
            assert_eq!(
                store.storage().get(STATS_RECORD_KEY),
                Some(r#"{"sessionCount":8,"totalFocusMinutes":360}"#)
            );
        }

        #[test]
        fn test_load_malformed_records() {
            for text in [
                "not json",
                "",
                "null",
                "true",
                r#"{"sessionCount":"three"}"#,
                r#"{"sessionCount":-4,"totalFocusMinutes":10}"#,
                r#"{"sessionCount":1"#,
            ] {
                let store = StatsStore::load(MemoryStorage::with_entry(STATS_RECORD_KEY, text));
                assert_eq!(
                    store.record(),
                    StatsRecord::default(),
                    "expected zeroed stats for {text:?}"
                );
            }
        }

        #[test]
        fn test_load_read_failure_defaults() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::create_dir(dir.path().join("pomodoroData.json")).unwrap();

            let store = StatsStore::load(FileStorage::new(dir.path()));
            assert_eq!(store.record(), StatsRecord::default());
        }
    }

    mod record_tests {
        use super::*;

        #[test]
        fn test_record_focus_completion_increments_and_persists() {
            let mut store = StatsStore::load(MemoryStorage::new());

            let record = store.record_focus_completion();

            assert_eq!(record.session_count, 1);
            assert_eq!(record.total_focus_minutes, 45);
            assert_eq!(
                store.storage().get(STATS_RECORD_KEY),
                Some(r#"{"sessionCount":1,"totalFocusMinutes":45}"#)
            );
        }

        #[test]
        fn test_record_accumulates_on_loaded_record() {
            let storage = MemoryStorage::with_entry(
                STATS_RECORD_KEY,
                r#"{"sessionCount":2,"totalFocusTime":90}"#,
            );
            let mut store = StatsStore::load(storage);

            store.record_focus_completion();
            store.record_focus_completion();

            assert_eq!(store.session_count(), 4);
            assert_eq!(store.total_focus_minutes(), 180);
            assert_eq!(store.storage().write_count(), 2);
        }

        #[test]
        fn test_write_failure_keeps_memory_state() {
            let mut storage = MemoryStorage::new();
            storage.set_fail_writes(true);
            let mut store = StatsStore::load(storage);

            store.record_focus_completion();

            assert_eq!(store.session_count(), 1);
            assert_eq!(store.total_focus_minutes(), 45);
            assert_eq!(store.storage().get(STATS_RECORD_KEY), None);
            assert_eq!(store.storage().write_count(), 1);
        }

        #[test]
        fn test_persisted_record_survives_reload() {
            let dir = tempfile::tempdir().unwrap();
            let mut store = StatsStore::load(FileStorage::new(dir.path()));
            store.record_focus_completion();

            let reloaded = StatsStore::load(FileStorage::new(dir.path()));
            assert_eq!(reloaded.session_count(), 1);
            assert_eq!(reloaded.total_focus_minutes(), 45);
        }
    }
}
