//! Component tests that drive the public API with a `ManualScheduler`.
//!
//! Time never passes here: each tick and each deferred task is delivered
//! by hand, so whole sessions run deterministically.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use pomodoro_widget::engine::{ManualScheduler, TimerEngine, TimerEvent};
use pomodoro_widget::notify::MockCelebration;
use pomodoro_widget::stats::{
    storage_or_memory, MemoryStorage, StatsStore, StorageError, STATS_RECORD_KEY,
};
use pomodoro_widget::types::{Phase, RunStatus, WidgetConfig};
use pomodoro_widget::PomodoroWidget;

fn create_engine() -> (
    TimerEngine<ManualScheduler>,
    mpsc::UnboundedReceiver<TimerEvent>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TimerEngine::new(ManualScheduler::new(), tx), rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn tick_n(engine: &mut TimerEngine<ManualScheduler>, n: u32) {
    for _ in 0..n {
        engine.tick();
    }
}

// ============================================================================
// Engine
// ============================================================================

mod engine_component {
    use super::*;

    #[test]
    fn tc_c_001_focus_session_to_break() {
        let (mut engine, mut rx) = create_engine();
        engine.start();
        tick_n(&mut engine, 2700);

        assert_eq!(engine.remaining_seconds(), 0);
        assert_eq!(engine.status(), RunStatus::Idle);
        assert!(!engine.scheduler().is_ticking());

        let pending = engine.scheduler().pending_deferred();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].1, Duration::from_secs(3));

        let handle = engine.scheduler_mut().take_deferred().unwrap();
        assert!(engine.run_deferred(handle));

        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.remaining_seconds(), 900);
        assert_eq!(engine.status(), RunStatus::Idle);

        let events = drain(&mut rx);
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == TimerEvent::FocusCompleted)
                .count(),
            1
        );
        assert_eq!(
            events.last(),
            Some(&TimerEvent::PhaseChanged {
                phase: Phase::Break,
                remaining_seconds: 900
            })
        );
    }

    #[test]
    fn tc_c_002_pause_then_start_resumes() {
        let (mut engine, _rx) = create_engine();
        engine.start();
        tick_n(&mut engine, 100);
        assert!(engine.pause());

        tick_n(&mut engine, 50);
        assert_eq!(engine.remaining_seconds(), 2600);

        assert!(engine.start());
        assert_eq!(engine.remaining_seconds(), 2600);
        assert_eq!(engine.status(), RunStatus::Running);
    }

    #[test]
    fn tc_c_003_repeated_start_keeps_one_subscription() {
        let (mut engine, _rx) = create_engine();
        assert!(engine.start());
        assert!(!engine.start());
        assert!(!engine.start());

        assert_eq!(engine.scheduler().subscribe_count(), 1);
        engine.tick();
        assert_eq!(engine.remaining_seconds(), 2699);
    }

    #[test]
    fn tc_c_004_reset_mid_run() {
        let (mut engine, _rx) = create_engine();
        engine.start();
        tick_n(&mut engine, 600);

        engine.reset();

        assert_eq!(engine.remaining_seconds(), 2700);
        assert_eq!(engine.status(), RunStatus::Idle);
        assert!(!engine.scheduler().is_ticking());
        assert_eq!(engine.progress_fraction(), 0.0);
    }

    #[test]
    fn tc_c_005_break_completion_switches_immediately() {
        let (mut engine, _rx) = create_engine();
        engine.start();
        tick_n(&mut engine, 2700);
        let handle = engine.scheduler_mut().take_deferred().unwrap();
        engine.run_deferred(handle);

        engine.start();
        tick_n(&mut engine, 900);

        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.remaining_seconds(), 2700);
        assert_eq!(engine.status(), RunStatus::Idle);
        assert!(engine.scheduler().pending_deferred().is_empty());
    }

    #[test]
    fn tc_c_006_progress_halfway() {
        let (mut engine, _rx) = create_engine();
        engine.start();
        tick_n(&mut engine, 1350);

        assert!((engine.progress_fraction() - 0.5).abs() < 1e-9);
    }
}

// ============================================================================
// Widget
// ============================================================================

mod widget_component {
    use super::*;

    #[test]
    fn tc_c_010_two_sessions_accumulate() {
        let mock = Arc::new(MockCelebration::new());
        let mut widget = PomodoroWidget::new(
            ManualScheduler::new(),
            MemoryStorage::new(),
            Box::new(Arc::clone(&mock)),
            &WidgetConfig::default(),
        );

        for _ in 0..2 {
            widget.start();
            for _ in 0..2700 {
                widget.tick();
            }
            let handle = widget
                .engine_mut()
                .scheduler_mut()
                .take_deferred()
                .unwrap();
            widget.run_deferred(handle);

            widget.start();
            for _ in 0..900 {
                widget.tick();
            }
        }

        assert_eq!(widget.stats().session_count(), 2);
        assert_eq!(widget.stats().total_focus_minutes(), 90);
        assert_eq!(mock.celebrate_count(), 2);
        assert_eq!(mock.chime_count(), 4);

        let stored = widget.stats().storage().get(STATS_RECORD_KEY).unwrap();
        assert!(stored.contains("\"sessionCount\":2"));
        assert!(stored.contains("\"totalFocusMinutes\":90"));
    }

    #[test]
    fn tc_c_011_failed_write_keeps_counts() {
        let mut storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        let mut stats = StatsStore::load(storage);

        stats.record_focus_completion();

        assert_eq!(stats.session_count(), 1);
        assert_eq!(stats.total_focus_minutes(), 45);
        assert_eq!(stats.storage().get(STATS_RECORD_KEY), None);
    }

    #[test]
    fn tc_c_012_missing_data_dir_keeps_counting_in_memory() {
        let mock = Arc::new(MockCelebration::new());
        let mut widget = PomodoroWidget::new(
            ManualScheduler::new(),
            storage_or_memory(Err(StorageError::DataDirNotFound)),
            Box::new(Arc::clone(&mock)),
            &WidgetConfig::default(),
        );

        widget.start();
        for _ in 0..2700 {
            widget.tick();
        }

        assert_eq!(widget.stats().session_count(), 1);
        assert_eq!(widget.stats().total_focus_minutes(), 45);
        assert_eq!(mock.celebrate_count(), 1);
    }
}
