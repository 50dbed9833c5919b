//! Widget glue: wires the engine's events into the stats store and cues.
//!
//! The engine never talks to the stats store directly. Every operation on
//! [`PomodoroWidget`] runs the engine, then drains the event channel:
//! `FocusCompleted` records a session and celebrates, and every completion
//! plays the chime. The drained events are returned for rendering.

use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::warn;

use crate::engine::{DeferredHandle, Scheduler, TimerEngine, TimerEvent};
use crate::notify::Celebration;
use crate::stats::{StatsStorage, StatsStore};
use crate::types::{StatsRecord, TimerSnapshot, WidgetConfig};

/// Everything a renderer needs to draw the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetView {
    pub snapshot: TimerSnapshot,
    pub stats: StatsRecord,
    /// Elapsed fraction of the current phase, in `[0, 1]`
    pub progress: f64,
}

/// The timer engine, its stats and its cue collaborator.
pub struct PomodoroWidget<S: Scheduler, P: StatsStorage> {
    engine: TimerEngine<S>,
    stats: StatsStore<P>,
    events: mpsc::UnboundedReceiver<TimerEvent>,
    celebration: Box<dyn Celebration>,
}

impl<S: Scheduler, P: StatsStorage> PomodoroWidget<S, P> {
    /// Builds the widget and loads the persisted stats.
    pub fn new(
        scheduler: S,
        storage: P,
        celebration: Box<dyn Celebration>,
        config: &WidgetConfig,
    ) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        let engine = TimerEngine::new(scheduler, event_tx)
            .with_celebration_delay(Duration::from_secs(config.celebration_delay_secs));

        Self {
            engine,
            stats: StatsStore::load(storage),
            events,
            celebration,
        }
    }

    /// Starts or resumes the countdown.
    pub fn start(&mut self) -> Vec<TimerEvent> {
        self.engine.start();
        self.pump_events()
    }

    pub fn pause(&mut self) -> Vec<TimerEvent> {
        self.engine.pause();
        self.pump_events()
    }

    pub fn reset(&mut self) -> Vec<TimerEvent> {
        self.engine.reset();
        self.pump_events()
    }

    /// Delivers one scheduler tick.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        self.engine.tick();
        self.pump_events()
    }

    /// Delivers a fired deferred task.
    pub fn run_deferred(&mut self, handle: DeferredHandle) -> Vec<TimerEvent> {
        self.engine.run_deferred(handle);
        self.pump_events()
    }

    /// Drains pending engine events, routing completions.
    pub fn pump_events(&mut self) -> Vec<TimerEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            match event {
                TimerEvent::FocusCompleted => {
                    self.stats.record_focus_completion();
                    self.chime();
                    if let Err(e) = self.celebration.celebrate() {
                        warn!(error = %e, "celebration failed");
                    }
                }
                TimerEvent::BreakCompleted => self.chime(),
                _ => {}
            }
            drained.push(event);
        }
        drained
    }

    pub fn view(&self) -> WidgetView {
        WidgetView {
            snapshot: self.engine.snapshot(),
            stats: self.stats.record(),
            progress: self.engine.progress_fraction(),
        }
    }

    pub fn engine(&self) -> &TimerEngine<S> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TimerEngine<S> {
        &mut self.engine
    }

    pub fn stats(&self) -> &StatsStore<P> {
        &self.stats
    }

    fn chime(&self) {
        if let Err(e) = self.celebration.chime() {
            warn!(error = %e, "completion chime failed");
        }
    }
}
