//! Tick and deferred-task scheduling for the timer engine.
//!
//! The engine never owns a clock. It asks a [`Scheduler`] for a 1 Hz tick
//! subscription while running and for a one-shot deferred task when a focus
//! phase completes. Two implementations are provided:
//!
//! - [`ManualScheduler`]: records requests; the host delivers ticks and
//!   deferred tasks itself. Used by tests and embedders with their own loop.
//! - [`TokioScheduler`]: backs requests with `tokio::time` and is polled by
//!   the driver loop through [`TokioScheduler::next_wakeup`].

use std::future::pending;
use std::pin::Pin;

use tokio::time::{interval_at, sleep, Duration, Instant, Interval, MissedTickBehavior, Sleep};
use tracing::trace;

/// Identifies an active 1 Hz tick subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickSubscription(pub u64);

/// Identifies a scheduled one-shot deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeferredHandle(pub u64);

/// Source of ticks and deferred tasks for the engine.
///
/// Cancellation is synchronous: once `unsubscribe_ticks` or `cancel_deferred`
/// returns, the scheduler must not deliver that subscription or task again.
pub trait Scheduler {
    /// Starts delivering one tick per second.
    fn subscribe_ticks(&mut self) -> TickSubscription;

    /// Stops delivering ticks for the given subscription.
    fn unsubscribe_ticks(&mut self, subscription: TickSubscription);

    /// Schedules a one-shot task to fire after `delay`.
    fn schedule_deferred(&mut self, delay: Duration) -> DeferredHandle;

    /// Cancels a deferred task that has not fired yet.
    fn cancel_deferred(&mut self, handle: DeferredHandle);
}

// ============================================================================
// ManualScheduler
// ============================================================================

/// Scheduler that only records what the engine asked for.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    active_ticks: Option<TickSubscription>,
    deferred: Vec<(DeferredHandle, Duration)>,
    subscribe_calls: usize,
    unsubscribe_calls: usize,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while a tick subscription is active.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.active_ticks.is_some()
    }

    #[must_use]
    pub fn active_subscription(&self) -> Option<TickSubscription> {
        self.active_ticks
    }

    #[must_use]
    pub fn subscribe_count(&self) -> usize {
        self.subscribe_calls
    }

    #[must_use]
    pub fn unsubscribe_count(&self) -> usize {
        self.unsubscribe_calls
    }

    /// Deferred tasks not yet fired or cancelled, in scheduling order.
    #[must_use]
    pub fn pending_deferred(&self) -> Vec<(DeferredHandle, Duration)> {
        self.deferred.clone()
    }

    /// Removes and returns the oldest pending deferred task, as if it fired.
    pub fn take_deferred(&mut self) -> Option<DeferredHandle> {
        if self.deferred.is_empty() {
            return None;
        }
        Some(self.deferred.remove(0).0)
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Scheduler for ManualScheduler {
    fn subscribe_ticks(&mut self) -> TickSubscription {
        let subscription = TickSubscription(self.next_id());
        self.active_ticks = Some(subscription);
        self.subscribe_calls += 1;
        subscription
    }

    fn unsubscribe_ticks(&mut self, subscription: TickSubscription) {
        if self.active_ticks == Some(subscription) {
            self.active_ticks = None;
        }
        self.unsubscribe_calls += 1;
    }

    fn schedule_deferred(&mut self, delay: Duration) -> DeferredHandle {
        let handle = DeferredHandle(self.next_id());
        self.deferred.push((handle, delay));
        handle
    }

    fn cancel_deferred(&mut self, handle: DeferredHandle) {
        self.deferred.retain(|(pending, _)| *pending != handle);
    }
}

// ============================================================================
// TokioScheduler
// ============================================================================

/// What woke the driver loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    /// One second elapsed on the active subscription
    Tick,
    /// A deferred task fired
    Deferred(DeferredHandle),
}

/// Scheduler backed by `tokio::time`.
///
/// Holds at most one tick subscription and one deferred task; a new request
/// replaces the previous one. Must be used from within a tokio runtime.
pub struct TokioScheduler {
    next_id: u64,
    period: Duration,
    ticker: Option<(TickSubscription, Interval)>,
    deferred: Option<(DeferredHandle, Pin<Box<Sleep>>)>,
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TokioScheduler {
    /// Creates a scheduler ticking once per second.
    #[must_use]
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        Self {
            next_id: 0,
            period,
            ticker: None,
            deferred: None,
        }
    }

    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    #[must_use]
    pub fn has_deferred(&self) -> bool {
        self.deferred.is_some()
    }

    /// Waits for the next tick or deferred task.
    ///
    /// Pends forever when nothing is scheduled. Cancel safe: dropping the
    /// future loses neither a tick nor the deferred task.
    pub async fn next_wakeup(&mut self) -> Wakeup {
        let Self {
            ticker, deferred, ..
        } = self;

        let tick = async {
            match ticker.as_mut() {
                Some((_, interval)) => {
                    interval.tick().await;
                }
                None => pending::<()>().await,
            }
        };

        let fired = async {
            match deferred.as_mut() {
                Some((_, delay)) => delay.as_mut().await,
                None => pending::<()>().await,
            }
            deferred.take().map(|(handle, _)| handle)
        };

        tokio::select! {
            _ = tick => Wakeup::Tick,
            Some(handle) = fired => Wakeup::Deferred(handle),
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Scheduler for TokioScheduler {
    fn subscribe_ticks(&mut self) -> TickSubscription {
        let subscription = TickSubscription(self.next_id());
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.ticker = Some((subscription, interval));
        trace!(id = subscription.0, "tick subscription started");
        subscription
    }

    fn unsubscribe_ticks(&mut self, subscription: TickSubscription) {
        if matches!(&self.ticker, Some((active, _)) if *active == subscription) {
            self.ticker = None;
            trace!(id = subscription.0, "tick subscription cancelled");
        }
    }

    fn schedule_deferred(&mut self, delay: Duration) -> DeferredHandle {
        let handle = DeferredHandle(self.next_id());
        self.deferred = Some((handle, Box::pin(sleep(delay))));
        trace!(id = handle.0, ?delay, "deferred task scheduled");
        handle
    }

    fn cancel_deferred(&mut self, handle: DeferredHandle) {
        if matches!(&self.deferred, Some((pending, _)) if *pending == handle) {
            self.deferred = None;
            trace!(id = handle.0, "deferred task cancelled");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
