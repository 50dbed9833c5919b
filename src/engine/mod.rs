//! Timer engine and its scheduling seam.
//!
//! - `timer`: the countdown state machine and its events
//! - `scheduler`: the tick/deferred-task seam and its implementations

pub mod scheduler;
pub mod timer;

pub use scheduler::{
    DeferredHandle, ManualScheduler, Scheduler, TickSubscription, TokioScheduler, Wakeup,
};
pub use timer::{TimerEngine, TimerEvent};
