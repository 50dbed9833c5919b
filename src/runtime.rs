//! The widget's event loop.
//!
//! One task owns the widget and multiplexes two sources with `select!`:
//! user commands from a channel, and tick/deferred wakeups from the
//! [`TokioScheduler`]. Every engine operation therefore runs to completion
//! before the next one starts, and no locking is needed.

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::app::PomodoroWidget;
use crate::cli::{Command, Renderer};
use crate::engine::{TokioScheduler, Wakeup};
use crate::stats::StatsStorage;

/// Runs the widget until `Quit` arrives or the command channel closes.
///
/// # Errors
///
/// Currently never fails; the `Result` leaves room for renderers that can.
pub async fn run<P, R>(
    widget: &mut PomodoroWidget<TokioScheduler, P>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    renderer: &mut R,
) -> Result<()>
where
    P: StatsStorage,
    R: Renderer + ?Sized,
{
    info!("widget loop started");

    loop {
        tokio::select! {
            command = commands.recv() => {
                let events = match command {
                    None | Some(Command::Quit) => {
                        info!("widget loop stopped");
                        return Ok(());
                    }
                    Some(Command::Status) => {
                        renderer.on_status(&widget.view());
                        continue;
                    }
                    Some(Command::Start) => widget.start(),
                    Some(Command::Pause) => widget.pause(),
                    Some(Command::Reset) => widget.reset(),
                };
                debug!(?command, applied = !events.is_empty(), "command handled");
                let view = widget.view();
                for event in &events {
                    renderer.on_event(event, &view);
                }
            }
            wakeup = widget.engine_mut().scheduler_mut().next_wakeup() => {
                let events = match wakeup {
                    Wakeup::Tick => widget.tick(),
                    Wakeup::Deferred(handle) => widget.run_deferred(handle),
                };
                let view = widget.view();
                for event in &events {
                    renderer.on_event(event, &view);
                }
            }
        }
    }
}
