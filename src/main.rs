//! Pomodoro Widget - a terminal focus timer
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 45 minutes of focused work
//! - 15 minutes of break
//! - a running count of completed sessions and focus time

use std::io::BufRead;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;

use pomodoro_widget::cli::{Cli, Command, Display, TerminalRenderer};
use pomodoro_widget::notify::{Celebration, SilentCelebration, TerminalBell};
use pomodoro_widget::runtime;
use pomodoro_widget::stats::open_storage;
use pomodoro_widget::{PomodoroWidget, TokioScheduler};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Run the widget
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never interleave with the widget on stdout.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the widget and runs it until quit, end of input or Ctrl-C.
async fn execute(cli: Cli) -> Result<()> {
    let config = cli.to_config();
    config.validate().map_err(anyhow::Error::msg)?;

    let storage = open_storage(config.data_dir.as_deref());

    let celebration: Box<dyn Celebration> = if config.sound {
        Box::new(TerminalBell::new())
    } else {
        Box::new(SilentCelebration)
    };

    let mut widget = PomodoroWidget::new(TokioScheduler::new(), storage, celebration, &config);
    let mut renderer = TerminalRenderer::stdout();
    renderer.show_panel(&widget.view());
    renderer.show_help();

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    spawn_input_reader(command_tx);

    tokio::select! {
        result = runtime::run(&mut widget, command_rx, &mut renderer) => result?,
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
    }

    Ok(())
}

/// Reads commands from stdin on a plain thread.
///
/// A blocking read cannot be cancelled, so the thread is left detached; it
/// stops on end of input, on `quit`, or when the loop has gone away.
fn spawn_input_reader(command_tx: mpsc::UnboundedSender<Command>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match Command::parse_input(&line) {
                Some(command) => {
                    if command_tx.send(command).is_err() || command == Command::Quit {
                        break;
                    }
                }
                None => Display::show_unknown_command(&line),
            }
        }
    });
}
