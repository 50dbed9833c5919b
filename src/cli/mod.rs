//! Terminal front end for the Pomodoro widget.
//!
//! - `commands`: startup flags (clap derive) and interactive commands
//! - `display`: formatting and the terminal renderer

pub mod commands;
pub mod display;

pub use commands::{Cli, Command};
pub use display::{Display, Renderer, TerminalRenderer};
