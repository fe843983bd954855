//! CLI module for the countdown timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `controls`: Interactive stdin controls forwarded to the driver
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod controls;
pub mod display;

pub use commands::{Cli, Commands, PreviewArgs, RunArgs, StartArgs, UntilArgs};
pub use controls::{forward_controls, parse_control};
pub use display::Display;
