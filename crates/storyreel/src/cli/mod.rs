//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storyreel binary.

mod commands;
mod generate;
mod interpolate;
mod setup;
mod summary;

pub use commands::{Cli, Commands};
pub use generate::run_generate;
pub use interpolate::run_interpolate;
pub use setup::{load_config, shutdown_on_ctrl_c};
