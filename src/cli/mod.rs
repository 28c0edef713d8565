//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing and subcommand handlers.

mod args;
mod commands;

pub use args::{Args, Command, ConfigAction, RenderArgs};
pub use commands::{ctrlc_received, handle_config_action, run_render, setup_ctrlc_handler};
