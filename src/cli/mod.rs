//! Command-line interface definitions and helpers.
//!
//! This module contains CLI argument parsing and the subcommand handlers.

mod args;
mod commands;

pub use args::{expand_legacy_flags, Args, Command, ConfigAction, UNSET_SENTINEL};
pub use commands::{handle_config_action, list_cameras, run_capture, AppError};
