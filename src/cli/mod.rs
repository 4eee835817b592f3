//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConfigAction, ConvertArgs};
pub use commands::{
    conversion_settings, handle_config_action, run_convert, run_list, run_serve, run_sweep,
    CommandError,
};
pub use enums::CharacterSet;
