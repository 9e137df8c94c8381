//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the audit engine.

pub mod log;

pub use log::{handle_log_command, LogCommands, LogTarget};
