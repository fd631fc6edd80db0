// CLI module for opusmux
//
// This module provides the command-line surface on top of the library:
// argument parsing, command implementations, and console output formatting.

pub mod commands;
pub mod config;
pub mod output;

pub use config::{Cli, Commands};
pub use output::OutputFormatter;
