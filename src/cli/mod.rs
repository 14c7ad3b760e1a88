//! Command-line interface for songvault.
//!
//! This module provides the batch `run` command plus small utility
//! commands for exercising individual pipeline stages on single files.

mod commands;

pub use commands::{Cli, Commands, run_command};
