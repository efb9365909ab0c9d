//! CLI module for the association tool.
//!
//! This module provides the command-line interface for driving single
//! lifecycle operations against AWS Systems Manager.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
