//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ssm-association - Drive the lifecycle of one AWS SSM association.
#[derive(Parser, Debug)]
#[command(name = "ssm-association")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the client settings file.
    #[arg(short, long, global = true, env = "SSM_ASSOCIATION_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a declared association file.
    Validate {
        /// Declared association (YAML).
        file: PathBuf,

        /// Show warnings as well as errors.
        #[arg(short, long)]
        warnings: bool,
    },

    /// Classify the change from persisted state to a declared association.
    Plan {
        /// Declared association (YAML). Omit to plan a delete.
        file: Option<PathBuf>,

        /// Persisted state (JSON). Omit to plan a create.
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Show per-field values.
        #[arg(short, long)]
        detailed: bool,
    },

    /// Create the declared association and print the observed record.
    Create {
        /// Declared association (YAML).
        file: PathBuf,
    },

    /// Read an association by id and print the observed record.
    Read {
        /// Association id.
        id: String,
    },

    /// Update an association from persisted state to a declared record.
    Update {
        /// Declared association (YAML).
        file: PathBuf,

        /// Persisted state (JSON) holding the prior observed record.
        #[arg(short, long)]
        state: PathBuf,
    },

    /// Delete an association by id.
    Delete {
        /// Association id.
        id: String,

        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Upgrade persisted state to the current schema version.
    Migrate {
        /// Persisted state (JSON).
        state: PathBuf,
    },

    /// Print the resource schema.
    Schema,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}
