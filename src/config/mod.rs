//! Configuration module for the association tool.
//!
//! This module handles all configuration-related functionality:
//! - Client settings (region, profile, endpoint, retries, timeouts)
//! - Loading settings from YAML with environment and `.env` overrides
//! - Loading declared association records and persisted raw state

mod parser;
mod settings;

pub use parser::{ConfigParser, DEFAULT_CONFIG_FILES, find_config_file};
pub use settings::{ClientSettings, ENV_PREFIX};
