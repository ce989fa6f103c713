//! Configuration loading and parsing for hero.
//!
//! This module handles:
//! - `.hero` discovery up the directory tree with a home fallback
//! - `.hero` YAML parsing into ordered experiments
//! - The process-wide TOML settings (script directory, submit command)

pub mod global;
pub mod locate;
pub mod parser;
pub mod types;

pub use global::{DEFAULT_SUBMIT_COMMAND, GlobalConfig};
pub use locate::{
	CONFIG_FILE_NAME, ConfigLocation, ConfigOrigin, locate_config, resolve_event_path,
};
pub use parser::{parse_config_file, parse_config_str};
pub use types::{ConfigFile, Experiment, JobDefinition, Method, User};
