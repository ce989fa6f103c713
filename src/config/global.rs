use crate::error::{HeroError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Scheduler command used when none is configured.
pub const DEFAULT_SUBMIT_COMMAND: &str = "sbatch";

/// Process-wide settings, built once at startup and passed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfig {
	/// Directory where generated job scripts are written.
	pub script_dir: PathBuf,

	/// Program that submits a script to the scheduler.
	pub submit_command: String,
}

/// On-disk form of the global config (TOML).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GlobalConfigFile {
	#[serde(default)]
	pub script_dir: Option<PathBuf>,

	#[serde(default)]
	pub submit_command: Option<String>,
}

impl Default for GlobalConfig {
	fn default() -> Self {
		GlobalConfig::new(None)
	}
}

impl GlobalConfig {
	/// Build a config, falling back to the system temp directory when
	/// `script_dir` is unset or empty.
	pub fn new(script_dir: Option<PathBuf>) -> Self {
		let script_dir = script_dir
			.filter(|dir| !dir.as_os_str().is_empty())
			.unwrap_or_else(std::env::temp_dir);

		GlobalConfig {
			script_dir,
			submit_command: DEFAULT_SUBMIT_COMMAND.to_string(),
		}
	}

	/// Replace the submit command. Empty values keep the default.
	pub fn with_submit_command(mut self, command: impl Into<String>) -> Self {
		let command = command.into();
		if !command.trim().is_empty() {
			self.submit_command = command;
		}
		self
	}

	/// Load from a TOML file.
	pub fn from_file(path: &Path) -> Result<Self> {
		let content =
			std::fs::read_to_string(path).map_err(|source| HeroError::GlobalConfigReadError {
				path: path.to_path_buf(),
				source,
			})?;
		Self::from_toml_str(&content, path)
	}

	/// Parse from a TOML string (useful for testing).
	pub fn from_toml_str(content: &str, path: &Path) -> Result<Self> {
		let file: GlobalConfigFile =
			toml::from_str(content).map_err(|source| HeroError::GlobalConfigParseError {
				path: path.to_path_buf(),
				source,
			})?;

		let config = GlobalConfig::new(file.script_dir);
		Ok(match file.submit_command {
			Some(command) => config.with_submit_command(command),
			None => config,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_to_temp_dir() {
		let config = GlobalConfig::new(None);
		assert_eq!(config.script_dir, std::env::temp_dir());
		assert_eq!(config.submit_command, "sbatch");
	}

	#[test]
	fn test_empty_dir_uses_default() {
		let config = GlobalConfig::new(Some(PathBuf::new()));
		assert_eq!(config.script_dir, std::env::temp_dir());
	}

	#[test]
	fn test_explicit_dir() {
		let config = GlobalConfig::new(Some(PathBuf::from("/shared/scripts")));
		assert_eq!(config.script_dir, PathBuf::from("/shared/scripts"));
	}

	#[test]
	fn test_parse_toml() {
		let content = r#"
script-dir = "/shared/hero"
submit-command = "/opt/slurm/bin/sbatch"
"#;
		let config = GlobalConfig::from_toml_str(content, Path::new("hero.toml")).unwrap();
		assert_eq!(config.script_dir, PathBuf::from("/shared/hero"));
		assert_eq!(config.submit_command, "/opt/slurm/bin/sbatch");
	}

	#[test]
	fn test_parse_empty_toml() {
		let config = GlobalConfig::from_toml_str("", Path::new("hero.toml")).unwrap();
		assert_eq!(config, GlobalConfig::default());
	}

	#[test]
	fn test_unknown_key_rejected() {
		let result = GlobalConfig::from_toml_str("scriptdir = \"/x\"\n", Path::new("hero.toml"));
		assert!(matches!(
			result,
			Err(HeroError::GlobalConfigParseError { .. })
		));
	}
}
