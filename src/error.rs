use std::path::PathBuf;

use crate::script::TemplateError;

/// Library-level structured errors for hero.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
///
/// "Nothing to do" outcomes (no `.hero` found, no experiment matched) are not
/// errors; the pipeline reports them as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum HeroError {
	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: serde_yaml::Error,
	},

	#[error("Invalid config file {path}: {message}")]
	InvalidConfig { path: PathBuf, message: String },

	#[error("Invalid regex pattern in experiment {experiment}: {pattern}")]
	InvalidRegex {
		experiment: String,
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Failed to render script template for experiment {experiment}: {template}")]
	Render {
		experiment: String,
		template: String,
		#[source]
		source: TemplateError,
	},

	#[error("Unknown file event: {value} (expected add, edit or delete)")]
	UnknownMethod { value: String },

	#[error("Failed to resolve absolute path: {path}")]
	InvalidPath {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write job script: {path}")]
	ScriptWriteError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Job script not found: {path}")]
	ScriptNotFound {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Job script {script} is not in {script_dir}")]
	ScriptOutsideDir { script: PathBuf, script_dir: PathBuf },

	#[error("Failed to run submit command: {command}")]
	SubmitFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error(
		"Submit command {command} failed for {script} (exit code: {exit_code})\nstdout: {stdout}\nstderr: {stderr}"
	)]
	SubmitNonZeroExit {
		command: String,
		script: PathBuf,
		exit_code: i32,
		stdout: String,
		stderr: String,
	},

	#[error("Failed to read global config: {path}")]
	GlobalConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse global config: {path}")]
	GlobalConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}

/// Result type alias using HeroError.
pub type Result<T> = std::result::Result<T, HeroError>;
