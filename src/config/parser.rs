use crate::config::types::{ConfigFile, Experiment, JobDefinition};
use crate::error::{HeroError, Result};
use serde_yaml::Value;
use std::collections::HashSet;
use std::path::Path;

/// Top-level key holding the experiment table.
const HERO_KEY: &str = "hero";

/// Parse a `.hero` file from the given path.
pub fn parse_config_file(path: &Path) -> Result<ConfigFile> {
	let content = std::fs::read_to_string(path).map_err(|source| HeroError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_str(&content, path)
}

/// Parse a `.hero` document from a string (useful for testing).
///
/// The `hero` table may be either a mapping of name to definition or a
/// sequence of definitions each carrying a `name` field. Both keep document
/// order.
pub fn parse_config_str(content: &str, path: &Path) -> Result<ConfigFile> {
	let document: Value =
		serde_yaml::from_str(content).map_err(|source| HeroError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	let table = match document {
		Value::Null => Value::Null,
		Value::Mapping(mut root) => root.remove(HERO_KEY).unwrap_or(Value::Null),
		_ => return Err(invalid(path, "top-level document must be a mapping")),
	};

	let experiments = match table {
		Value::Null => Vec::new(),
		Value::Mapping(entries) => {
			let mut experiments = Vec::with_capacity(entries.len());
			for (key, body) in entries {
				let name = match key {
					Value::String(name) => name,
					other => {
						return Err(invalid(
							path,
							format!("experiment name must be a string, got {other:?}"),
						));
					}
				};
				let job = parse_job(body, path)?;
				experiments.push(Experiment { name, job });
			}
			experiments
		}
		Value::Sequence(items) => {
			let mut experiments = Vec::with_capacity(items.len());
			for item in items {
				let Value::Mapping(mut fields) = item else {
					return Err(invalid(path, "each experiment in the list must be a mapping"));
				};
				let name = match fields.remove("name") {
					Some(Value::String(name)) => name,
					_ => {
						return Err(invalid(
							path,
							"each experiment in the list needs a string `name`",
						));
					}
				};
				let job = parse_job(Value::Mapping(fields), path)?;
				experiments.push(Experiment { name, job });
			}
			experiments
		}
		_ => {
			return Err(invalid(
				path,
				"`hero` must be a mapping or a list of experiments",
			));
		}
	};

	let config = ConfigFile {
		path: path.to_path_buf(),
		experiments,
	};
	config.validate()?;

	Ok(config)
}

fn parse_job(body: Value, path: &Path) -> Result<JobDefinition> {
	if body.is_null() {
		return Ok(JobDefinition::default());
	}
	serde_yaml::from_value(body).map_err(|source| HeroError::ConfigParseError {
		path: path.to_path_buf(),
		source,
	})
}

fn invalid(path: &Path, message: impl Into<String>) -> HeroError {
	HeroError::InvalidConfig {
		path: path.to_path_buf(),
		message: message.into(),
	}
}

impl ConfigFile {
	/// Validate experiment names: they end up in file names, scheduler
	/// directives and script comments, one line each.
	pub fn validate(&self) -> Result<()> {
		let mut seen = HashSet::new();
		for experiment in &self.experiments {
			let name = experiment.name.as_str();
			if name.trim().is_empty() {
				return Err(invalid(&self.path, "experiment name must not be empty"));
			}
			if name.chars().any(|c| c.is_control() || c.is_whitespace()) {
				return Err(invalid(
					&self.path,
					format!(
						"experiment name {name:?} must not contain whitespace or control characters"
					),
				));
			}
			if name.contains('/') || name == "." || name == ".." {
				return Err(invalid(
					&self.path,
					format!("experiment name {name:?} is not usable as a file name"),
				));
			}
			if !seen.insert(name) {
				return Err(invalid(
					&self.path,
					format!("duplicate experiment name {name:?}"),
				));
			}
		}
		Ok(())
	}
}
