use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::HeroError;

/// The kind of file event that triggered the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
	Add,
	Edit,
	Delete,
}

impl Method {
	/// Get the string representation used in `.hero` files and the `METHOD` env var.
	pub fn as_str(&self) -> &'static str {
		match self {
			Method::Add => "add",
			Method::Edit => "edit",
			Method::Delete => "delete",
		}
	}
}

impl fmt::Display for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Method {
	type Err = HeroError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"add" => Ok(Method::Add),
			"edit" => Ok(Method::Edit),
			"delete" => Ok(Method::Delete),
			_ => Err(HeroError::UnknownMethod {
				value: s.to_string(),
			}),
		}
	}
}

/// The account a job is created for. Resolved by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
	pub name: String,
	pub uid: u32,
	pub gid: u32,
	pub home: PathBuf,
}

/// One experiment definition from a `.hero` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JobDefinition {
	/// Events this experiment reacts to. Empty means add only.
	pub methods: Vec<Method>,

	/// Regex patterns tested against the absolute file path, in order.
	pub rules: Vec<String>,

	/// Shell command templates; `{{File}}` is replaced by the file path.
	pub scripts: Vec<String>,

	/// Number of cpus per task. 0 omits the directive.
	pub cpus: u32,

	/// Memory in GB. 0 omits the directive.
	pub mem: u32,

	/// Wall time limit, `HH:MM:SS`. Empty omits the directive.
	pub time: String,

	/// Partition name. Empty omits the directive.
	pub queue: String,
}

impl JobDefinition {
	/// Whether this experiment reacts to the given event.
	pub fn accepts(&self, method: Method) -> bool {
		if self.methods.is_empty() {
			return method == Method::Add;
		}
		self.methods.contains(&method)
	}
}

/// A named experiment, kept in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experiment {
	pub name: String,
	pub job: JobDefinition,
}

/// A parsed `.hero` file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
	/// The path this config was loaded from.
	pub path: PathBuf,

	/// Experiments in the order they appear in the file (first match wins).
	pub experiments: Vec<Experiment>,
}
