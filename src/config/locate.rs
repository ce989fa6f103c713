use crate::error::{HeroError, Result};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// File name of a per-directory hero config.
pub const CONFIG_FILE_NAME: &str = ".hero";

/// Where a governing config file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
	/// In the file's directory or one of its ancestors.
	Ancestor,
	/// In the user's home directory (fallback).
	Home,
}

impl ConfigOrigin {
	pub fn as_str(&self) -> &'static str {
		match self {
			ConfigOrigin::Ancestor => "ancestor",
			ConfigOrigin::Home => "home",
		}
	}
}

/// The config file that governs a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
	pub path: PathBuf,
	pub origin: ConfigOrigin,
}

/// Make an event path absolute and lexically clean.
///
/// `.` components are dropped and each `..` removes the preceding component.
/// Symlinks are not resolved, so paths of deleted files still work.
pub fn resolve_event_path(file: &Path) -> Result<PathBuf> {
	let absolute = std::path::absolute(file).map_err(|source| HeroError::InvalidPath {
		path: file.to_path_buf(),
		source,
	})?;
	Ok(normalize_path(&absolute))
}

fn normalize_path(path: &Path) -> PathBuf {
	let mut normalized = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				normalized.pop();
			}
			other => normalized.push(other.as_os_str()),
		}
	}
	normalized
}

/// Find the `.hero` file that governs `file`.
///
/// The lookup order is:
/// 1. The directory containing `file`, then each parent up to `/`
/// 2. `<home>/.hero`
///
/// The nearest ancestor wins over the home fallback. `file` must already be
/// absolute and clean (see [`resolve_event_path`]); it does not have to exist
/// (delete events).
pub fn locate_config(file: &Path, home: &Path) -> Option<ConfigLocation> {
	let home_config = home.join(CONFIG_FILE_NAME);
	let home_config = home_config.is_file().then_some(home_config);

	let start_dir = file.parent().unwrap_or(file);
	for dir in start_dir.ancestors() {
		let candidate = dir.join(CONFIG_FILE_NAME);
		debug!(path = %candidate.display(), "checking for config");
		if candidate.is_file() {
			return Some(ConfigLocation {
				path: candidate,
				origin: ConfigOrigin::Ancestor,
			});
		}
	}

	match home_config {
		Some(path) => {
			debug!("no .hero in file hierarchy, using home defaults");
			Some(ConfigLocation {
				path,
				origin: ConfigOrigin::Home,
			})
		}
		None => None,
	}
}
