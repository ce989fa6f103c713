//! Job submission for hero.
//!
//! This module handles:
//! - Checking that a script lives in the configured script directory
//! - Running the scheduler's submit command with captured output
//! - Reporting the scheduler's reply

use crate::config::{GlobalConfig, User};
use crate::error::{HeroError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Captured result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
	/// The canonical script path that was submitted.
	pub script: PathBuf,

	pub stdout: String,

	pub stderr: String,
}

impl Submission {
	/// Job id from a Slurm-style `Submitted batch job <id>` reply.
	pub fn job_id(&self) -> Option<u64> {
		self.stdout.lines().find_map(|line| {
			line.trim()
				.strip_prefix("Submitted batch job ")
				.and_then(|id| id.trim().parse().ok())
		})
	}
}

/// Resolve `script` and make sure it lies inside `script_dir`.
pub fn resolve_script(script: &Path, script_dir: &Path) -> Result<PathBuf> {
	let resolved = script
		.canonicalize()
		.map_err(|source| HeroError::ScriptNotFound {
			path: script.to_path_buf(),
			source,
		})?;
	let dir = script_dir
		.canonicalize()
		.map_err(|source| HeroError::ScriptNotFound {
			path: script_dir.to_path_buf(),
			source,
		})?;

	if !resolved.starts_with(&dir) {
		return Err(HeroError::ScriptOutsideDir {
			script: resolved,
			script_dir: dir,
		});
	}

	Ok(resolved)
}

/// Submit a job script to the scheduler.
///
/// The script must be inside `cfg.script_dir`. The submit command receives the
/// script path as its only argument. Non-zero exits are errors carrying the
/// captured output; nothing is retried.
pub fn submit_job(script: &Path, user: &User, cfg: &GlobalConfig) -> Result<Submission> {
	let script = resolve_script(script, &cfg.script_dir)?;

	debug!(
		script = %script.display(),
		user = %user.name,
		command = %cfg.submit_command,
		"submitting job"
	);

	let output = Command::new(&cfg.submit_command)
		.arg(&script)
		.stdin(Stdio::null())
		.output()
		.map_err(|source| HeroError::SubmitFailed {
			command: cfg.submit_command.clone(),
			source,
		})?;

	let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
	let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
	debug!(script = %script.display(), %stdout, %stderr, "submit command finished");

	if !output.status.success() {
		return Err(HeroError::SubmitNonZeroExit {
			command: cfg.submit_command.clone(),
			script,
			exit_code: output.status.code().unwrap_or(-1),
			stdout,
			stderr,
		});
	}

	Ok(Submission {
		script,
		stdout,
		stderr,
	})
}
