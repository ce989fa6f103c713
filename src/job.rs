use crate::config::{
	GlobalConfig, Method, User, locate_config, parse_config_file, resolve_event_path,
};
use crate::error::Result;
use crate::rules::{compile_experiments, select_experiment};
use crate::script::compile_script;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Turn a file event into a job script.
///
/// Returns `Ok(None)` when no `.hero` governs the file or no experiment
/// applies; both are normal outcomes. Otherwise the script is written into
/// `cfg.script_dir` and its path is returned.
pub fn create_job(
	file: &Path,
	method: Method,
	user: &User,
	cfg: &GlobalConfig,
) -> Result<Option<PathBuf>> {
	let full_path = resolve_event_path(file)?;

	let Some(location) = locate_config(&full_path, &user.home) else {
		debug!(file = %full_path.display(), "no .hero found, skipping");
		return Ok(None);
	};
	info!(config = %location.path.display(), origin = location.origin.as_str(), "using config");

	let config = parse_config_file(&location.path)?;
	let experiments = compile_experiments(&config)?;

	let Some(selected) = select_experiment(&experiments, method, &full_path) else {
		debug!(file = %full_path.display(), %method, "no experiment matched");
		return Ok(None);
	};
	let experiment = selected.experiment;
	debug!(experiment = %experiment.name, job = ?experiment.job, "experiment selected");

	let script = compile_script(method, &full_path, &experiment.name, &experiment.job, user)?;
	debug!(script = %script.body, "rendered job script");

	script.write_to(&cfg.script_dir).map(Some)
}
