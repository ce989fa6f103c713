use crate::config::types::{ConfigFile, Experiment, Method};
use crate::error::{HeroError, Result};
use regex::Regex;
use std::path::Path;
use tracing::debug;

/// An experiment with its rules compiled, ready for matching.
#[derive(Debug)]
pub struct CompiledExperiment<'a> {
	/// The experiment as parsed from the config file.
	pub experiment: &'a Experiment,

	/// Compiled rule patterns, in config order.
	pub rules: Vec<Regex>,
}

impl CompiledExperiment<'_> {
	/// Compile every rule of an experiment.
	pub fn compile(experiment: &Experiment) -> Result<CompiledExperiment<'_>> {
		let rules = experiment
			.job
			.rules
			.iter()
			.map(|pattern| compile_regex(&experiment.name, pattern))
			.collect::<Result<Vec<_>>>()?;

		Ok(CompiledExperiment { experiment, rules })
	}

	pub fn name(&self) -> &str {
		&self.experiment.name
	}

	/// Whether the experiment reacts to this event.
	pub fn is_eligible(&self, method: Method) -> bool {
		self.experiment.job.accepts(method)
	}

	/// Index of the first rule matching the path, if any.
	pub fn matching_rule(&self, path: &Path) -> Option<usize> {
		let path_str = path.to_string_lossy();
		self.rules.iter().position(|regex| {
			debug!(experiment = %self.name(), rule = regex.as_str(), "testing rule");
			regex.is_match(&path_str)
		})
	}
}

/// Compile a regex pattern string.
fn compile_regex(experiment: &str, pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| HeroError::InvalidRegex {
		experiment: experiment.to_string(),
		pattern: pattern.to_string(),
		source,
	})
}

/// Compile all experiments in a config file.
///
/// Every pattern is compiled up front so a broken rule is reported no matter
/// which event arrives.
pub fn compile_experiments(config: &ConfigFile) -> Result<Vec<CompiledExperiment<'_>>> {
	config
		.experiments
		.iter()
		.map(CompiledExperiment::compile)
		.collect()
}

/// Find the first experiment, in config order, that is both eligible for
/// `method` and has a rule matching `path`.
pub fn select_experiment<'a, 'c>(
	experiments: &'a [CompiledExperiment<'c>],
	method: Method,
	path: &Path,
) -> Option<&'a CompiledExperiment<'c>> {
	experiments.iter().find(|compiled| {
		if !compiled.is_eligible(method) {
			debug!(experiment = %compiled.name(), %method, "skipping, method not accepted");
			return false;
		}
		compiled.matching_rule(path).is_some()
	})
}

/// Compile and select in one step.
pub fn select<'c>(
	config: &'c ConfigFile,
	method: Method,
	path: &Path,
) -> Result<Option<&'c Experiment>> {
	let compiled = compile_experiments(config)?;
	Ok(select_experiment(&compiled, method, path).map(|selected| selected.experiment))
}
