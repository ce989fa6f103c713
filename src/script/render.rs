use crate::config::types::{JobDefinition, Method, User};
use crate::error::{HeroError, Result};
use crate::script::template::render_command;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Layout of the `# Date:` comment. Sub-second digits are trimmed to 0, 3, 6
/// or 9 places.
const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

/// Separator echoed around each `date` marker in the job log.
const MARKER: &str = "echo \"########################\"";

/// Everything the outer batch script needs, resolved.
#[derive(Debug, Clone)]
pub struct CompiledJob<'a> {
	pub user: &'a User,
	pub experiment: &'a str,
	pub created: String,
	pub file: &'a Path,
	pub base_dir: PathBuf,
	pub method: Method,
	pub scripts: Vec<String>,
	pub cpus: u32,
	pub mem: u32,
	pub time: &'a str,
	pub queue: &'a str,
}

/// A rendered job script and the file name it should be written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledScript {
	pub experiment: String,
	pub body: String,
	pub file_name: String,
}

impl CompiledJob<'_> {
	/// Render the Slurm batch script.
	pub fn render(&self) -> String {
		let file = self.file.display();
		let base_dir = self.base_dir.display();
		let experiment = self.experiment;

		let mut out = String::new();
		out.push_str("#!/bin/bash\n");
		out.push_str(&format!("#SBATCH --job-name={experiment}\n"));
		out.push_str(&format!("#SBATCH -e {base_dir}/{experiment}-%j.err\n"));
		out.push_str(&format!("#SBATCH -o {base_dir}/{experiment}-%j.out\n"));
		out.push_str(&format!("#SBATCH --uid {}\n", self.user.uid));
		out.push_str(&format!("#SBATCH --gid {}\n", self.user.gid));
		out.push('\n');
		out.push_str(&format!("#SBATCH --chdir {base_dir}\n"));

		let optional = [
			(!self.queue.is_empty()).then(|| format!("#SBATCH --partition={}", self.queue)),
			(self.cpus > 0).then(|| format!("#SBATCH --cpus-per-task={}", self.cpus)),
			(self.mem > 0).then(|| format!("#SBATCH --mem={}G", self.mem)),
			(!self.time.is_empty()).then(|| format!("#SBATCH --time={}", self.time)),
		];
		for directive in optional {
			if let Some(directive) = directive {
				out.push('\n');
				out.push_str(&directive);
				out.push('\n');
			}
			out.push('\n');
		}

		out.push_str("set -e\n");
		out.push_str(&format!("# User: {}\n", self.user.name));
		out.push_str(&format!("# File: {file}\n"));
		out.push_str(&format!("# Experiment: {experiment}\n"));
		out.push_str(&format!("# Date: {}\n", self.created));
		out.push_str(&format!("export FILE={file}\n"));
		out.push_str(&format!("export WORKDIR={base_dir}\n"));
		out.push_str(&format!("export METHOD={}\n", self.method));
		push_date_marker(&mut out);
		out.push_str("if [ ! -e $FILE ]; then\n");
		out.push_str("    echo \"File $FILE not found\"\n");
		out.push_str("    exit 1\n");
		out.push_str("fi\n");

		for command in &self.scripts {
			out.push('\n');
			push_date_marker(&mut out);
			out.push_str(command);
			out.push('\n');
		}
		out.push('\n');

		out
	}
}

fn push_date_marker(out: &mut String) {
	out.push_str(MARKER);
	out.push_str("\ndate\n");
	out.push_str(MARKER);
	out.push('\n');
}

/// Render the per-job commands in order (stage 1).
pub fn render_commands(file: &Path, experiment: &str, job: &JobDefinition) -> Result<Vec<String>> {
	job.scripts
		.iter()
		.map(|template| {
			render_command(template, file).map_err(|source| HeroError::Render {
				experiment: experiment.to_string(),
				template: template.clone(),
				source,
			})
		})
		.collect()
}

/// Compile a job script for `file` using the current time.
pub fn compile_script(
	method: Method,
	file: &Path,
	experiment: &str,
	job: &JobDefinition,
	user: &User,
) -> Result<CompiledScript> {
	compile_script_at(method, file, experiment, job, user, Local::now())
}

/// Compile a job script with an explicit creation time.
///
/// The file name is `{experiment}_{unix_seconds}.sh`; two calls for the same
/// experiment within one second produce the same name.
pub fn compile_script_at(
	method: Method,
	file: &Path,
	experiment: &str,
	job: &JobDefinition,
	user: &User,
	created: DateTime<Local>,
) -> Result<CompiledScript> {
	let scripts = render_commands(file, experiment, job)?;

	let compiled = CompiledJob {
		user,
		experiment,
		created: created.format(CREATED_FORMAT).to_string(),
		file,
		base_dir: file.parent().unwrap_or(file).to_path_buf(),
		method,
		scripts,
		cpus: job.cpus,
		mem: job.mem,
		time: &job.time,
		queue: &job.queue,
	};

	Ok(CompiledScript {
		experiment: experiment.to_string(),
		body: compiled.render(),
		file_name: format!("{experiment}_{}.sh", created.timestamp()),
	})
}
