use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use hero_cli::config::{
	CONFIG_FILE_NAME, GlobalConfig, Method, User, locate_config, parse_config_file,
	resolve_event_path,
};
use hero_cli::rules::{compile_experiments, select_experiment};
use hero_cli::{create_job, submit_job};

mod logging;

use logging::{LogLevel, init_logging};

#[derive(Parser)]
#[command(name = "hero")]
#[command(
	author,
	version,
	about = "Turns file events into batch-scheduler job scripts driven by .hero rules"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Log level (overrides HERO_LOG)
	#[arg(long, global = true, value_enum)]
	log_level: Option<LogLevel>,

	/// Global settings file (TOML)
	#[arg(long, global = true, value_name = "FILE")]
	config: Option<PathBuf>,

	/// Directory for generated job scripts (overrides the settings file)
	#[arg(long, global = true, value_name = "DIR")]
	script_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
	/// Create a job script for a file event; prints its path if one applies
	Create {
		/// The file that was added, edited or deleted
		file: PathBuf,

		/// The file event: add, edit or delete
		#[arg(long, short)]
		method: Method,

		#[command(flatten)]
		user: UserArgs,

		/// Submit the created script to the scheduler
		#[arg(long)]
		submit: bool,
	},
	/// Submit an existing job script from the script directory
	Submit {
		script: PathBuf,

		#[command(flatten)]
		user: UserArgs,
	},
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
	/// Create a template .hero in the current directory
	Init {
		/// Overwrite an existing .hero
		#[arg(long)]
		force: bool,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Show which .hero governs a path and its experiments in match order
	Show {
		file: PathBuf,

		/// Home directory for the fallback lookup
		#[arg(long)]
		home: Option<PathBuf>,
	},
	/// Check the governing .hero for errors without creating anything
	Validate {
		file: PathBuf,

		/// Home directory for the fallback lookup
		#[arg(long)]
		home: Option<PathBuf>,
	},
}

/// The account the job runs for.
#[derive(Args)]
struct UserArgs {
	/// User name
	#[arg(long = "user", short = 'u')]
	name: String,

	/// Numeric user id
	#[arg(long)]
	uid: u32,

	/// Numeric group id
	#[arg(long)]
	gid: u32,

	/// Home directory (defaults to the current account's home)
	#[arg(long)]
	home: Option<PathBuf>,
}

impl UserArgs {
	fn into_user(self) -> Result<User> {
		Ok(User {
			name: self.name,
			uid: self.uid,
			gid: self.gid,
			home: resolve_home(self.home)?,
		})
	}
}

fn resolve_home(home: Option<PathBuf>) -> Result<PathBuf> {
	match home {
		Some(home) => Ok(home),
		None => dirs::home_dir().context("Failed to resolve home directory"),
	}
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_logging(cli.log_level);

	match cli.command {
		Commands::Create {
			file,
			method,
			user,
			submit,
		} => {
			let cfg = load_global_config(cli.config.as_deref(), cli.script_dir)?;
			handle_create(&file, method, user.into_user()?, &cfg, submit)
		}
		Commands::Submit { script, user } => {
			let cfg = load_global_config(cli.config.as_deref(), cli.script_dir)?;
			handle_submit(&script, &user.into_user()?, &cfg)
		}
		Commands::Config { action } => match action {
			ConfigAction::Show { file, home } => handle_config_show(&file, resolve_home(home)?),
			ConfigAction::Validate { file, home } => {
				handle_config_validate(&file, resolve_home(home)?)
			}
		},
		Commands::Init { force } => handle_init(force),
	}
}

/// Settings precedence: `--script-dir` > settings file > defaults.
fn load_global_config(path: Option<&Path>, script_dir: Option<PathBuf>) -> Result<GlobalConfig> {
	let path = path
		.map(Path::to_path_buf)
		.or_else(|| std::env::var_os("HERO_CONFIG").map(PathBuf::from));

	let cfg = match path {
		Some(path) => GlobalConfig::from_file(&path)
			.with_context(|| format!("Failed to load settings from {}", path.display()))?,
		None => GlobalConfig::default(),
	};

	Ok(match script_dir {
		Some(dir) => GlobalConfig {
			script_dir: dir,
			..cfg
		},
		None => cfg,
	})
}

fn handle_create(
	file: &Path,
	method: Method,
	user: User,
	cfg: &GlobalConfig,
	submit: bool,
) -> Result<ExitCode> {
	let script = create_job(file, method, &user, cfg)
		.with_context(|| format!("Failed to create job for {}", file.display()))?;

	let Some(script) = script else {
		return Ok(ExitCode::SUCCESS);
	};
	println!("{}", script.display());

	if submit {
		return handle_submit(&script, &user, cfg);
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_submit(script: &Path, user: &User, cfg: &GlobalConfig) -> Result<ExitCode> {
	let submission = submit_job(script, user, cfg)
		.with_context(|| format!("Failed to submit {}", script.display()))?;

	match submission.job_id() {
		Some(id) => println!("Submitted job {id}"),
		None => print!("{}", submission.stdout),
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show(file: &Path, home: PathBuf) -> Result<ExitCode> {
	let full_path = resolve_event_path(file)
		.with_context(|| format!("Failed to resolve {}", file.display()))?;

	let Some(location) = locate_config(&full_path, &home) else {
		println!("No .hero found for {}", full_path.display());
		return Ok(ExitCode::SUCCESS);
	};

	let config = parse_config_file(&location.path).context("Failed to load .hero")?;

	println!("# Source: {} ({})", location.path.display(), location.origin.as_str());
	println!("# experiments: {}", config.experiments.len());
	println!();

	for (i, experiment) in config.experiments.iter().enumerate() {
		let job = &experiment.job;
		println!("  Experiment {}: {}", i + 1, experiment.name);
		if job.methods.is_empty() {
			println!("    methods: add (default)");
		} else {
			let methods: Vec<&str> = job.methods.iter().map(Method::as_str).collect();
			println!("    methods: {}", methods.join(", "));
		}
		for rule in &job.rules {
			println!("    rule: {}", rule);
		}
		for script in &job.scripts {
			println!("    script: {}", script);
		}
		if !job.queue.is_empty() {
			println!("    queue: {}", job.queue);
		}
		if job.cpus > 0 {
			println!("    cpus: {}", job.cpus);
		}
		if job.mem > 0 {
			println!("    mem: {}G", job.mem);
		}
		if !job.time.is_empty() {
			println!("    time: {}", job.time);
		}
		println!();
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(file: &Path, home: PathBuf) -> Result<ExitCode> {
	let full_path = resolve_event_path(file)
		.with_context(|| format!("Failed to resolve {}", file.display()))?;

	let Some(location) = locate_config(&full_path, &home) else {
		println!("No .hero found for {}", full_path.display());
		return Ok(ExitCode::SUCCESS);
	};

	let checked = parse_config_file(&location.path).and_then(|config| {
		let compiled = compile_experiments(&config)?;
		let matches: Vec<&str> = [Method::Add, Method::Edit, Method::Delete]
			.into_iter()
			.filter(|method| select_experiment(&compiled, *method, &full_path).is_some())
			.map(|method| method.as_str())
			.collect();
		Ok((config.experiments.len(), matches))
	});

	match checked {
		Ok((count, matches)) => {
			println!(
				"{} is valid ({} experiments)",
				location.path.display(),
				count
			);
			if matches.is_empty() {
				println!("  no experiment applies to {}", full_path.display());
			} else {
				println!("  applies to {} on: {}", full_path.display(), matches.join(", "));
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!(".hero already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, INIT_TEMPLATE)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created .hero");
	Ok(ExitCode::SUCCESS)
}

const INIT_TEMPLATE: &str = r#"# hero experiments for files in this directory and below.
# The first experiment whose methods and rules both match a file is used.
hero:
  example:
    # File events to react to: add, edit, delete. Empty means add only.
    methods: [add]
    # Regular expressions tested against the absolute file path.
    rules:
      - '\.csv$'
    # Commands run by the job; {{File}} is the file that changed.
    scripts:
      - "echo processing {{File}}"
    # Optional resources; leave out or set to 0 / "" to omit.
    cpus: 1
    mem: 1
    time: "00:10:00"
    queue: ""
"#;
