#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn hero_cmd() -> assert_cmd::Command {
	let mut cmd = assert_cmd::Command::cargo_bin("hero").unwrap();
	cmd.env_remove("HERO_CONFIG").env_remove("HERO_LOG");
	cmd
}

/// A scratch tree with separate home, data and script directories.
struct Workspace {
	_root: tempfile::TempDir,
	home: PathBuf,
	data: PathBuf,
	scripts: PathBuf,
}

impl Workspace {
	fn new() -> Self {
		let root = tempfile::tempdir().unwrap();
		// Canonicalize to handle macOS /var -> /private/var symlinks
		let base = root.path().canonicalize().unwrap();
		let home = base.join("home");
		let data = base.join("data");
		let scripts = base.join("scripts");
		fs::create_dir_all(&home).unwrap();
		fs::create_dir_all(&data).unwrap();
		Workspace {
			_root: root,
			home,
			data,
			scripts,
		}
	}

	fn create(&self, file: &Path, method: &str) -> assert_cmd::Command {
		let mut cmd = hero_cmd();
		cmd.arg("--script-dir")
			.arg(&self.scripts)
			.arg("create")
			.arg(file)
			.args(["--method", method, "--user", "alice", "--uid", "1001", "--gid", "100"])
			.arg("--home")
			.arg(&self.home);
		cmd
	}

	fn scripts(&self) -> Vec<PathBuf> {
		match fs::read_dir(&self.scripts) {
			Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
			Err(_) => Vec::new(),
		}
	}
}

const CSV_CONFIG: &str = r#"
hero:
  e1:
    rules: ['\.csv$']
    scripts: ["validate {{File}}"]
    cpus: 2
    queue: short
"#;

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	hero_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("batch-scheduler job scripts"));
}

#[test]
fn test_version_flag() {
	hero_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("hero"));
}

#[test]
fn test_no_args_shows_help() {
	hero_cmd()
		.assert()
		.failure()
		.stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_method_rejected() {
	let ws = Workspace::new();
	ws.create(&ws.data.join("x.csv"), "rename")
		.assert()
		.failure()
		.stderr(predicate::str::contains("rename"));
}

// ============================================================================
// create tests
// ============================================================================

#[test]
fn test_create_writes_script() {
	let ws = Workspace::new();
	fs::write(ws.data.join(".hero"), CSV_CONFIG).unwrap();
	let file = ws.data.join("x.csv");

	ws.create(&file, "add")
		.assert()
		.success()
		.stdout(predicate::str::contains("e1_").and(predicate::str::contains(".sh")));

	let scripts = ws.scripts();
	assert_eq!(scripts.len(), 1);

	let body = fs::read_to_string(&scripts[0]).unwrap();
	assert!(body.starts_with("#!/bin/bash\n"));
	assert!(body.contains(&format!("validate {}", file.display())));
	assert!(body.contains("#SBATCH --partition=short"));
	assert!(body.contains("#SBATCH --cpus-per-task=2"));
	assert!(!body.contains("#SBATCH --mem="));
	assert!(body.contains("#SBATCH --uid 1001"));
	assert!(body.contains("#SBATCH --gid 100"));
	assert!(body.contains("# User: alice"));
}

#[test]
fn test_create_no_config_prints_nothing() {
	let ws = Workspace::new();

	ws.create(&ws.data.join("x.csv"), "add")
		.assert()
		.success()
		.stdout(predicate::str::is_empty());

	assert!(ws.scripts().is_empty());
}

#[test]
fn test_create_no_match_prints_nothing() {
	let ws = Workspace::new();
	fs::write(ws.data.join(".hero"), CSV_CONFIG).unwrap();

	ws.create(&ws.data.join("x.txt"), "add")
		.assert()
		.success()
		.stdout(predicate::str::is_empty());

	assert!(ws.scripts().is_empty());
}

#[test]
fn test_create_edit_needs_explicit_method() {
	let ws = Workspace::new();
	fs::write(ws.data.join(".hero"), CSV_CONFIG).unwrap();

	ws.create(&ws.data.join("x.csv"), "edit")
		.assert()
		.success()
		.stdout(predicate::str::is_empty());
}

#[test]
fn test_create_uses_home_config() {
	let ws = Workspace::new();
	fs::write(ws.home.join(".hero"), CSV_CONFIG).unwrap();

	ws.create(&ws.data.join("x.csv"), "add")
		.assert()
		.success()
		.stdout(predicate::str::contains("e1_"));
}

#[test]
fn test_create_broken_config_fails() {
	let ws = Workspace::new();
	fs::write(ws.data.join(".hero"), "hero:\n  e1:\n    rules: ['[bad']\n").unwrap();

	ws.create(&ws.data.join("x.csv"), "add")
		.assert()
		.failure()
		.stderr(predicate::str::contains("Invalid regex"));
}

#[test]
fn test_create_for_deleted_file() {
	let ws = Workspace::new();
	fs::write(
		ws.data.join(".hero"),
		r#"
hero:
  cleanup:
    methods: [delete]
    rules: ['\.csv$']
    scripts: ["echo gone {{File}}"]
"#,
	)
	.unwrap();

	// The file never existed; delete events still compile.
	ws.create(&ws.data.join("old.csv"), "delete")
		.assert()
		.success()
		.stdout(predicate::str::contains("cleanup_"));

	let scripts = ws.scripts();
	let body = fs::read_to_string(&scripts[0]).unwrap();
	assert!(body.contains("export METHOD=delete"));
}

#[test]
fn test_settings_file_sets_script_dir() {
	let ws = Workspace::new();
	fs::write(ws.data.join(".hero"), CSV_CONFIG).unwrap();
	let settings = ws.home.join("hero.toml");
	fs::write(
		&settings,
		format!("script-dir = \"{}\"\n", ws.scripts.display()),
	)
	.unwrap();

	hero_cmd()
		.arg("--config")
		.arg(&settings)
		.arg("create")
		.arg(ws.data.join("x.csv"))
		.args(["--method", "add", "--user", "alice", "--uid", "1", "--gid", "1"])
		.arg("--home")
		.arg(&ws.home)
		.assert()
		.success();

	assert_eq!(ws.scripts().len(), 1);
}

#[cfg(unix)]
#[test]
fn test_create_and_submit() {
	let ws = Workspace::new();
	fs::write(ws.data.join(".hero"), CSV_CONFIG).unwrap();
	let settings = ws.home.join("hero.toml");
	fs::write(
		&settings,
		format!(
			"script-dir = \"{}\"\nsubmit-command = \"echo\"\n",
			ws.scripts.display()
		),
	)
	.unwrap();

	hero_cmd()
		.arg("--config")
		.arg(&settings)
		.arg("create")
		.arg(ws.data.join("x.csv"))
		.args(["--method", "add", "--user", "alice", "--uid", "1", "--gid", "1"])
		.arg("--home")
		.arg(&ws.home)
		.arg("--submit")
		.assert()
		.success()
		.stdout(predicate::str::contains("e1_"));
}

// ============================================================================
// submit tests
// ============================================================================

#[test]
fn test_submit_rejects_script_outside_dir() {
	let ws = Workspace::new();
	fs::create_dir_all(&ws.scripts).unwrap();
	let script = ws.data.join("evil.sh");
	fs::write(&script, "#!/bin/bash\n").unwrap();

	hero_cmd()
		.arg("--script-dir")
		.arg(&ws.scripts)
		.arg("submit")
		.arg(&script)
		.args(["--user", "alice", "--uid", "1", "--gid", "1"])
		.arg("--home")
		.arg(&ws.home)
		.assert()
		.failure()
		.stderr(predicate::str::contains("is not in"));
}

// ============================================================================
// config subcommand tests
// ============================================================================

#[test]
fn test_config_show_lists_experiments_in_order() {
	let ws = Workspace::new();
	fs::write(
		ws.data.join(".hero"),
		"hero:\n  second:\n    rules: ['a']\n  first:\n    rules: ['b']\n    methods: [edit]\n",
	)
	.unwrap();

	let output = hero_cmd()
		.args(["config", "show"])
		.arg(ws.data.join("x.csv"))
		.arg("--home")
		.arg(&ws.home)
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let stdout = String::from_utf8(output).unwrap();
	let second = stdout.find("Experiment 1: second").unwrap();
	let first = stdout.find("Experiment 2: first").unwrap();
	assert!(second < first);
	assert!(stdout.contains("methods: edit"));
	assert!(stdout.contains("(ancestor)"));
}

#[test]
fn test_config_show_no_config() {
	let ws = Workspace::new();

	hero_cmd()
		.args(["config", "show"])
		.arg(ws.data.join("x.csv"))
		.arg("--home")
		.arg(&ws.home)
		.assert()
		.success()
		.stdout(predicate::str::contains("No .hero found"));
}

#[test]
fn test_config_show_cleans_parent_components() {
	let ws = Workspace::new();
	let sub = ws.data.join("sub");
	fs::create_dir_all(&sub).unwrap();
	fs::write(sub.join(".hero"), "hero:\n  inner:\n    rules: ['.*']\n").unwrap();

	hero_cmd()
		.args(["config", "show"])
		.arg(sub.join("../x.csv"))
		.arg("--home")
		.arg(&ws.home)
		.assert()
		.success()
		.stdout(predicate::str::contains(format!(
			"No .hero found for {}",
			ws.data.join("x.csv").display()
		)));
}

#[test]
fn test_config_validate_valid() {
	let ws = Workspace::new();
	fs::write(ws.data.join(".hero"), CSV_CONFIG).unwrap();

	hero_cmd()
		.args(["config", "validate"])
		.arg(ws.data.join("x.csv"))
		.arg("--home")
		.arg(&ws.home)
		.assert()
		.success()
		.stdout(predicate::str::contains("is valid"))
		.stdout(predicate::str::contains("on: add"));
}

#[test]
fn test_config_validate_invalid() {
	let ws = Workspace::new();
	fs::write(ws.data.join(".hero"), "hero:\n  e1:\n    rules: ['(open']\n").unwrap();

	hero_cmd()
		.args(["config", "validate"])
		.arg(ws.data.join("x.csv"))
		.arg("--home")
		.arg(&ws.home)
		.assert()
		.failure()
		.stderr(predicate::str::contains("Configuration error"));
}

// ============================================================================
// init tests
// ============================================================================

#[test]
fn test_init_creates_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join(".hero");

	hero_cmd()
		.arg("init")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Created .hero"));

	let content = fs::read_to_string(&config_path).unwrap();
	assert!(content.contains("hero:"));
	assert!(content.contains("{{File}}"));
}

#[test]
fn test_init_fails_if_exists() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join(".hero"), "# existing").unwrap();

	hero_cmd()
		.arg("init")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_template_is_usable() {
	let temp_dir = tempfile::tempdir().unwrap();
	let base = temp_dir.path().canonicalize().unwrap();

	hero_cmd()
		.args(["init", "--force"])
		.current_dir(&base)
		.assert()
		.success();

	hero_cmd()
		.args(["config", "validate"])
		.arg(base.join("x.csv"))
		.arg("--home")
		.arg(&base)
		.assert()
		.success()
		.stdout(predicate::str::contains("on: add"));
}
