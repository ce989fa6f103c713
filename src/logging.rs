//! Logging setup for the `hero` binary using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `HERO_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `warn`
//!
//! Logs go to stderr; stdout carries the script path for the calling hook.

use clap::ValueEnum;
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
	Error,
	Warn,
	Info,
	Debug,
	Trace,
}

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) {
	let level = match cli_level {
		Some(lvl) => level_from_log_level(lvl),
		None => std::env::var("HERO_LOG")
			.ok()
			.and_then(|s| parse_level_str(&s))
			.unwrap_or(Level::WARN),
	};

	tracing_subscriber::fmt()
		.with_max_level(level)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

fn level_from_log_level(lvl: LogLevel) -> Level {
	match lvl {
		LogLevel::Error => Level::ERROR,
		LogLevel::Warn => Level::WARN,
		LogLevel::Info => Level::INFO,
		LogLevel::Debug => Level::DEBUG,
		LogLevel::Trace => Level::TRACE,
	}
}

fn parse_level_str(s: &str) -> Option<Level> {
	match s.trim().to_lowercase().as_str() {
		"error" => Some(Level::ERROR),
		"warn" | "warning" => Some(Level::WARN),
		"info" => Some(Level::INFO),
		"debug" => Some(Level::DEBUG),
		"trace" => Some(Level::TRACE),
		_ => None,
	}
}
