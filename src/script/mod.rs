//! Job script compilation for hero.
//!
//! This module handles:
//! - Rendering per-job command templates (`{{File}}` substitution)
//! - Rendering the outer Slurm batch script
//! - Writing the script atomically with executable permissions

pub mod render;
pub mod template;
pub mod write;

pub use render::{CompiledJob, CompiledScript, compile_script, compile_script_at, render_commands};
pub use template::{FILE_PLACEHOLDER, TemplateError, render_command};
