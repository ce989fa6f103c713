//! Rule matching for hero.
//!
//! This module handles:
//! - Compiling experiment rule patterns
//! - Method eligibility and path applicability
//! - First-match-wins experiment selection

pub mod matcher;

pub use matcher::{CompiledExperiment, compile_experiments, select, select_experiment};
