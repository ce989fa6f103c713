//! Hero - turns file events into batch-scheduler job scripts.
//!
//! This library provides the core functionality for hero, including:
//! - `.hero` discovery up the directory tree with a home fallback
//! - Experiment selection by event kind and path rules
//! - Two-stage job script rendering and atomic script output
//! - Job submission through the scheduler's submit command
//!
//! # Example
//!
//! ```no_run
//! use hero_cli::config::{GlobalConfig, Method, User};
//! use hero_cli::create_job;
//! use std::path::Path;
//!
//! let user = User {
//!     name: "alice".to_string(),
//!     uid: 1001,
//!     gid: 100,
//!     home: "/home/alice".into(),
//! };
//! let cfg = GlobalConfig::new(Some("/shared/hero".into()));
//!
//! match create_job(Path::new("/data/run1/x.csv"), Method::Add, &user, &cfg).unwrap() {
//!     Some(script) => println!("wrote {}", script.display()),
//!     None => println!("no experiment applies"),
//! }
//! ```

pub mod config;
pub mod error;
pub mod job;
pub mod rules;
pub mod script;
pub mod submit;

pub use error::{HeroError, Result};
pub use job::create_job;
pub use submit::{Submission, submit_job};
