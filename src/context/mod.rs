//! Run context and apply-time gates.
//!
//! This module handles:
//! - Capturing invocation arguments and environment as an explicit value
//! - Gates that decide, when a transform runs, whether its mutation applies

pub mod gate;

pub use gate::{Gate, is_truthy};

use std::collections::HashMap;

/// Environment variable that selects development or production mode.
pub const MODE_ENV_VAR: &str = "NODE_ENV";

/// Environment variable that disables source maps when set to `false`.
pub const SOURCEMAP_ENV_VAR: &str = "GENERATE_SOURCEMAP";

/// The invocation's command-line arguments and environment variables.
///
/// Transforms never read process state directly; they receive a `RunContext`
/// at apply time so the same pipeline can be re-run under a different one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
	/// Arguments of the build invocation (e.g. `--analyze`).
	pub args: Vec<String>,

	/// Environment variables visible to the build.
	pub env: HashMap<String, String>,
}

/// Build mode derived from `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	Development,
	Production,
}

impl RunContext {
	/// Create an empty context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot the current process arguments and environment.
	pub fn from_process() -> Self {
		Self {
			args: std::env::args().skip(1).collect(),
			env: std::env::vars().collect(),
		}
	}

	/// Snapshot the process environment with explicit arguments.
	pub fn from_env_with_args(args: Vec<String>) -> Self {
		Self {
			args,
			env: std::env::vars().collect(),
		}
	}

	pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
		self.args.push(arg.into());
		self
	}

	pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.env.insert(name.into(), value.into());
		self
	}

	/// Whether the argument list contains `flag` exactly.
	pub fn has_flag(&self, flag: &str) -> bool {
		self.args.iter().any(|arg| arg == flag)
	}

	pub fn var(&self, name: &str) -> Option<&str> {
		self.env.get(name).map(String::as_str)
	}

	/// `development` selects [`Mode::Development`]; anything else, including unset, is production.
	pub fn mode(&self) -> Mode {
		match self.var(MODE_ENV_VAR) {
			Some("development") => Mode::Development,
			_ => Mode::Production,
		}
	}

	/// Source maps are generated in production unless `GENERATE_SOURCEMAP=false`.
	pub fn should_use_source_map(&self) -> bool {
		self.mode() == Mode::Production && self.var(SOURCEMAP_ENV_VAR) != Some("false")
	}
}
