use crate::context::RunContext;
use serde::Deserialize;

/// Apply-time predicate over a [`RunContext`].
///
/// Gates are data, not closures, so they can be parsed from a pipeline file and
/// shown by `rewire config show`. They are evaluated each time the gated
/// transform runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gate {
	#[default]
	Always,

	/// The argument list contains this flag.
	Flag(String),

	/// The environment variable is set to exactly this value.
	EnvEquals { var: String, value: String },

	/// The environment variable is unset or differs from this value.
	EnvNotEquals { var: String, value: String },

	/// The environment variable is set to a truthy value.
	EnvTruthy(String),

	Not(Box<Gate>),
	All(Vec<Gate>),
	Any(Vec<Gate>),
}

impl Gate {
	pub fn flag(flag: impl Into<String>) -> Self {
		Gate::Flag(flag.into())
	}

	pub fn env_equals(var: impl Into<String>, value: impl Into<String>) -> Self {
		Gate::EnvEquals {
			var: var.into(),
			value: value.into(),
		}
	}

	/// Evaluate against the context present right now.
	pub fn evaluate(&self, ctx: &RunContext) -> bool {
		match self {
			Gate::Always => true,
			Gate::Flag(flag) => ctx.has_flag(flag),
			Gate::EnvEquals { var, value } => ctx.var(var) == Some(value.as_str()),
			Gate::EnvNotEquals { var, value } => ctx.var(var) != Some(value.as_str()),
			Gate::EnvTruthy(var) => ctx.var(var).is_some_and(is_truthy),
			Gate::Not(inner) => !inner.evaluate(ctx),
			Gate::All(gates) => gates.iter().all(|g| g.evaluate(ctx)),
			Gate::Any(gates) => gates.iter().any(|g| g.evaluate(ctx)),
		}
	}
}

impl std::fmt::Display for Gate {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Gate::Always => write!(f, "always"),
			Gate::Flag(flag) => write!(f, "flag {}", flag),
			Gate::EnvEquals { var, value } => write!(f, "{}={}", var, value),
			Gate::EnvNotEquals { var, value } => write!(f, "{}!={}", var, value),
			Gate::EnvTruthy(var) => write!(f, "{} is truthy", var),
			Gate::Not(inner) => write!(f, "not ({})", inner),
			Gate::All(gates) => write_joined(f, gates, " and "),
			Gate::Any(gates) => write_joined(f, gates, " or "),
		}
	}
}

fn write_joined(f: &mut std::fmt::Formatter<'_>, gates: &[Gate], sep: &str) -> std::fmt::Result {
	write!(f, "(")?;
	for (i, gate) in gates.iter().enumerate() {
		if i > 0 {
			write!(f, "{}", sep)?;
		}
		write!(f, "{}", gate)?;
	}
	write!(f, ")")
}

/// Check if a value counts as truthy: non-empty and not `0`, `false` or `no`.
pub fn is_truthy(value: &str) -> bool {
	let lower = value.to_lowercase();
	!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
}
