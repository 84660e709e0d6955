use crate::error::{Result, RewireError};
use regex::Regex;
use serde_json::Value;

/// Predicate identifying a loader entry inside a rule sequence.
///
/// An entry matches when its `loader` string matches the name pattern, it has
/// an `options` object, and (if configured) that object carries `options_key`.
#[derive(Debug, Clone)]
pub struct LoaderMatcher {
	/// Compiled loader-name pattern.
	pub name: Regex,

	/// Key the entry's `options` must contain.
	pub options_key: Option<String>,
}

impl LoaderMatcher {
	/// Match loader names against a regex pattern.
	pub fn new(pattern: &str) -> Result<Self> {
		Ok(LoaderMatcher {
			name: compile_regex(pattern)?,
			options_key: None,
		})
	}

	/// Match loader names containing `fragment` literally.
	pub fn containing(fragment: &str) -> Result<Self> {
		Self::new(&regex::escape(fragment))
	}

	/// The babel loader: a `babel` loader whose options carry a `plugins` list.
	pub fn babel() -> Result<Self> {
		Ok(Self::containing("babel")?.with_options_key("plugins"))
	}

	pub fn with_options_key(mut self, key: impl Into<String>) -> Self {
		self.options_key = Some(key.into());
		self
	}

	/// Check if this matcher accepts the given entry.
	pub fn matches(&self, entry: &Value) -> bool {
		let Some(loader) = entry.get("loader").and_then(Value::as_str) else {
			return false;
		};
		if !self.name.is_match(loader) {
			return false;
		}

		let Some(options) = entry.get("options").and_then(Value::as_object) else {
			return false;
		};

		match self.options_key {
			Some(ref key) => options.get(key).is_some_and(|v| !v.is_null()),
			None => true,
		}
	}
}

impl std::fmt::Display for LoaderMatcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "loader /{}/", self.name)?;
		if let Some(ref key) = self.options_key {
			write!(f, " with options.{}", key)?;
		}
		Ok(())
	}
}

/// Check if a rule's `use` sequence has an entry whose options define `key`.
pub fn uses_loader_option(rule: &Value, key: &str) -> bool {
	rule.get("use")
		.and_then(Value::as_array)
		.is_some_and(|uses| {
			uses.iter().any(|entry| {
				entry
					.get("options")
					.and_then(Value::as_object)
					.is_some_and(|options| options.contains_key(key))
			})
		})
}

/// Compile a regex pattern string.
pub fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| RewireError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}
