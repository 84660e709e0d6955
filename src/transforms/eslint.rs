//! Lint rule transforms.
//!
//! The lint rule is the top-level rule whose `use` entries carry a
//! `useEslintrc` option.

use crate::document::{Document, node_mut, object_mut};
use crate::error::{Result, RewireError};
use crate::pipeline::Transform;
use crate::rules::{RULES_POINTER, rules_with_loader_option};
use serde_json::Value;

const ESLINT_OPTION: &str = "useEslintrc";

/// Test pattern covering JavaScript and TypeScript sources.
pub const SCRIPT_TEST_PATTERN: &str = r"\.([j,t]sx?|mjs)$";

fn rules_mut(doc: &mut Document) -> Result<&mut Vec<Value>> {
	node_mut(doc, RULES_POINTER)?
		.as_array_mut()
		.ok_or_else(|| RewireError::shape(RULES_POINTER, "an array of rules"))
}

/// Edit the first lint rule, then make every lint rule a copy of it.
fn rewrite_lint_rules<F>(doc: &mut Document, edit: F) -> Result<()>
where
	F: Fn(&mut Value, &str) -> Result<()>,
{
	let indices = rules_with_loader_option(doc, ESLINT_OPTION)?;
	let Some(&first) = indices.first() else {
		return Err(RewireError::LocationNotFound {
			target: format!("a rule using the {} option", ESLINT_OPTION),
		});
	};

	let rules = rules_mut(doc)?;
	let mut rule = rules[first].clone();
	edit(&mut rule, &format!("{}/{}", RULES_POINTER, first))?;

	for index in indices {
		rules[index] = rule.clone();
	}
	Ok(())
}

/// Remove every lint rule. A document without one is left unchanged.
pub fn disable_eslint() -> Transform {
	Transform::mutate("disable-eslint", |doc| {
		let indices = rules_with_loader_option(doc, ESLINT_OPTION)?;
		let rules = rules_mut(doc)?;
		for index in indices.into_iter().rev() {
			rules.remove(index);
		}
		Ok(())
	})
}

/// Let eslint read the project's own configuration instead of the bundled one.
pub fn use_eslint_rc() -> Transform {
	Transform::mutate("use-eslint-rc", |doc| {
		rewrite_lint_rules(doc, |rule, pointer| {
			let pointer = format!("{}/use/0", pointer);
			let loader = rule
				.get_mut("use")
				.and_then(|uses| uses.get_mut(0))
				.ok_or_else(|| RewireError::shape(&pointer, "a loader entry"))?;

			let options = object_mut(loader, "options", &pointer)?;
			options.insert(ESLINT_OPTION.to_string(), Value::Bool(true));
			options.insert("ignore".to_string(), Value::Bool(true));
			options.remove("baseConfig");
			Ok(())
		})
	})
}

/// Run the lint rule over TypeScript sources too.
pub fn enable_eslint_typescript() -> Transform {
	Transform::mutate("enable-eslint-typescript", |doc| {
		rewrite_lint_rules(doc, |rule, pointer| {
			rule.as_object_mut()
				.ok_or_else(|| RewireError::shape(pointer, "an object"))?
				.insert("test".to_string(), Value::String(SCRIPT_TEST_PATTERN.to_string()));
			Ok(())
		})
	})
}
