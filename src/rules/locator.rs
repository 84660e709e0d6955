use crate::document::node_mut;
use crate::error::{Result, RewireError};
use crate::rules::matcher::{LoaderMatcher, uses_loader_option};
use serde_json::Value;

/// JSON pointer to the top-level rule sequence.
pub const RULES_POINTER: &str = "/module/rules";

/// Which rule layout a located entry was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleShape {
	/// Entry of the `oneOf` sequence of a top-level rule.
	OneOf,

	/// Entry of a `use` sequence, found by flattening the `use` sequences of
	/// sibling rules.
	Use,
}

/// A located entry: the layout it was found in and a JSON pointer to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
	pub shape: RuleShape,
	pub pointer: String,
}

/// Borrow the top-level rule sequence.
pub fn top_level_rules(doc: &Value) -> Result<&Vec<Value>> {
	doc.pointer(RULES_POINTER)
		.and_then(Value::as_array)
		.ok_or_else(|| RewireError::shape(RULES_POINTER, "an array of rules"))
}

fn oneof_rule_index(rules: &[Value]) -> Option<usize> {
	rules
		.iter()
		.position(|rule| rule.get("oneOf").is_some_and(Value::is_array))
}

/// Find the first loader entry accepted by `matcher`.
///
/// The `oneOf` layout is searched first. If it has no match, the `use`
/// sequences of the candidate rules are searched in order, where the candidates
/// are the `oneOf` entries when a `oneOf` rule exists and the top-level rules
/// otherwise. The first match of the first layout wins.
pub fn locate(doc: &Value, matcher: &LoaderMatcher) -> Result<Location> {
	let rules = top_level_rules(doc)?;
	let oneof_index = oneof_rule_index(rules);

	let (base, candidates) = match oneof_index {
		Some(index) => {
			let base = format!("{}/{}/oneOf", RULES_POINTER, index);
			let entries = rules[index]
				.get("oneOf")
				.and_then(Value::as_array)
				.ok_or_else(|| RewireError::shape(&base, "an array"))?;

			if let Some(entry) = entries.iter().position(|e| matcher.matches(e)) {
				return Ok(found(RuleShape::OneOf, format!("{}/{}", base, entry)));
			}
			(base, entries)
		}
		None => (RULES_POINTER.to_string(), rules),
	};

	for (index, candidate) in candidates.iter().enumerate() {
		let Some(uses) = candidate.get("use").and_then(Value::as_array) else {
			continue;
		};
		if let Some(entry) = uses.iter().position(|u| matcher.matches(u)) {
			return Ok(found(
				RuleShape::Use,
				format!("{}/{}/use/{}", base, index, entry),
			));
		}
	}

	Err(RewireError::LocationNotFound {
		target: matcher.to_string(),
	})
}

fn found(shape: RuleShape, pointer: String) -> Location {
	tracing::debug!(?shape, %pointer, "located loader");
	Location { shape, pointer }
}

/// Find the first loader entry accepted by `matcher` and borrow it mutably.
pub fn locate_mut<'a>(doc: &'a mut Value, matcher: &LoaderMatcher) -> Result<&'a mut Value> {
	let location = locate(doc, matcher)?;
	node_mut(doc, &location.pointer)
}

/// Borrow the `oneOf` sequence of the first top-level rule that has one.
pub fn oneof_rules_mut(doc: &mut Value) -> Result<&mut Vec<Value>> {
	let index = oneof_rule_index(top_level_rules(doc)?).ok_or_else(|| {
		RewireError::LocationNotFound {
			target: "a rule with a oneOf sequence".to_string(),
		}
	})?;

	let pointer = format!("{}/{}/oneOf", RULES_POINTER, index);
	node_mut(doc, &pointer)?
		.as_array_mut()
		.ok_or_else(|| RewireError::shape(pointer, "an array"))
}

/// Indices of top-level rules whose `use` entries define `options.<key>`.
pub fn rules_with_loader_option(doc: &Value, key: &str) -> Result<Vec<usize>> {
	Ok(top_level_rules(doc)?
		.iter()
		.enumerate()
		.filter(|(_, rule)| uses_loader_option(rule, key))
		.map(|(index, _)| index)
		.collect())
}
