//! Locating rules and loaders inside a configuration document.
//!
//! This module handles:
//! - Matching loader entries by name and options shape
//! - Searching both the `oneOf` and the flattened `use` rule layouts
//! - Inserting entries ahead of a sequence's catch-all fallback

pub mod insert;
pub mod locator;
pub mod matcher;

pub use insert::insert_before_last;
pub use locator::{
	Location, RULES_POINTER, RuleShape, locate, locate_mut, oneof_rules_mut,
	rules_with_loader_option, top_level_rules,
};
pub use matcher::{LoaderMatcher, compile_regex, uses_loader_option};
