//! Babel loader transforms.
//!
//! All of these locate the babel loader with [`LoaderMatcher::babel`] and fail
//! with `LocationNotFound` when the document has none.

use crate::document::{Document, array_mut, node_mut};
use crate::error::{Result, RewireError};
use crate::pipeline::Transform;
use crate::rules::{LoaderMatcher, locate};
use serde_json::{Map, Value, json};

fn babel_loader(doc: &mut Document) -> Result<(String, &mut Value)> {
	let location = locate(doc, &LoaderMatcher::babel()?)?;
	let loader = node_mut(doc, &location.pointer)?;
	Ok((location.pointer, loader))
}

fn babel_options(doc: &mut Document) -> Result<(String, &mut Value)> {
	let (pointer, loader) = babel_loader(doc)?;
	let pointer = format!("{}/options", pointer);
	let options = loader
		.get_mut("options")
		.ok_or_else(|| RewireError::shape(&pointer, "an object"))?;
	Ok((pointer, options))
}

fn push_option(doc: &mut Document, key: &str, entry: Value) -> Result<()> {
	let (pointer, options) = babel_options(doc)?;
	array_mut(options, key, &pointer)?.push(entry);
	Ok(())
}

/// Append a plugin to the babel loader's `options.plugins`.
pub fn add_babel_plugin(plugin: Value) -> Transform {
	Transform::mutate("add-babel-plugin", move |doc| {
		push_option(doc, "plugins", plugin.clone())
	})
}

/// One [`add_babel_plugin`] per plugin, in order.
pub fn add_babel_plugins(plugins: Vec<Value>) -> Vec<Transform> {
	plugins.into_iter().map(add_babel_plugin).collect()
}

/// Append a preset to the babel loader's `options.presets`.
pub fn add_babel_preset(preset: Value) -> Transform {
	Transform::mutate("add-babel-preset", move |doc| {
		push_option(doc, "presets", preset.clone())
	})
}

pub fn add_babel_presets(presets: Vec<Value>) -> Vec<Transform> {
	presets.into_iter().map(add_babel_preset).collect()
}

/// Enable legacy decorators.
pub fn add_decorators_legacy() -> Transform {
	add_babel_plugin(json!([
		"@babel/plugin-proposal-decorators",
		{"legacy": true}
	]))
}

/// Add a `babel-plugin-import` entry for `library_name`.
///
/// `options` are merged over `{ "libraryName": library_name }`. The third
/// element names the plugin instance so several libraries can be fixed.
pub fn fix_babel_imports(library_name: &str, options: Map<String, Value>) -> Transform {
	let mut import_options = Map::new();
	import_options.insert("libraryName".to_string(), json!(library_name));
	import_options.extend(options);

	add_babel_plugin(json!([
		"import",
		Value::Object(import_options),
		format!("fix-{}-imports", library_name)
	]))
}

/// Let babel read the project's `.babelrc`.
pub fn use_babel_rc() -> Transform {
	Transform::mutate("use-babel-rc", |doc| {
		let (pointer, options) = babel_options(doc)?;
		options
			.as_object_mut()
			.ok_or_else(|| RewireError::shape(pointer, "an object"))?
			.insert("babelrc".to_string(), Value::Bool(true));
		Ok(())
	})
}

/// Replace the babel loader's `include`.
pub fn babel_include(include: Value) -> Transform {
	Transform::mutate("babel-include", move |doc| {
		let (pointer, loader) = babel_loader(doc)?;
		loader
			.as_object_mut()
			.ok_or_else(|| RewireError::shape(pointer, "an object"))?
			.insert("include".to_string(), include.clone());
		Ok(())
	})
}
