//! Transforms over top-level build settings: aliases, chunking and plugins.
//!
//! Plugin entries are tagged maps, `{ "name": "<Plugin>", "options": {..} }`,
//! and are identified by their `name` field.

use crate::context::Gate;
use crate::document::{Document, array_mut, ensure_object, object_mut};
use crate::error::{Result, RewireError};
use crate::pipeline::Transform;
use serde_json::{Map, Value, json};

/// Key identifying a plugin entry.
pub const PLUGIN_NAME_KEY: &str = "name";

/// Key holding a plugin entry's options.
pub const PLUGIN_OPTIONS_KEY: &str = "options";

/// Flag that enables a visualizer added behind a flag.
pub const ANALYZE_FLAG: &str = "--analyze";

pub const BUNDLE_ANALYZER_PLUGIN: &str = "BundleAnalyzerPlugin";
pub const WORKBOX_PLUGIN: &str = "GenerateSW";

/// Build a tagged plugin entry.
pub fn plugin_entry(name: &str, options: Map<String, Value>) -> Value {
	json!({
		PLUGIN_NAME_KEY: name,
		PLUGIN_OPTIONS_KEY: Value::Object(options),
	})
}

fn plugins_mut(doc: &mut Document) -> Result<&mut Vec<Value>> {
	array_mut(doc, "plugins", "")
}

/// Merge `alias` into `resolve.alias`, creating both maps when missing.
pub fn add_webpack_alias(alias: Map<String, Value>) -> Transform {
	Transform::mutate("add-webpack-alias", move |doc| {
		ensure_object(doc, "resolve", "")?
			.entry("alias".to_string())
			.or_insert_with(|| Value::Object(Map::new()))
			.as_object_mut()
			.ok_or_else(|| RewireError::shape("/resolve/alias", "an object"))?
			.extend(alias.clone());
		Ok(())
	})
}

/// Turn off chunk splitting and the runtime chunk.
pub fn disable_chunk() -> Transform {
	Transform::mutate("disable-chunk", |doc| {
		let optimization = object_mut(doc, "optimization", "")?;
		optimization.insert(
			"splitChunks".to_string(),
			json!({"cacheGroups": {"default": false}}),
		);
		optimization.insert("runtimeChunk".to_string(), Value::Bool(false));
		Ok(())
	})
}

/// Apply `adjust` to the options of every `GenerateSW` plugin entry.
pub fn adjust_workbox<F>(adjust: F) -> Transform
where
	F: Fn(&mut Map<String, Value>) + Send + Sync + 'static,
{
	Transform::mutate("adjust-workbox", move |doc| {
		for (index, plugin) in plugins_mut(doc)?.iter_mut().enumerate() {
			if plugin.get(PLUGIN_NAME_KEY).and_then(Value::as_str) != Some(WORKBOX_PLUGIN) {
				continue;
			}
			let pointer = format!("/plugins/{}", index);
			adjust(ensure_object(plugin, PLUGIN_OPTIONS_KEY, &pointer)?);
		}
		Ok(())
	})
}

/// Add a static bundle report.
///
/// `options` are merged over `analyzerMode = "static"` and
/// `reportFilename = "report.html"`. With `behind_flag`, the plugin is only
/// added when the run arguments contain `--analyze`.
pub fn add_bundle_visualizer(options: Map<String, Value>, behind_flag: bool) -> Transform {
	let mut merged = Map::new();
	merged.insert("analyzerMode".to_string(), json!("static"));
	merged.insert("reportFilename".to_string(), json!("report.html"));
	merged.extend(options);

	let entry = plugin_entry(BUNDLE_ANALYZER_PLUGIN, merged);
	let transform = Transform::mutate("add-bundle-visualizer", move |doc| {
		plugins_mut(doc)?.push(entry.clone());
		Ok(())
	});

	if behind_flag {
		transform.gated(Gate::flag(ANALYZE_FLAG))
	} else {
		transform
	}
}

/// Find a plugin entry by name.
pub fn find_plugin<'a>(doc: &'a Document, name: &str) -> Result<&'a Value> {
	doc.get("plugins")
		.and_then(Value::as_array)
		.ok_or_else(|| RewireError::shape("/plugins", "an array"))?
		.iter()
		.find(|p| p.get(PLUGIN_NAME_KEY).and_then(Value::as_str) == Some(name))
		.ok_or_else(|| RewireError::LocationNotFound {
			target: format!("plugin {}", name),
		})
}
