//! LESS stylesheet support.

use crate::context::{Mode, RunContext};
use crate::document::Document;
use crate::pipeline::Transform;
use crate::rules::{insert_before_last, oneof_rules_mut};
use serde_json::{Map, Value, json};

pub const LESS_TEST_PATTERN: &str = r"\.less$";

/// Options for [`add_less_loader`].
#[derive(Debug, Clone, Default)]
pub struct LessLoaderOptions {
	/// Options passed to `less-loader`, e.g. `javascriptEnabled` or `modifyVars`.
	pub loader_options: Map<String, Value>,

	/// Public path the app is served from. `./` makes extracted CSS refer to
	/// assets relatively.
	pub public_path: Option<String>,
}

fn style_loader(mode: Mode, relative_assets: bool) -> Value {
	match mode {
		Mode::Development => json!("style-loader"),
		Mode::Production => {
			let mut options = Map::new();
			if relative_assets {
				options.insert("publicPath".to_string(), json!("../../"));
			}
			json!({"loader": "mini-css-extract-plugin/dist/loader.js", "options": options})
		}
	}
}

/// Build the `.less` rule for the given context.
pub fn less_rule(options: &LessLoaderOptions, ctx: &RunContext) -> Value {
	let mode = ctx.mode();
	let source_map = ctx.should_use_source_map();
	let relative_assets = options.public_path.as_deref() == Some("./");

	let mut less_options = options.loader_options.clone();
	less_options.insert("sourceMap".to_string(), Value::Bool(source_map));

	json!({
		"test": LESS_TEST_PATTERN,
		"use": [
			style_loader(mode, relative_assets),
			{"loader": "css-loader", "options": {"importLoaders": 2}},
			{
				"loader": "postcss-loader",
				"options": {
					"ident": "postcss",
					"plugins": [
						"postcss-flexbugs-fixes",
						["postcss-preset-env", {"autoprefixer": {"flexbox": "no-2009"}, "stage": 3}]
					],
					"sourceMap": source_map
				}
			},
			{"loader": "less-loader", "options": less_options}
		],
		"sideEffects": mode == Mode::Production
	})
}

/// Handle `.less` imports.
///
/// The rule goes into the `oneOf` sequence just before its last entry, the
/// catch-all file loader, so `.less` files never reach the fallback. Mode and
/// source maps follow `NODE_ENV` and `GENERATE_SOURCEMAP` at apply time.
pub fn add_less_loader(options: LessLoaderOptions) -> Transform {
	Transform::new("add-less-loader", move |mut doc: Document, ctx| {
		let rule = less_rule(&options, ctx);
		let index = insert_before_last(oneof_rules_mut(&mut doc)?, rule);
		tracing::debug!(index, "inserted less rule");
		Ok(doc)
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::RewireError;

	fn document() -> Document {
		json!({
			"module": {"rules": [
				{"parser": {"requireEnsure": false}},
				{"oneOf": [
					{"loader": "url-loader", "options": {}},
					{"test": "\\.css$", "use": ["style-loader", "css-loader"]},
					{"loader": "file-loader", "exclude": ["\\.js$", "\\.html$", "\\.json$"]}
				]}
			]}
		})
	}

	fn oneof(doc: &Document) -> &Vec<Value> {
		doc["module"]["rules"][1]["oneOf"].as_array().unwrap()
	}

	#[test]
	fn test_less_rule_inserted_before_fallback() {
		let before = document();
		let count = oneof(&before).len();

		let after = add_less_loader(LessLoaderOptions::default())
			.apply(before.clone(), &RunContext::new())
			.unwrap();
		let loaders = oneof(&after);

		assert_eq!(loaders.len(), count + 1);
		assert_eq!(loaders[count - 1]["test"], LESS_TEST_PATTERN);
		assert_eq!(loaders[count], oneof(&before)[count - 1]);
	}

	#[test]
	fn test_development_mode_uses_style_loader() {
		let ctx = RunContext::new().with_env("NODE_ENV", "development");
		let rule = less_rule(&LessLoaderOptions::default(), &ctx);

		assert_eq!(rule["use"][0], "style-loader");
		assert_eq!(rule["sideEffects"], false);
		assert_eq!(rule["use"][3]["options"]["sourceMap"], false);
	}

	#[test]
	fn test_production_mode_extracts_css() {
		let options = LessLoaderOptions {
			public_path: Some("./".to_string()),
			..Default::default()
		};
		let rule = less_rule(&options, &RunContext::new());

		assert_eq!(
			rule["use"][0]["loader"],
			"mini-css-extract-plugin/dist/loader.js"
		);
		assert_eq!(rule["use"][0]["options"]["publicPath"], "../../");
		assert_eq!(rule["sideEffects"], true);
		assert_eq!(rule["use"][2]["options"]["sourceMap"], true);
	}

	#[test]
	fn test_sourcemap_disabled_by_env() {
		let ctx = RunContext::new().with_env("GENERATE_SOURCEMAP", "false");
		let rule = less_rule(&LessLoaderOptions::default(), &ctx);
		assert_eq!(rule["use"][2]["options"]["sourceMap"], false);
		assert_eq!(rule["use"][3]["options"]["sourceMap"], false);
	}

	#[test]
	fn test_loader_options_are_kept() {
		let mut loader_options = Map::new();
		loader_options.insert("javascriptEnabled".to_string(), json!(true));
		let options = LessLoaderOptions {
			loader_options,
			public_path: None,
		};

		let rule = less_rule(&options, &RunContext::new());
		assert_eq!(
			rule["use"][3]["options"],
			json!({"javascriptEnabled": true, "sourceMap": true})
		);
	}

	#[test]
	fn test_mode_is_read_at_apply_time() {
		let transform = add_less_loader(LessLoaderOptions::default());

		let dev = transform
			.apply(document(), &RunContext::new().with_env("NODE_ENV", "development"))
			.unwrap();
		let prod = transform.apply(document(), &RunContext::new()).unwrap();

		assert_eq!(oneof(&dev)[2]["use"][0], "style-loader");
		assert!(oneof(&prod)[2]["use"][0].is_object());
	}

	#[test]
	fn test_requires_oneof_rule() {
		let doc = json!({"module": {"rules": [{"test": "\\.js$"}]}});
		let err = add_less_loader(LessLoaderOptions::default())
			.apply(doc, &RunContext::new())
			.unwrap_err();
		assert!(matches!(err, RewireError::LocationNotFound { .. }));
	}
}
