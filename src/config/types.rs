use crate::context::Gate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Top-level configuration from a `.rewire.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop directory cascade and jump directly to ~/.rewire.toml.
	#[serde(default)]
	pub root: bool,

	/// Environment variable name that, if truthy, skips ~/.rewire.toml lookup.
	/// Useful for CI environments.
	#[serde(default)]
	pub root_config_lookup_disable_env_var: Option<String>,

	/// Stages applied to the build configuration, in order.
	#[serde(default)]
	pub stages: Vec<Stage>,

	/// Stages applied to the dev-server configuration, in order.
	#[serde(default)]
	pub dev_server: Vec<Stage>,
}

fn enabled_by_default() -> bool {
	true
}

/// One pipeline stage: a transform plus when it applies.
///
/// Written as a single table whose `transform` key selects the [`StageKind`].
/// Keys that neither the stage nor its transform knows are rejected, so a
/// misspelled `when` or `behind-flag` cannot silently drop a condition.
#[derive(Debug, Clone)]
pub struct Stage {
	pub kind: StageKind,

	/// A disabled stage is dropped when the pipeline is composed.
	pub enabled: bool,

	/// Evaluated each time the pipeline runs.
	pub when: Gate,
}

/// Keys every stage accepts besides its transform's own options.
const STAGE_KEYS: [&str; 3] = ["transform", "enabled", "when"];

impl<'de> Deserialize<'de> for Stage {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let mut table = toml::Table::deserialize(deserializer)?;

		let enabled = match table.remove("enabled") {
			Some(value) => value.try_into::<bool>().map_err(D::Error::custom)?,
			None => enabled_by_default(),
		};
		let when = match table.remove("when") {
			Some(value) => value.try_into::<Gate>().map_err(D::Error::custom)?,
			None => Gate::default(),
		};

		let keys: Vec<String> = table.keys().cloned().collect();
		let kind = toml::Value::Table(table)
			.try_into::<StageKind>()
			.map_err(D::Error::custom)?;

		let allowed = |key: &str| STAGE_KEYS.contains(&key) || kind.option_keys().contains(&key);
		if let Some(unknown) = keys.iter().find(|key| !allowed(key.as_str())) {
			return Err(D::Error::custom(format!(
				"unknown key `{}` in {} stage (expected one of: {})",
				unknown,
				kind.key(),
				STAGE_KEYS
					.iter()
					.chain(kind.option_keys())
					.copied()
					.collect::<Vec<_>>()
					.join(", ")
			)));
		}

		Ok(Stage {
			kind,
			enabled,
			when,
		})
	}
}

/// The built-in transforms, selected by the `transform` key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(
	tag = "transform",
	rename_all = "kebab-case",
	rename_all_fields = "kebab-case"
)]
pub enum StageKind {
	AddBabelPlugin {
		plugin: Value,
	},
	AddBabelPlugins {
		plugins: Vec<Value>,
	},
	AddBabelPreset {
		preset: Value,
	},
	AddBabelPresets {
		presets: Vec<Value>,
	},
	AddDecoratorsLegacy,
	FixBabelImports {
		library_name: String,
		#[serde(default)]
		options: Map<String, Value>,
	},
	UseBabelRc,
	BabelInclude {
		include: Value,
	},
	DisableEslint,
	UseEslintRc,
	EnableEslintTypescript,
	AddWebpackAlias {
		alias: Map<String, Value>,
	},
	AddBundleVisualizer {
		#[serde(default)]
		options: Map<String, Value>,
		#[serde(default)]
		behind_flag: bool,
	},
	AddLessLoader {
		#[serde(default)]
		options: Map<String, Value>,
		#[serde(default)]
		public_path: Option<String>,
	},
	DisableChunk,
	/// Merge `options` into the `GenerateSW` plugin's options.
	AdjustWorkbox {
		options: Map<String, Value>,
	},
	WatchAll,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from multiple config files in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// Build stages, most general file first.
	pub stages: Vec<StageWithSource>,

	/// Dev-server stages, most general file first.
	pub dev_server: Vec<StageWithSource>,
}

/// A stage with its source config path for debugging/display.
#[derive(Debug, Clone)]
pub struct StageWithSource {
	/// The stage itself.
	pub stage: Stage,

	/// The config file this stage came from.
	pub source: PathBuf,
}

impl StageKind {
	/// The `transform` key this kind is written with.
	pub fn key(&self) -> &'static str {
		match self {
			StageKind::AddBabelPlugin { .. } => "add-babel-plugin",
			StageKind::AddBabelPlugins { .. } => "add-babel-plugins",
			StageKind::AddBabelPreset { .. } => "add-babel-preset",
			StageKind::AddBabelPresets { .. } => "add-babel-presets",
			StageKind::AddDecoratorsLegacy => "add-decorators-legacy",
			StageKind::FixBabelImports { .. } => "fix-babel-imports",
			StageKind::UseBabelRc => "use-babel-rc",
			StageKind::BabelInclude { .. } => "babel-include",
			StageKind::DisableEslint => "disable-eslint",
			StageKind::UseEslintRc => "use-eslint-rc",
			StageKind::EnableEslintTypescript => "enable-eslint-typescript",
			StageKind::AddWebpackAlias { .. } => "add-webpack-alias",
			StageKind::AddBundleVisualizer { .. } => "add-bundle-visualizer",
			StageKind::AddLessLoader { .. } => "add-less-loader",
			StageKind::DisableChunk => "disable-chunk",
			StageKind::AdjustWorkbox { .. } => "adjust-workbox",
			StageKind::WatchAll => "watch-all",
		}
	}
}

impl StageKind {
	/// The option keys this kind reads from its stage table.
	pub fn option_keys(&self) -> &'static [&'static str] {
		match self {
			StageKind::AddBabelPlugin { .. } => &["plugin"],
			StageKind::AddBabelPlugins { .. } => &["plugins"],
			StageKind::AddBabelPreset { .. } => &["preset"],
			StageKind::AddBabelPresets { .. } => &["presets"],
			StageKind::FixBabelImports { .. } => &["library-name", "options"],
			StageKind::BabelInclude { .. } => &["include"],
			StageKind::AddWebpackAlias { .. } => &["alias"],
			StageKind::AddBundleVisualizer { .. } => &["options", "behind-flag"],
			StageKind::AddLessLoader { .. } => &["options", "public-path"],
			StageKind::AdjustWorkbox { .. } => &["options"],
			StageKind::AddDecoratorsLegacy
			| StageKind::UseBabelRc
			| StageKind::DisableEslint
			| StageKind::UseEslintRc
			| StageKind::EnableEslintTypescript
			| StageKind::DisableChunk
			| StageKind::WatchAll => &[],
		}
	}
}

impl Stage {
	/// Reject stages whose settings cannot produce a meaningful transform.
	pub fn validate(&self) -> Result<(), String> {
		match self.kind {
			StageKind::FixBabelImports {
				ref library_name, ..
			} if library_name.trim().is_empty() => Err("library-name must not be empty".to_string()),
			StageKind::AddBabelPlugins { ref plugins } if plugins.is_empty() => {
				Err("plugins must not be empty".to_string())
			}
			StageKind::AddBabelPresets { ref presets } if presets.is_empty() => {
				Err("presets must not be empty".to_string())
			}
			StageKind::AddWebpackAlias { ref alias } if alias.is_empty() => {
				Err("alias must not be empty".to_string())
			}
			_ => Ok(()),
		}
	}
}

impl Config {
	/// Validate all stages in this config.
	pub fn validate(&self) -> Result<(), crate::error::RewireError> {
		let sections = [("stages", &self.stages), ("dev-server", &self.dev_server)];
		for (section, stages) in sections {
			for (index, stage) in stages.iter().enumerate() {
				stage
					.validate()
					.map_err(|reason| crate::error::RewireError::InvalidStage {
						section: section.to_string(),
						index,
						transform: stage.kind.key().to_string(),
						reason,
					})?;
			}
		}
		Ok(())
	}
}
