use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, MergedConfig, StageWithSource};
use crate::context::{RunContext, is_truthy};
use crate::error::{Result, RewireError};
use std::path::{Path, PathBuf};

/// Name of the pipeline file looked up in each directory.
pub const CONFIG_FILE_NAME: &str = ".rewire.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.rewire.toml`
/// 2. If found and `root = true`, skip to user config only
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.rewire.toml (unless disabled)
///
/// The opt-out variable is looked up in `ctx`, not the process environment.
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path, ctx: &RunContext) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	// Walk up the directory tree
	loop {
		let config_path = current_dir.join(CONFIG_FILE_NAME);

		if config_path.exists() {
			let config = parse_config_file(&config_path)?;
			let is_root = config.root;

			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if is_root {
				break;
			}
		}

		// Move to parent directory
		if let Some(parent) = current_dir.parent() {
			current_dir = parent.to_path_buf();
		} else {
			break;
		}
	}

	// Check user config unless disabled by env var
	if let Some(user_config) = load_user_config(&configs, ctx)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load the user's ~/.rewire.toml if it exists and isn't disabled.
fn load_user_config(
	existing_configs: &[LoadedConfig],
	ctx: &RunContext,
) -> Result<Option<LoadedConfig>> {
	// Check if any config disables user config lookup via env var
	for loaded in existing_configs {
		if let Some(ref env_var) = loaded.config.root_config_lookup_disable_env_var
			&& is_env_truthy(ctx, env_var)
		{
			tracing::debug!(%env_var, "user config lookup disabled");
			return Ok(None);
		}
	}

	let user_config_path = user_config_path()?;

	// A project file found while walking up may already be the user file
	if existing_configs
		.iter()
		.any(|loaded| loaded.path == user_config_path)
	{
		return Ok(None);
	}

	if user_config_path.exists() {
		let config = parse_config_file(&user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(ctx: &RunContext, var_name: &str) -> bool {
	ctx.var(var_name).is_some_and(is_truthy)
}

/// Merge multiple configs into a single effective config.
///
/// `configs` is in cascade order (most specific first). Stages are collected
/// most general first, so the innermost project file's stages run last.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig::default();

	for loaded in configs.iter().rev() {
		let with_source = |stage: &crate::config::types::Stage| StageWithSource {
			stage: stage.clone(),
			source: loaded.path.clone(),
		};

		merged
			.stages
			.extend(loaded.config.stages.iter().map(with_source));
		merged
			.dev_server
			.extend(loaded.config.dev_server.iter().map(with_source));
	}

	merged
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path, ctx: &RunContext) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir, ctx)?;
	Ok(merge_configs(&configs))
}

/// Load a single explicit config file, without any cascade.
pub fn load_config_file(path: &Path) -> Result<MergedConfig> {
	if !path.exists() {
		return Err(RewireError::ConfigNotFound {
			path: path.to_path_buf(),
		});
	}

	let config = parse_config_file(path)?;
	Ok(merge_configs(&[LoadedConfig {
		config,
		path: path.to_path_buf(),
	}]))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(RewireError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
