//! Pipeline files for rewire.
//!
//! This module handles:
//! - TOML pipeline file parsing
//! - Directory cascade discovery
//! - Config merging
//! - Turning stages into a composed transform

pub mod build;
pub mod cascade;
pub mod parser;
pub mod template;
pub mod types;

pub use build::build_pipeline;
pub use cascade::{
	CONFIG_FILE_NAME, discover_configs, load_config_file, load_merged_config, merge_configs,
	user_config_path,
};
pub use parser::{parse_config_file, parse_config_str};
pub use template::init_template;
pub use types::{Config, LoadedConfig, MergedConfig, Stage, StageKind, StageWithSource};
