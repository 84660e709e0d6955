use crate::config::types::{MergedConfig, Stage, StageKind, StageWithSource};
use crate::pipeline::{Transform, compose, stages};
use crate::transforms::{self, LessLoaderOptions};

impl StageKind {
	/// Build the transform this stage describes.
	pub fn to_transform(&self) -> Transform {
		match self {
			StageKind::AddBabelPlugin { plugin } => transforms::add_babel_plugin(plugin.clone()),
			StageKind::AddBabelPlugins { plugins } => {
				compose(stages(transforms::add_babel_plugins(plugins.clone())))
			}
			StageKind::AddBabelPreset { preset } => transforms::add_babel_preset(preset.clone()),
			StageKind::AddBabelPresets { presets } => {
				compose(stages(transforms::add_babel_presets(presets.clone())))
			}
			StageKind::AddDecoratorsLegacy => transforms::add_decorators_legacy(),
			StageKind::FixBabelImports {
				library_name,
				options,
			} => transforms::fix_babel_imports(library_name, options.clone()),
			StageKind::UseBabelRc => transforms::use_babel_rc(),
			StageKind::BabelInclude { include } => transforms::babel_include(include.clone()),
			StageKind::DisableEslint => transforms::disable_eslint(),
			StageKind::UseEslintRc => transforms::use_eslint_rc(),
			StageKind::EnableEslintTypescript => transforms::enable_eslint_typescript(),
			StageKind::AddWebpackAlias { alias } => transforms::add_webpack_alias(alias.clone()),
			StageKind::AddBundleVisualizer {
				options,
				behind_flag,
			} => transforms::add_bundle_visualizer(options.clone(), *behind_flag),
			StageKind::AddLessLoader {
				options,
				public_path,
			} => transforms::add_less_loader(LessLoaderOptions {
				loader_options: options.clone(),
				public_path: public_path.clone(),
			}),
			StageKind::DisableChunk => transforms::disable_chunk(),
			StageKind::AdjustWorkbox { options } => {
				let options = options.clone();
				transforms::adjust_workbox(move |workbox| workbox.extend(options.clone()))
			}
			StageKind::WatchAll => transforms::watch_all(),
		}
	}
}

impl Stage {
	/// The gated transform, or `None` for a disabled stage.
	pub fn to_transform(&self) -> Option<Transform> {
		if !self.enabled {
			return None;
		}
		Some(self.kind.to_transform().gated(self.when.clone()))
	}
}

/// Compose stages into a single transform, dropping disabled ones.
pub fn build_pipeline(stages: &[StageWithSource]) -> Transform {
	compose(stages.iter().map(|s| s.stage.to_transform()))
}

impl MergedConfig {
	/// The pipeline for the build configuration.
	pub fn build_pipeline(&self) -> Transform {
		build_pipeline(&self.stages)
	}

	/// The pipeline for the dev-server configuration.
	pub fn dev_server_pipeline(&self) -> Transform {
		build_pipeline(&self.dev_server)
	}
}
