//! Built-in transforms.
//!
//! Each one is a small, independent mutation on top of the locator and the
//! pipeline. None of them validates the document beyond the shape it touches.

pub mod babel;
pub mod dev_server;
pub mod eslint;
pub mod less;
pub mod webpack;

pub use babel::{
	add_babel_plugin, add_babel_plugins, add_babel_preset, add_babel_presets,
	add_decorators_legacy, babel_include, fix_babel_imports, use_babel_rc,
};
pub use dev_server::{WATCH_ALL_FLAG, file_factory, watch_all};
pub use eslint::{disable_eslint, enable_eslint_typescript, use_eslint_rc};
pub use less::{LessLoaderOptions, add_less_loader};
pub use webpack::{
	ANALYZE_FLAG, add_bundle_visualizer, add_webpack_alias, adjust_workbox, disable_chunk,
	find_plugin, plugin_entry,
};
