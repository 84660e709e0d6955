//! Dev-server document transforms and the file-backed dev-server factory.

use crate::context::Gate;
use crate::document::{Document, read_document};
use crate::error::{Result, RewireError};
use crate::pipeline::Transform;
use serde_json::Value;
use std::path::PathBuf;

/// Flag that makes the dev server watch every folder, `node_modules` included.
pub const WATCH_ALL_FLAG: &str = "--watch-all";

/// Drop `watchOptions` when the run arguments contain `--watch-all`.
///
/// Useful with linked packages, whose changes would otherwise be ignored.
pub fn watch_all() -> Transform {
	Transform::mutate("watch-all", |doc| {
		if let Some(map) = doc.as_object_mut() {
			map.remove("watchOptions");
		}
		Ok(())
	})
	.gated(Gate::flag(WATCH_ALL_FLAG))
}

/// A dev-server factory with the host's `(proxy, allowed_host)` call shape.
///
/// Each call reads the base document from `path` and fills in `proxy` (when
/// given) and `allowedHost`.
pub fn file_factory(path: PathBuf) -> impl Fn(Option<Value>, String) -> Result<Document> {
	move |proxy, allowed_host| {
		let mut doc = read_document(&path)?;
		let map = doc
			.as_object_mut()
			.ok_or_else(|| RewireError::shape("", "an object"))?;

		if let Some(proxy) = proxy {
			map.insert("proxy".to_string(), proxy);
		}
		map.insert("allowedHost".to_string(), Value::String(allowed_host));
		Ok(doc)
	}
}
