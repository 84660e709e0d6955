//! The configuration document and shape-checked accessors into it.
//!
//! A document is an untyped `serde_json::Value` tree. Nothing here validates a
//! schema; the accessors only turn a missing or mistyped node into a
//! [`RewireError::ShapeMismatch`] that names the JSON pointer involved.

use crate::error::{Result, RewireError};
use serde_json::{Map, Value};
use std::path::Path;

/// The configuration tree threaded through a pipeline.
pub type Document = Value;

/// Read and parse a JSON document from disk.
pub fn read_document(path: &Path) -> Result<Document> {
	let content = std::fs::read_to_string(path).map_err(|source| RewireError::DocumentReadError {
		path: path.to_path_buf(),
		source,
	})?;

	serde_json::from_str(&content).map_err(|source| RewireError::DocumentParseError {
		path: path.to_path_buf(),
		source,
	})
}

/// Resolve a JSON pointer to a mutable node.
pub fn node_mut<'a>(doc: &'a mut Value, pointer: &str) -> Result<&'a mut Value> {
	doc.pointer_mut(pointer)
		.ok_or_else(|| RewireError::shape(pointer, "an existing node"))
}

/// Borrow `value[key]` as a mutable object.
pub fn object_mut<'a>(
	value: &'a mut Value,
	key: &str,
	pointer: &str,
) -> Result<&'a mut Map<String, Value>> {
	value
		.get_mut(key)
		.and_then(Value::as_object_mut)
		.ok_or_else(|| RewireError::shape(format!("{}/{}", pointer, key), "an object"))
}

/// Borrow `value[key]` as a mutable array.
pub fn array_mut<'a>(value: &'a mut Value, key: &str, pointer: &str) -> Result<&'a mut Vec<Value>> {
	value
		.get_mut(key)
		.and_then(Value::as_array_mut)
		.ok_or_else(|| RewireError::shape(format!("{}/{}", pointer, key), "an array"))
}

/// Borrow `value[key]` as a mutable object, creating an empty one when absent.
///
/// Fails if `value` is not an object or `value[key]` exists with another type.
pub fn ensure_object<'a>(
	value: &'a mut Value,
	key: &str,
	pointer: &str,
) -> Result<&'a mut Map<String, Value>> {
	let map = value
		.as_object_mut()
		.ok_or_else(|| RewireError::shape(pointer, "an object"))?;

	map.entry(key.to_string())
		.or_insert_with(|| Value::Object(Map::new()))
		.as_object_mut()
		.ok_or_else(|| RewireError::shape(format!("{}/{}", pointer, key), "an object"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_read_document() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("webpack.json");
		std::fs::write(&path, r#"{"mode": "production"}"#).unwrap();

		let doc = read_document(&path).unwrap();
		assert_eq!(doc["mode"], "production");
	}

	#[test]
	fn test_read_document_errors() {
		let dir = tempfile::tempdir().unwrap();
		let missing = dir.path().join("missing.json");
		assert!(matches!(
			read_document(&missing),
			Err(RewireError::DocumentReadError { .. })
		));

		let broken = dir.path().join("broken.json");
		std::fs::write(&broken, "{ not json").unwrap();
		assert!(matches!(
			read_document(&broken),
			Err(RewireError::DocumentParseError { .. })
		));
	}

	#[test]
	fn test_array_mut_shape_mismatch() {
		let mut value = json!({"options": {"plugins": "not-an-array"}});
		let options = value.get_mut("options").unwrap();
		match array_mut(options, "plugins", "/options").unwrap_err() {
			RewireError::ShapeMismatch { pointer, expected } => {
				assert_eq!(pointer, "/options/plugins");
				assert_eq!(expected, "an array");
			}
			other => panic!("Expected ShapeMismatch, got {other:?}"),
		}
	}

	#[test]
	fn test_ensure_object_creates_missing() {
		let mut value = json!({});
		ensure_object(&mut value, "resolve", "")
			.unwrap()
			.insert("alias".to_string(), json!({}));
		assert_eq!(value, json!({"resolve": {"alias": {}}}));
	}

	#[test]
	fn test_ensure_object_rejects_wrong_type() {
		let mut value = json!({"resolve": []});
		assert!(ensure_object(&mut value, "resolve", "").is_err());
	}

	#[test]
	fn test_node_mut() {
		let mut value = json!({"a": [{"b": 1}]});
		*node_mut(&mut value, "/a/0/b").unwrap() = json!(2);
		assert_eq!(value["a"][0]["b"], 2);
		assert!(node_mut(&mut value, "/a/1").is_err());
	}
}
