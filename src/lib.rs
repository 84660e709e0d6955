//! Rewire - composable overrides for build-tool configuration documents.
//!
//! This library provides the core functionality for rewire, including:
//! - Composing transforms into a single pipeline (`override`)
//! - Locating loaders and rules across the layouts the build tool has used
//! - Apply-time gates over an explicit run context
//! - Adapting dev-server factories to the same pipeline
//! - Pipeline files and their directory cascade
//!
//! # Example
//!
//! ```
//! use rewire_cli::context::RunContext;
//! use rewire_cli::pipeline::compose;
//! use rewire_cli::transforms::{add_babel_plugin, add_bundle_visualizer};
//! use serde_json::json;
//!
//! let pipeline = compose([
//!     Some(add_babel_plugin(json!("styled-components"))),
//!     Some(add_bundle_visualizer(Default::default(), true)),
//!     None,
//! ]);
//!
//! let doc = json!({
//!     "module": {"rules": [{"oneOf": [
//!         {"loader": "babel-loader", "options": {"plugins": []}},
//!         {"loader": "file-loader", "options": {}}
//!     ]}]},
//!     "plugins": []
//! });
//!
//! let out = pipeline.apply(doc, &RunContext::new()).unwrap();
//! assert_eq!(out["module"]["rules"][0]["oneOf"][0]["options"]["plugins"][0], "styled-components");
//! assert_eq!(out["plugins"].as_array().unwrap().len(), 0);
//! ```

pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod rules;
pub mod transforms;

pub use context::{Gate, RunContext};
pub use document::Document;
pub use error::{Result, RewireError};
pub use pipeline::{Transform, compose, override_dev_server};
