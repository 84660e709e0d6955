use std::path::PathBuf;

/// Library-level structured errors for rewire.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum RewireError {
	#[error("No match for {target} in either the oneOf or the use layout")]
	LocationNotFound { target: String },

	#[error("Unexpected document shape at {pointer}: expected {expected}")]
	ShapeMismatch { pointer: String, expected: String },

	#[error("Pipeline stage failed: {stage}")]
	BrokenComposition {
		stage: String,
		#[source]
		source: Box<RewireError>,
	},

	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid {transform} stage #{index} in [{section}]: {reason}")]
	InvalidStage {
		section: String,
		index: usize,
		transform: String,
		reason: String,
	},

	#[error("Failed to read document: {path}")]
	DocumentReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse document: {path}")]
	DocumentParseError {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("Invalid regex pattern: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

impl RewireError {
	pub(crate) fn shape(pointer: impl Into<String>, expected: impl Into<String>) -> Self {
		RewireError::ShapeMismatch {
			pointer: pointer.into(),
			expected: expected.into(),
		}
	}
}

/// Result type alias using RewireError.
pub type Result<T> = std::result::Result<T, RewireError>;
