use std::path::PathBuf;

/// Library-level structured errors for relines.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum RelinesError {
	#[error("Failed to read file: {path}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write file: {path}")]
	FileWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write backup: {path}")]
	BackupWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Path has no file name to derive a backup from: {path}")]
	NoFileName { path: PathBuf },

	#[error("Invalid column range: start {start} is past end {end}")]
	InvalidColumnRange { start: usize, end: usize },

	#[error("File is not valid UTF-8: {path}")]
	Encoding {
		path: PathBuf,
		#[source]
		source: std::str::Utf8Error,
	},

	#[error("Empty {what} is not allowed")]
	EmptyPattern { what: &'static str },

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

	#[error("Invalid edit '{name}': {reason}")]
	InvalidEdit { name: String, reason: String },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using RelinesError.
pub type Result<T> = std::result::Result<T, RelinesError>;
