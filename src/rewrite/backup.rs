use crate::error::{RelinesError, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// strftime pattern for the backup timestamp: `YYYYMMDDHHMMSS`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Where the `_<timestamp>` marker goes relative to the original file name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackupPlacement {
	/// `_<timestamp><name>`
	#[default]
	Prefix,

	/// `<name>_<timestamp>`
	Suffix,
}

impl BackupPlacement {
	pub fn as_str(&self) -> &'static str {
		match self {
			BackupPlacement::Prefix => "prefix",
			BackupPlacement::Suffix => "suffix",
		}
	}
}

/// Sibling path that holds the pre-image of `path` taken at `at`.
///
/// Two backups of the same file within one second share a name; the later
/// one wins.
pub fn backup_path(path: &Path, at: NaiveDateTime, placement: BackupPlacement) -> Result<PathBuf> {
	let file_name = path.file_name().ok_or_else(|| RelinesError::NoFileName {
		path: path.to_path_buf(),
	})?;
	let stamp = format!("_{}", at.format(TIMESTAMP_FORMAT));

	let mut name = OsString::with_capacity(stamp.len() + file_name.len());
	match placement {
		BackupPlacement::Prefix => {
			name.push(&stamp);
			name.push(file_name);
		}
		BackupPlacement::Suffix => {
			name.push(file_name);
			name.push(&stamp);
		}
	}

	Ok(path.with_file_name(name))
}
