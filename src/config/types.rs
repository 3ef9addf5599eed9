use crate::error::{RelinesError, Result};
use crate::rewrite::{BackupPlacement, RewriteOptions, RewriteRule};
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration from a `.relines.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop walking up the directory tree after this file.
	#[serde(default)]
	pub root: bool,

	/// If true, never load ~/.relines.toml.
	#[serde(default)]
	pub no_user_config: bool,

	/// Rewrite settings. Unset fields fall through to outer configs.
	#[serde(default)]
	pub settings: Settings,

	/// Named edits, applied in order by `relines run`.
	#[serde(default)]
	pub edits: Vec<Edit>,
}

/// The cascade-relevant part of a `.relines.toml`, without its edits.
///
/// Used by direct rewrites, which only need settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SettingsConfig {
	#[serde(default)]
	pub root: bool,

	#[serde(default)]
	pub no_user_config: bool,

	#[serde(default)]
	pub settings: Settings,
}

/// Optional overrides for [`RewriteOptions`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
	pub backup: Option<bool>,
	pub backup_placement: Option<BackupPlacement>,
	pub strict_columns: Option<bool>,
	pub require_utf8: Option<bool>,
	pub terminate_replacements: Option<bool>,
}

impl Settings {
	/// Fill every unset field from `outer`.
	pub fn merge_from(&mut self, outer: &Settings) {
		self.backup = self.backup.or(outer.backup);
		self.backup_placement = self.backup_placement.or(outer.backup_placement);
		self.strict_columns = self.strict_columns.or(outer.strict_columns);
		self.require_utf8 = self.require_utf8.or(outer.require_utf8);
		self.terminate_replacements = self
			.terminate_replacements
			.or(outer.terminate_replacements);
	}

	/// Resolve into concrete options, defaulting anything unset.
	pub fn to_options(&self) -> RewriteOptions {
		let defaults = RewriteOptions::default();
		RewriteOptions {
			backup: self.backup.unwrap_or(defaults.backup),
			backup_placement: self.backup_placement.unwrap_or(defaults.backup_placement),
			strict_columns: self.strict_columns.unwrap_or(defaults.strict_columns),
			require_utf8: self.require_utf8.unwrap_or(defaults.require_utf8),
			terminate_replacements: self
				.terminate_replacements
				.unwrap_or(defaults.terminate_replacements),
		}
	}
}

/// Which rewrite an edit performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditKind {
	Literal,
	ColumnPrefix,
	KeyPrefix,
}

impl EditKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			EditKind::Literal => "literal",
			EditKind::ColumnPrefix => "column-prefix",
			EditKind::KeyPrefix => "key-prefix",
		}
	}

	fn fields(&self) -> &'static [&'static str] {
		match self {
			EditKind::Literal => &["original", "replacement"],
			EditKind::ColumnPrefix => &["prefix", "start", "end", "replacement-line"],
			EditKind::KeyPrefix => &["key", "suffix"],
		}
	}
}

/// A single configured edit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Edit {
	/// Name used to select the edit from the command line.
	pub name: Option<String>,

	/// Target file. Relative paths are resolved against the config file's directory.
	pub path: PathBuf,

	pub kind: EditKind,

	pub original: Option<String>,
	pub replacement: Option<String>,

	pub prefix: Option<String>,
	pub start: Option<usize>,
	pub end: Option<usize>,
	pub replacement_line: Option<String>,

	pub key: Option<String>,
	pub suffix: Option<String>,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from every config file in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// Settings, nearest config first per field.
	pub settings: Settings,

	/// All edits, in cascade order, with paths already resolved.
	pub edits: Vec<EditWithSource>,
}

/// An edit with the config file it came from.
#[derive(Debug, Clone)]
pub struct EditWithSource {
	pub edit: Edit,

	pub source: PathBuf,
}

impl Edit {
	/// The edit's name, or its path when unnamed.
	pub fn label(&self) -> String {
		match self.name {
			Some(ref name) => name.clone(),
			None => self.path.display().to_string(),
		}
	}

	fn set_fields(&self) -> Vec<&'static str> {
		[
			("original", self.original.is_some()),
			("replacement", self.replacement.is_some()),
			("prefix", self.prefix.is_some()),
			("start", self.start.is_some()),
			("end", self.end.is_some()),
			("replacement-line", self.replacement_line.is_some()),
			("key", self.key.is_some()),
			("suffix", self.suffix.is_some()),
		]
		.iter()
		.filter(|(_, is_set)| *is_set)
		.map(|(name, _)| *name)
		.collect()
	}

	fn invalid(&self, reason: impl Into<String>) -> RelinesError {
		RelinesError::InvalidEdit {
			name: self.label(),
			reason: reason.into(),
		}
	}

	fn require<T: Clone>(&self, value: &Option<T>, field: &str) -> Result<T> {
		value
			.clone()
			.ok_or_else(|| self.invalid(format!("missing '{field}' for {} edit", self.kind.as_str())))
	}

	/// Build the rewrite rule this edit describes.
	pub fn to_rule(&self) -> Result<RewriteRule> {
		let allowed = self.kind.fields();
		if let Some(field) = self.set_fields().into_iter().find(|f| !allowed.contains(f)) {
			return Err(self.invalid(format!(
				"'{field}' does not apply to {} edits",
				self.kind.as_str()
			)));
		}

		let rule = match self.kind {
			EditKind::Literal => RewriteRule::Literal {
				original: self.require(&self.original, "original")?,
				replacement: self.require(&self.replacement, "replacement")?,
			},
			EditKind::ColumnPrefix => RewriteRule::ColumnPrefix {
				prefix: self.require(&self.prefix, "prefix")?,
				start: self.require(&self.start, "start")?,
				end: self.require(&self.end, "end")?,
				replacement_line: self.require(&self.replacement_line, "replacement-line")?,
			},
			EditKind::KeyPrefix => RewriteRule::KeyPrefix {
				key: self.require(&self.key, "key")?,
				suffix: self.require(&self.suffix, "suffix")?,
			},
		};

		// Column ranges are checked when the edit runs, under `strict-columns`.
		rule.validate(false)
			.map_err(|e| self.invalid(e.to_string()))?;

		Ok(rule)
	}
}

impl Config {
	/// Validate all edits in this config.
	pub fn validate(&self) -> Result<()> {
		for edit in &self.edits {
			edit.to_rule()?;
		}
		Ok(())
	}
}
