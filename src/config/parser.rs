use crate::config::types::{Config, SettingsConfig};
use crate::error::{RelinesError, Result};
use std::path::Path;

fn read_config(path: &Path) -> Result<String> {
	std::fs::read_to_string(path).map_err(|source| RelinesError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})
}

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	parse_config_str(&read_config(path)?, path)
}

/// Parse only the cascade flags and `[settings]` of a config file.
///
/// `[[edits]]` entries are skipped without validation.
pub fn parse_settings_file(path: &Path) -> Result<SettingsConfig> {
	parse_settings_str(&read_config(path)?, path)
}

/// Parse only the cascade flags and `[settings]` from a string.
pub fn parse_settings_str(content: &str, path: &Path) -> Result<SettingsConfig> {
	toml::from_str(content).map_err(|source| RelinesError::ConfigParseError {
		path: path.to_path_buf(),
		source,
	})
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config =
		toml::from_str(content).map_err(|source| RelinesError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	// Validate the parsed config
	config.validate()?;

	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::EditKind;
	use crate::rewrite::{BackupPlacement, RewriteRule};
	use std::path::PathBuf;

	fn parse(content: &str) -> Result<Config> {
		parse_config_str(content, &PathBuf::from("test.toml"))
	}

	#[test]
	fn test_parse_empty_config() {
		let config = parse("").unwrap();

		assert!(!config.root);
		assert!(!config.no_user_config);
		assert_eq!(config.settings, Default::default());
		assert!(config.edits.is_empty());
	}

	#[test]
	fn test_parse_settings() {
		let content = r#"
root = true
no-user-config = true

[settings]
backup = false
backup-placement = "suffix"
strict-columns = true
"#;
		let config = parse(content).unwrap();

		assert!(config.root);
		assert!(config.no_user_config);
		assert_eq!(config.settings.backup, Some(false));
		assert_eq!(
			config.settings.backup_placement,
			Some(BackupPlacement::Suffix)
		);
		assert_eq!(config.settings.strict_columns, Some(true));
		assert_eq!(config.settings.require_utf8, None);

		let options = config.settings.to_options();
		assert!(!options.backup);
		assert!(options.strict_columns);
		assert!(!options.require_utf8);
	}

	#[test]
	fn test_parse_edits_array_of_tables() {
		let content = r#"
[[edits]]
name = "rename-host"
path = "app.conf"
kind = "literal"
original = "localhost"
replacement = "db.internal"

[[edits]]
path = "fixed.dat"
kind = "column-prefix"
prefix = "HDR"
start = 0
end = 3
replacement-line = "HDR2024\n"

[[edits]]
path = ".env"
kind = "key-prefix"
key = "PORT="
suffix = "9090\n"
"#;
		let config = parse(content).unwrap();
		assert_eq!(config.edits.len(), 3);

		let edit = &config.edits[0];
		assert_eq!(edit.kind, EditKind::Literal);
		assert_eq!(edit.label(), "rename-host");
		assert_eq!(
			edit.to_rule().unwrap(),
			RewriteRule::Literal {
				original: "localhost".to_string(),
				replacement: "db.internal".to_string(),
			}
		);

		let edit = &config.edits[1];
		assert_eq!(edit.label(), "fixed.dat");
		assert_eq!(
			edit.to_rule().unwrap(),
			RewriteRule::ColumnPrefix {
				prefix: "HDR".to_string(),
				start: 0,
				end: 3,
				replacement_line: "HDR2024\n".to_string(),
			}
		);

		assert_eq!(config.edits[2].kind, EditKind::KeyPrefix);
	}

	#[test]
	fn test_missing_field_for_kind() {
		let content = r#"
[[edits]]
name = "broken"
path = ".env"
kind = "key-prefix"
key = "PORT="
"#;
		match parse(content).unwrap_err() {
			RelinesError::InvalidEdit { name, reason } => {
				assert_eq!(name, "broken");
				assert!(reason.contains("suffix"));
			}
			other => panic!("Expected InvalidEdit error, got {other:?}"),
		}
	}

	#[test]
	fn test_field_from_other_kind_rejected() {
		let content = r#"
[[edits]]
path = ".env"
kind = "literal"
original = "a"
replacement = "b"
key = "PORT="
"#;
		match parse(content).unwrap_err() {
			RelinesError::InvalidEdit { reason, .. } => {
				assert!(reason.contains("'key'"));
			}
			other => panic!("Expected InvalidEdit error, got {other:?}"),
		}
	}

	#[test]
	fn test_inverted_columns_left_to_strict_setting() {
		let content = r#"
[[edits]]
path = "fixed.dat"
kind = "column-prefix"
prefix = "A"
start = 4
end = 1
replacement-line = "B"
"#;
		let config = parse(content).unwrap();
		let rule = config.edits[0].to_rule().unwrap();

		assert!(rule.validate(false).is_ok());
		assert!(matches!(
			rule.validate(true),
			Err(RelinesError::InvalidColumnRange { start: 4, end: 1 })
		));
	}

	#[test]
	fn test_settings_only_skips_edits() {
		let content = r#"
root = true

[settings]
strict-columns = true

[[edits]]
path = "a.txt"
kind = "regex"
"#;
		assert!(parse(content).is_err());

		let settings = parse_settings_str(content, &PathBuf::from("test.toml")).unwrap();
		assert!(settings.root);
		assert_eq!(settings.settings.strict_columns, Some(true));
	}

	#[test]
	fn test_empty_literal_rejected() {
		let content = r#"
[[edits]]
path = "a.txt"
kind = "literal"
original = ""
replacement = "b"
"#;
		assert!(matches!(
			parse(content).unwrap_err(),
			RelinesError::InvalidEdit { .. }
		));
	}

	#[test]
	fn test_unknown_kind_is_parse_error() {
		let content = r#"
[[edits]]
path = "a.txt"
kind = "regex"
"#;
		assert!(matches!(
			parse(content).unwrap_err(),
			RelinesError::ConfigParseError { .. }
		));
	}

	#[test]
	fn test_unknown_edit_field_is_parse_error() {
		let content = r#"
[[edits]]
path = "a.txt"
kind = "literal"
original = "a"
replacement = "b"
pattern = "c"
"#;
		assert!(matches!(
			parse(content).unwrap_err(),
			RelinesError::ConfigParseError { .. }
		));
	}
}
