use crate::config::parser::{parse_config_file, parse_settings_file};
use crate::config::types::{
	Config, EditWithSource, LoadedConfig, MergedConfig, Settings, SettingsConfig,
};
use crate::error::{RelinesError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in every directory of the cascade.
pub const CONFIG_FILE_NAME: &str = ".relines.toml";

/// Environment variable that, if truthy, skips ~/.relines.toml.
pub const NO_USER_CONFIG_ENV: &str = "RELINES_NO_USER_CONFIG";

/// A config file shape the cascade can load.
pub trait CascadeConfig: Sized {
	/// Parse the file at `path`.
	fn load(path: &Path) -> Result<Self>;

	/// Stop walking up after this file.
	fn is_root(&self) -> bool;

	/// Never load ~/.relines.toml when this file is in the cascade.
	fn skips_user_config(&self) -> bool;
}

impl CascadeConfig for Config {
	fn load(path: &Path) -> Result<Self> {
		parse_config_file(path)
	}

	fn is_root(&self) -> bool {
		self.root
	}

	fn skips_user_config(&self) -> bool {
		self.no_user_config
	}
}

impl CascadeConfig for SettingsConfig {
	fn load(path: &Path) -> Result<Self> {
		parse_settings_file(path)
	}

	fn is_root(&self) -> bool {
		self.root
	}

	fn skips_user_config(&self) -> bool {
		self.no_user_config
	}
}

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.relines.toml`
/// 2. Continue up the directory tree, stopping after a file with `root = true`
/// 3. Finally, check ~/.relines.toml (unless disabled)
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	Ok(walk_cascade::<Config>(start_dir)?
		.into_iter()
		.map(|(path, config)| LoadedConfig { config, path })
		.collect())
}

fn walk_cascade<C: CascadeConfig>(start_dir: &Path) -> Result<Vec<(PathBuf, C)>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	loop {
		let config_path = current_dir.join(CONFIG_FILE_NAME);

		if config_path.exists() {
			debug!(path = %config_path.display(), "loading config");
			let config = C::load(&config_path)?;
			let is_root = config.is_root();

			configs.push((config_path, config));

			if is_root {
				break;
			}
		}

		match current_dir.parent() {
			Some(parent) => current_dir = parent.to_path_buf(),
			None => break,
		}
	}

	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load ~/.relines.toml if it exists, isn't disabled, and wasn't already
/// picked up by the directory walk.
fn load_user_config<C: CascadeConfig>(existing: &[(PathBuf, C)]) -> Result<Option<(PathBuf, C)>> {
	if is_env_truthy(NO_USER_CONFIG_ENV)
		|| existing
			.iter()
			.any(|(_, config)| config.skips_user_config())
	{
		return Ok(None);
	}

	let user_config_path = user_config_path()?;

	if existing.iter().any(|(path, _)| *path == user_config_path) {
		return Ok(None);
	}

	if user_config_path.exists() {
		debug!(path = %user_config_path.display(), "loading user config");
		let config = C::load(&user_config_path)?;
		Ok(Some((user_config_path, config)))
	} else {
		Ok(None)
	}
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Merge multiple configs into a single effective config.
///
/// Settings are taken from the nearest config that sets them. Edits are
/// collected in cascade order, with relative paths resolved against the
/// directory of the config that declared them.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig::default();

	for loaded in configs {
		merged.settings.merge_from(&loaded.config.settings);

		let base = loaded.path.parent().unwrap_or_else(|| Path::new(""));
		for edit in &loaded.config.edits {
			let mut edit = edit.clone();
			edit.path = base.join(&edit.path);
			merged.edits.push(EditWithSource {
				edit,
				source: loaded.path.clone(),
			});
		}
	}

	merged
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Discover the cascade and merge only its `[settings]`.
///
/// Edits are not parsed, so a broken edit elsewhere in the cascade does not
/// block a direct rewrite.
pub fn load_merged_settings(start_dir: &Path) -> Result<Settings> {
	let mut settings = Settings::default();
	for (_, config) in walk_cascade::<SettingsConfig>(start_dir)? {
		settings.merge_from(&config.settings);
	}
	Ok(settings)
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(RelinesError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
