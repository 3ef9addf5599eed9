//! Configuration loading and parsing for relines.
//!
//! This module handles:
//! - TOML config file parsing and edit validation
//! - Directory cascade discovery
//! - Config merging

pub mod cascade;
pub mod parser;
pub mod template;
pub mod types;

pub use cascade::{
	CONFIG_FILE_NAME, CascadeConfig, NO_USER_CONFIG_ENV, discover_configs, load_merged_config,
	load_merged_settings, merge_configs, user_config_path,
};
pub use parser::{parse_config_file, parse_config_str, parse_settings_file, parse_settings_str};
pub use template::generate_init_template;
pub use types::{
	Config, Edit, EditKind, EditWithSource, LoadedConfig, MergedConfig, Settings, SettingsConfig,
};
