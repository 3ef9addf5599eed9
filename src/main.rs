use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use relines_cli::config::{
	CONFIG_FILE_NAME, MergedConfig, discover_configs, generate_init_template, load_merged_config,
	load_merged_settings, merge_configs, user_config_path,
};
use relines_cli::rewrite::{LineRewriter, RewriteOptions, RewriteReport, RewriteRule};

/// Environment variable holding the log filter (e.g. `debug`, `relines_cli=info`).
const LOG_ENV: &str = "RELINES_LOG";

#[derive(Parser)]
#[command(name = "relines")]
#[command(
	author,
	version,
	about = "CLI tool for in-place line rewriting with literal, column and key-prefix rules"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Create a template .relines.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .relines.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Replace every occurrence of ORIGINAL with REPLACEMENT (writes a timestamped backup)
	Literal {
		path: PathBuf,

		#[arg(allow_hyphen_values = true)]
		original: String,

		#[arg(allow_hyphen_values = true)]
		replacement: String,

		/// Skip the backup copy
		#[arg(long)]
		no_backup: bool,
	},

	/// Replace lines whose columns [START, END) equal PREFIX with REPLACEMENT_LINE
	Column {
		path: PathBuf,

		#[arg(allow_hyphen_values = true)]
		prefix: String,

		start: usize,

		end: usize,

		#[arg(allow_hyphen_values = true)]
		replacement_line: String,

		/// Terminate the replacement line with a newline
		#[arg(short, long)]
		newline: bool,

		/// Fail when START is past END instead of matching nothing
		#[arg(long)]
		strict: bool,
	},

	/// Replace lines starting with KEY by KEY followed by SUFFIX
	Key {
		path: PathBuf,

		#[arg(allow_hyphen_values = true)]
		key: String,

		#[arg(allow_hyphen_values = true)]
		suffix: String,

		/// Terminate the replacement line with a newline
		#[arg(short, long)]
		newline: bool,
	},

	/// Apply the edits declared in .relines.toml files (all, or the NAMES given)
	Run { names: Vec<String> },

	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display discovered configuration files, settings and edits
	Show,
	/// Check all config files for errors without rewriting anything
	Validate,
}

fn main() -> ExitCode {
	init_logging();

	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging() {
	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	let Some(command) = cli.command else {
		return Ok(ExitCode::SUCCESS);
	};

	match command {
		Commands::Literal {
			path,
			original,
			replacement,
			no_backup,
		} => {
			let mut options = load_options()?;
			if no_backup {
				options.backup = false;
			}
			let rule = RewriteRule::Literal {
				original,
				replacement,
			};
			handle_rewrite(&path, &rule, options)
		}
		Commands::Column {
			path,
			prefix,
			start,
			end,
			replacement_line,
			newline,
			strict,
		} => {
			let mut options = load_options()?;
			options.terminate_replacements |= newline;
			options.strict_columns |= strict;
			let rule = RewriteRule::ColumnPrefix {
				prefix,
				start,
				end,
				replacement_line,
			};
			handle_rewrite(&path, &rule, options)
		}
		Commands::Key {
			path,
			key,
			suffix,
			newline,
		} => {
			let mut options = load_options()?;
			options.terminate_replacements |= newline;
			let rule = RewriteRule::KeyPrefix { key, suffix };
			handle_rewrite(&path, &rule, options)
		}
		Commands::Run { names } => handle_run(&names),
		Commands::Config { action } => match action {
			ConfigAction::Show => handle_config_show(),
			ConfigAction::Validate => handle_config_validate(),
		},
	}
}

fn load_config() -> Result<MergedConfig> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	load_merged_config(&cwd).context("Failed to load configuration")
}

fn load_options() -> Result<RewriteOptions> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let settings = load_merged_settings(&cwd).context("Failed to load configuration settings")?;
	Ok(settings.to_options())
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_rewrite(path: &Path, rule: &RewriteRule, options: RewriteOptions) -> Result<ExitCode> {
	let report = LineRewriter::new()
		.with_options(options)
		.apply(path, rule)
		.with_context(|| format!("Failed to rewrite {}", path.display()))?;

	print_report(&report);
	Ok(ExitCode::SUCCESS)
}

fn handle_run(names: &[String]) -> Result<ExitCode> {
	let config = load_config()?;

	for name in names {
		if !config
			.edits
			.iter()
			.any(|e| e.edit.name.as_deref() == Some(name.as_str()))
		{
			anyhow::bail!("No edit named '{name}' in configuration");
		}
	}

	let selected: Vec<_> = config
		.edits
		.iter()
		.filter(|e| {
			names.is_empty()
				|| e.edit
					.name
					.as_ref()
					.is_some_and(|name| names.contains(name))
		})
		.collect();

	if selected.is_empty() {
		println!("No edits configured.");
		return Ok(ExitCode::SUCCESS);
	}

	let options = config.settings.to_options();
	let rewriter = LineRewriter::new().with_options(options.clone());
	// Later literal edits of a file must not overwrite the backup of its original content.
	let follow_up = LineRewriter::new().with_options(RewriteOptions {
		backup: false,
		..options
	});
	let mut backed_up: HashSet<PathBuf> = HashSet::new();

	for entry in selected {
		let label = entry.edit.label();
		let rule = entry
			.edit
			.to_rule()
			.with_context(|| format!("Invalid edit '{label}' in {}", entry.source.display()))?;
		let first_visit = !rule.wants_backup() || backed_up.insert(entry.edit.path.clone());
		let target = if first_visit { &rewriter } else { &follow_up };
		let report = target
			.apply(&entry.edit.path, &rule)
			.with_context(|| format!("Edit '{label}' failed"))?;
		print_report(&report);
	}

	Ok(ExitCode::SUCCESS)
}

fn print_report(report: &RewriteReport) {
	println!(
		"{}: {} of {} lines changed",
		report.path.display(),
		report.changed,
		report.lines
	);
	if let Some(ref backup) = report.backup {
		println!("  backup: {}", backup.display());
	}
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", loaded.config.root);
		println!("# no-user-config: {}", loaded.config.no_user_config);
		println!("# edits: {}", loaded.config.edits.len());
		println!();

		for (i, edit) in loaded.config.edits.iter().enumerate() {
			println!("  Edit {}: {}", i + 1, edit.label());
			println!("    kind: {}", edit.kind.as_str());
			println!("    path: {}", edit.path.display());
			println!();
		}
	}

	let options = merge_configs(&configs).settings.to_options();
	println!("Effective settings:");
	println!("  backup: {}", options.backup);
	println!("  backup-placement: {}", options.backup_placement.as_str());
	println!("  strict-columns: {}", options.strict_columns);
	println!("  require-utf8: {}", options.require_utf8);
	println!("  terminate-replacements: {}", options.terminate_replacements);
	println!();

	// Show user config path
	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match discover_configs(&cwd) {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!(
						"  {} ({} edits)",
						loaded.path.display(),
						loaded.config.edits.len()
					);
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
