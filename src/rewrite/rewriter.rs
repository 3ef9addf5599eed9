use crate::error::{RelinesError, Result};
use crate::rewrite::backup::{BackupPlacement, backup_path};
use crate::rewrite::rule::{RewriteRule, split_lines};
use crate::store::{FileStore, LocalStore};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Knobs that change how a rewrite is carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
	/// Write a timestamped backup before a literal substitution.
	pub backup: bool,

	/// Where the timestamp goes in the backup file name.
	pub backup_placement: BackupPlacement,

	/// Fail on `start > end` column ranges instead of treating them as no-match.
	pub strict_columns: bool,

	/// Fail with an encoding error when the file is not valid UTF-8.
	pub require_utf8: bool,

	/// Append `\n` to column/key replacement lines that lack one.
	pub terminate_replacements: bool,
}

impl Default for RewriteOptions {
	fn default() -> Self {
		Self {
			backup: true,
			backup_placement: BackupPlacement::Prefix,
			strict_columns: false,
			require_utf8: false,
			terminate_replacements: false,
		}
	}
}

/// Outcome of one completed rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteReport {
	/// The rewritten file.
	pub path: PathBuf,

	/// Lines visited.
	pub lines: usize,

	/// Lines the rule matched (and therefore re-emitted).
	pub changed: usize,

	/// Backup written before the rewrite, if any.
	pub backup: Option<PathBuf>,
}

type Clock = Box<dyn Fn() -> NaiveDateTime>;

fn local_now() -> NaiveDateTime {
	chrono::Local::now().naive_local()
}

/// Rewrites files line by line through a [`FileStore`].
///
/// Every operation reads the whole file, visits each line once in order, and
/// writes the concatenated result back to the same path. Nothing is kept
/// between calls.
pub struct LineRewriter<S = LocalStore> {
	store: S,
	options: RewriteOptions,
	clock: Clock,
}

impl LineRewriter<LocalStore> {
	/// Rewriter over the local filesystem with default options.
	pub fn new() -> Self {
		Self::with_store(LocalStore)
	}
}

impl Default for LineRewriter<LocalStore> {
	fn default() -> Self {
		Self::new()
	}
}

impl<S: FileStore> LineRewriter<S> {
	pub fn with_store(store: S) -> Self {
		Self {
			store,
			options: RewriteOptions::default(),
			clock: Box::new(local_now),
		}
	}

	pub fn with_options(mut self, options: RewriteOptions) -> Self {
		self.options = options;
		self
	}

	/// Override the clock used for backup timestamps.
	pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + 'static) -> Self {
		self.clock = Box::new(clock);
		self
	}

	pub fn store(&self) -> &S {
		&self.store
	}

	/// Replace every occurrence of `original` with `replacement` on every line,
	/// after backing the file up.
	pub fn replace_literal(
		&self,
		path: &Path,
		original: &str,
		replacement: &str,
	) -> Result<RewriteReport> {
		self.apply(
			path,
			&RewriteRule::Literal {
				original: original.to_string(),
				replacement: replacement.to_string(),
			},
		)
	}

	/// Replace whole lines whose `start..end` window equals `prefix`.
	pub fn replace_line_if_prefix_in_range(
		&self,
		path: &Path,
		prefix: &str,
		start: usize,
		end: usize,
		replacement_line: &str,
	) -> Result<RewriteReport> {
		self.apply(
			path,
			&RewriteRule::ColumnPrefix {
				prefix: prefix.to_string(),
				start,
				end,
				replacement_line: replacement_line.to_string(),
			},
		)
	}

	/// Replace lines starting with `key` by `key + suffix`.
	pub fn replace_line_if_key_prefix(
		&self,
		path: &Path,
		key: &str,
		suffix: &str,
	) -> Result<RewriteReport> {
		self.apply(
			path,
			&RewriteRule::KeyPrefix {
				key: key.to_string(),
				suffix: suffix.to_string(),
			},
		)
	}

	/// Apply any rule to the file at `path`.
	pub fn apply(&self, path: &Path, rule: &RewriteRule) -> Result<RewriteReport> {
		rule.validate(self.options.strict_columns)?;

		let content = self
			.store
			.read(path)
			.map_err(|source| RelinesError::FileRead {
				path: path.to_path_buf(),
				source,
			})?;

		if self.options.require_utf8 {
			std::str::from_utf8(&content).map_err(|source| RelinesError::Encoding {
				path: path.to_path_buf(),
				source,
			})?;
		}

		let (rewritten, lines, changed) = self.rewrite_content(&content, rule);
		debug!(
			path = %path.display(),
			rule = rule.kind(),
			lines,
			changed,
			"rewrote lines"
		);

		let backup = if rule.wants_backup() && self.options.backup {
			Some(self.write_backup(path, &content)?)
		} else {
			None
		};

		self.store
			.write(path, &rewritten)
			.map_err(|source| RelinesError::FileWrite {
				path: path.to_path_buf(),
				source,
			})?;

		info!(path = %path.display(), rule = rule.kind(), changed, "file rewritten");

		Ok(RewriteReport {
			path: path.to_path_buf(),
			lines,
			changed,
			backup,
		})
	}

	fn rewrite_content(&self, content: &[u8], rule: &RewriteRule) -> (Vec<u8>, usize, usize) {
		let terminate = self.options.terminate_replacements && rule.replaces_whole_line();
		let mut out = Vec::with_capacity(content.len());
		let mut lines = 0;
		let mut changed = 0;

		for line in split_lines(content) {
			lines += 1;
			match rule.rewrite_line(line) {
				Some(mut replaced) => {
					changed += 1;
					if terminate && !replaced.ends_with(b"\n") {
						replaced.push(b'\n');
					}
					out.extend_from_slice(&replaced);
				}
				None => out.extend_from_slice(line),
			}
		}

		(out, lines, changed)
	}

	fn write_backup(&self, path: &Path, content: &[u8]) -> Result<PathBuf> {
		let target = backup_path(path, (self.clock)(), self.options.backup_placement)?;
		self.store
			.write(&target, content)
			.map_err(|source| RelinesError::BackupWrite {
				path: target.clone(),
				source,
			})?;
		info!(path = %path.display(), backup = %target.display(), "backup written");
		Ok(target)
	}
}
