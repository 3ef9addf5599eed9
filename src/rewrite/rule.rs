use crate::error::{RelinesError, Result};

/// A single line-rewriting rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteRule {
	/// Replace every non-overlapping occurrence of `original` with `replacement`.
	Literal {
		original: String,
		replacement: String,
	},

	/// Replace the whole line with `replacement_line` when `line[start..end]`
	/// equals `prefix`.
	ColumnPrefix {
		prefix: String,
		start: usize,
		end: usize,
		replacement_line: String,
	},

	/// Replace the whole line with `key + suffix` when the line starts with `key`.
	KeyPrefix { key: String, suffix: String },
}

impl RewriteRule {
	/// Short, stable name of the rule kind (used in logs and reports).
	pub fn kind(&self) -> &'static str {
		match self {
			RewriteRule::Literal { .. } => "literal",
			RewriteRule::ColumnPrefix { .. } => "column-prefix",
			RewriteRule::KeyPrefix { .. } => "key-prefix",
		}
	}

	/// Whether applying this rule writes a backup first.
	pub fn wants_backup(&self) -> bool {
		matches!(self, RewriteRule::Literal { .. })
	}

	/// Whether a match re-emits the entire line rather than editing it.
	pub fn replaces_whole_line(&self) -> bool {
		!matches!(self, RewriteRule::Literal { .. })
	}

	/// Reject rules whose behavior is undefined.
	///
	/// An inverted column range is only an error when `strict_columns` is set;
	/// otherwise it simply never matches.
	pub fn validate(&self, strict_columns: bool) -> Result<()> {
		match self {
			RewriteRule::Literal { original, .. } if original.is_empty() => {
				Err(RelinesError::EmptyPattern {
					what: "literal original",
				})
			}
			RewriteRule::KeyPrefix { key, .. } if key.is_empty() => {
				Err(RelinesError::EmptyPattern { what: "key" })
			}
			RewriteRule::ColumnPrefix { start, end, .. } if strict_columns && start > end => {
				Err(RelinesError::InvalidColumnRange {
					start: *start,
					end: *end,
				})
			}
			_ => Ok(()),
		}
	}

	/// Rewrite one raw line (terminator included).
	///
	/// Returns `None` when the rule does not apply, meaning the line is kept
	/// byte for byte.
	pub fn rewrite_line(&self, line: &[u8]) -> Option<Vec<u8>> {
		match self {
			RewriteRule::Literal {
				original,
				replacement,
			} => replace_all(line, original.as_bytes(), replacement.as_bytes()),
			RewriteRule::ColumnPrefix {
				prefix,
				start,
				end,
				replacement_line,
			} => column_window(line, *start, *end)
				.filter(|window| *window == prefix.as_bytes())
				.map(|_| replacement_line.as_bytes().to_vec()),
			RewriteRule::KeyPrefix { key, suffix } => {
				if line.starts_with(key.as_bytes()) {
					let mut out = Vec::with_capacity(key.len() + suffix.len());
					out.extend_from_slice(key.as_bytes());
					out.extend_from_slice(suffix.as_bytes());
					Some(out)
				} else {
					None
				}
			}
		}
	}
}

/// Split content into lines, each keeping its trailing `\n`.
///
/// A final line without a terminator is returned as-is. Empty content has no
/// lines.
pub fn split_lines(content: &[u8]) -> Vec<&[u8]> {
	if content.is_empty() {
		return Vec::new();
	}
	content.split_inclusive(|b| *b == b'\n').collect()
}

/// The `start..end` window of a line, with both bounds clamped to its length.
///
/// `None` when `start > end`.
fn column_window(line: &[u8], start: usize, end: usize) -> Option<&[u8]> {
	if start > end {
		return None;
	}
	let len = line.len();
	Some(&line[start.min(len)..end.min(len)])
}

/// Leftmost-first, non-overlapping replacement. Inserted text is not rescanned.
///
/// `None` when `needle` does not occur (or is empty).
fn replace_all(haystack: &[u8], needle: &[u8], with: &[u8]) -> Option<Vec<u8>> {
	if needle.is_empty() {
		return None;
	}

	let mut out = Vec::with_capacity(haystack.len());
	let mut rest = haystack;
	let mut found = false;

	while let Some(pos) = find(rest, needle) {
		out.extend_from_slice(&rest[..pos]);
		out.extend_from_slice(with);
		rest = &rest[pos + needle.len()..];
		found = true;
	}

	if !found {
		return None;
	}
	out.extend_from_slice(rest);
	Some(out)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
	haystack
		.windows(needle.len())
		.position(|window| window == needle)
}
