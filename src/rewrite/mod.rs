//! Line rewriting for relines.
//!
//! This module handles:
//! - Literal substring substitution with a timestamped backup
//! - Whole-line replacement on a column-window match
//! - Whole-line replacement on a key prefix

pub mod backup;
pub mod rewriter;
pub mod rule;

pub use backup::{BackupPlacement, TIMESTAMP_FORMAT, backup_path};
pub use rewriter::{LineRewriter, RewriteOptions, RewriteReport};
pub use rule::{RewriteRule, split_lines};
