//! Relines - CLI tool for in-place line rewriting.
//!
//! This library provides the core functionality for relines, including:
//! - Literal substring substitution with a timestamped backup
//! - Whole-line replacement on a column-window or key-prefix match
//! - A pluggable file store so rewrites can run against memory in tests
//! - Configuration file parsing and cascade discovery
//!
//! # Example
//!
//! ```no_run
//! use relines_cli::rewrite::LineRewriter;
//! use std::path::Path;
//!
//! let rewriter = LineRewriter::new();
//! let report = rewriter
//!     .replace_literal(Path::new("app.conf"), "localhost", "db.internal")
//!     .unwrap();
//!
//! println!("{} lines changed, backup at {:?}", report.changed, report.backup);
//! ```

pub mod config;
pub mod error;
pub mod rewrite;
pub mod store;

pub use error::{RelinesError, Result};
