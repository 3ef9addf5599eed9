//! File access for relines.
//!
//! The rewriter never touches `std::fs` directly. It goes through a
//! [`FileStore`], so the same logic runs against the local filesystem or an
//! in-memory fake.

pub mod memory;

pub use memory::MemoryStore;

use std::io;
use std::path::Path;

/// A path-addressable store of whole files.
pub trait FileStore {
	/// Read the full contents at `path`.
	fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

	/// Replace the contents at `path`, creating it if needed.
	fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Store backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl FileStore for LocalStore {
	fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
		std::fs::read(path)
	}

	fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
		std::fs::write(path, contents)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_local_store_round_trip() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("notes.txt");

		LocalStore.write(&path, b"a\nb\n").unwrap();
		assert_eq!(LocalStore.read(&path).unwrap(), b"a\nb\n");
	}

	#[test]
	fn test_local_store_read_missing() {
		let temp_dir = tempfile::tempdir().unwrap();
		let err = LocalStore
			.read(&temp_dir.path().join("missing.txt"))
			.unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::NotFound);
	}
}
