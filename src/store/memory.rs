use crate::store::FileStore;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory [`FileStore`] for tests and dry runs.
///
/// Paths are compared verbatim; no normalization is applied.
#[derive(Debug, Default)]
pub struct MemoryStore {
	files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
	read_only: RefCell<BTreeSet<PathBuf>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seed a file.
	pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
		self.files.borrow_mut().insert(path.into(), contents.into());
	}

	/// Current contents of a file, if present.
	pub fn get(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
		self.files.borrow().get(path.as_ref()).cloned()
	}

	/// All stored paths, sorted.
	pub fn paths(&self) -> Vec<PathBuf> {
		self.files.borrow().keys().cloned().collect()
	}

	/// Make writes to `path` fail with `PermissionDenied`.
	pub fn set_read_only(&self, path: impl Into<PathBuf>) {
		self.read_only.borrow_mut().insert(path.into());
	}
}

impl FileStore for MemoryStore {
	fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
		self.files.borrow().get(path).cloned().ok_or_else(|| {
			io::Error::new(
				io::ErrorKind::NotFound,
				format!("{} not found", path.display()),
			)
		})
	}

	fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
		if self.read_only.borrow().contains(path) {
			return Err(io::Error::new(
				io::ErrorKind::PermissionDenied,
				format!("{} is read-only", path.display()),
			));
		}
		self.files
			.borrow_mut()
			.insert(path.to_path_buf(), contents.to_vec());
		Ok(())
	}
}
