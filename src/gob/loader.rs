use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::gob::Result;

/// Storage backend supplying raw record bytes by identifier.
///
/// `Ok(None)` means the identifier is unknown to the backend; the store
/// turns that into an unresolved-reference failure. Implementations must be
/// shareable across threads so concurrent resolution can fan out.
pub trait Loader: Send + Sync {
	/// Fetch raw record bytes for one identifier.
	fn load(&self, tsid: &str) -> Result<Option<Vec<u8>>>;
}

/// Directory-backed loader reading `<dir>/<tsid>.xml`.
#[derive(Debug, Clone)]
pub struct DirLoader {
	dir: PathBuf,
}

impl DirLoader {
	/// Create a loader rooted at `dir`.
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	/// Root directory served by this loader.
	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Discover all record identifiers in the directory, sorted.
	///
	/// An identifier is the file stem of every `.xml` entry, mirroring the
	/// corpus naming convention.
	pub fn list_ids(&self) -> Result<Vec<String>> {
		let mut out = Vec::new();
		for entry in fs::read_dir(&self.dir)? {
			let entry = entry?;
			let path = entry.path();
			if path.extension().and_then(|ext| ext.to_str()) != Some("xml") {
				continue;
			}
			if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
				out.push(stem.to_owned());
			}
		}
		out.sort();
		Ok(out)
	}
}

impl Loader for DirLoader {
	fn load(&self, tsid: &str) -> Result<Option<Vec<u8>>> {
		let path = self.dir.join(format!("{tsid}.xml"));
		match fs::read(&path) {
			Ok(bytes) => {
				debug!(tsid, path = %path.display(), len = bytes.len(), "record loaded");
				Ok(Some(bytes))
			}
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
			Err(err) => Err(err.into()),
		}
	}
}

/// In-memory loader over a fixed identifier-to-bytes map.
///
/// Intended for tests and embedding; lets a whole corpus be described as a
/// fixture without touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemLoader {
	records: HashMap<String, Vec<u8>>,
}

impl MemLoader {
	/// Create an empty loader.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add or replace one record, returning `self` for chained setup.
	pub fn with(mut self, tsid: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
		self.records.insert(tsid.into(), bytes.into());
		self
	}

	/// Add or replace one record.
	pub fn insert(&mut self, tsid: impl Into<String>, bytes: impl Into<Vec<u8>>) {
		self.records.insert(tsid.into(), bytes.into());
	}

	/// Sorted list of identifiers present in the fixture.
	pub fn list_ids(&self) -> Vec<String> {
		let mut ids: Vec<String> = self.records.keys().cloned().collect();
		ids.sort();
		ids
	}
}

impl Loader for MemLoader {
	fn load(&self, tsid: &str) -> Result<Option<Vec<u8>>> {
		Ok(self.records.get(tsid).cloned())
	}
}

#[cfg(test)]
mod tests {
	use crate::gob::{Loader, MemLoader};

	#[test]
	fn mem_loader_distinguishes_missing_from_present() {
		let loader = MemLoader::new().with("A1", b"<game_object tsid=\"A1\"/>".as_slice());
		assert!(loader.load("A1").expect("load succeeds").is_some());
		assert!(loader.load("A2").expect("load succeeds").is_none());
		assert_eq!(loader.list_ids(), ["A1"]);
	}
}
