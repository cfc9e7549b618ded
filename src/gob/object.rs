use crate::gob::refs::RefIter;
use crate::gob::{GobError, PropPath, Result, Tree, Value};

/// One parsed game-object record.
///
/// Immutable after parse; the store shares instances behind `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct GameObject {
	/// Globally unique object identifier.
	pub tsid: Box<str>,
	/// Optional display label from the source record.
	pub label: Option<Box<str>>,
	/// Open-enumeration class tag.
	pub class_tsid: Box<str>,
	/// Creation/update timestamp in milliseconds since epoch.
	pub ts: i64,
	/// Identifier of the owning container object, when any.
	pub container: Option<Box<str>>,
	/// Spatial position; `None` covers both absent and sentinel "unplaced".
	pub position: Option<(i64, i64)>,
	/// Dynamic property tree.
	pub props: Tree,
}

impl GameObject {
	/// Navigate a dotted property path from the root tree.
	pub fn at(&self, path: &str) -> Result<&Value> {
		self.at_path(&PropPath::parse(path)?)
	}

	/// Navigate a parsed property path from the root tree.
	pub fn at_path(&self, path: &PropPath) -> Result<&Value> {
		let mut current: Option<&Value> = None;
		for key in &path.keys {
			let tree = match current {
				None => &self.props,
				Some(value) => value.as_tree()?,
			};
			current = Some(tree.get(key).ok_or_else(|| GobError::PathNotFound { path: path.render() })?);
		}
		current.ok_or_else(|| GobError::PathNotFound { path: path.render() })
	}

	/// Lazy depth-first sequence of outgoing references with their paths.
	pub fn references(&self) -> RefIter<'_> {
		RefIter::new(self)
	}
}
