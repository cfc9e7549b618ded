use crate::gob::{GobError, PropPath, Result};

/// One node in a game object's dynamic property tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Signed integer scalar.
	Int(i64),
	/// Floating-point scalar.
	Float(f64),
	/// Boolean scalar.
	Bool(bool),
	/// Text scalar; also the opaque wrapper for unrecognized node kinds.
	Text(Box<str>),
	/// Single unresolved reference to another object.
	Ref(ObjRef),
	/// Ordered list of unresolved references.
	RefList(Vec<ObjRef>),
	/// Nested property tree.
	Tree(Tree),
}

/// Unresolved pointer to another object by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjRef {
	/// Target object identifier.
	pub tsid: Box<str>,
	/// Optional display label captured from the source record.
	pub label: Option<Box<str>>,
}

/// Insertion-ordered mapping from property key to value.
///
/// Duplicate keys are rejected at insert; the source document order is the
/// iteration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
	entries: Vec<TreeEntry>,
}

/// One key/value pair inside a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEntry {
	/// Property key.
	pub key: Box<str>,
	/// Property value.
	pub value: Value,
}

impl Tree {
	/// Create an empty tree.
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a key/value pair, rejecting duplicate keys.
	pub fn insert(&mut self, key: impl Into<Box<str>>, value: Value) -> Result<()> {
		let key = key.into();
		if self.entries.iter().any(|entry| entry.key == key) {
			return Err(GobError::DuplicateKey { key: key.into_string() });
		}
		self.entries.push(TreeEntry { key, value });
		Ok(())
	}

	/// Look up a direct child value by key.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.entries.iter().find(|entry| entry.key.as_ref() == key).map(|entry| &entry.value)
	}

	/// Number of direct entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` when the tree has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterate entries in insertion order.
	pub fn iter(&self) -> std::slice::Iter<'_, TreeEntry> {
		self.entries.iter()
	}
}

impl<'a> IntoIterator for &'a Tree {
	type Item = &'a TreeEntry;
	type IntoIter = std::slice::Iter<'a, TreeEntry>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}

impl Value {
	/// Stable lowercase label for this value's kind.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::Bool(_) => "bool",
			Self::Text(_) => "text",
			Self::Ref(_) => "ref",
			Self::RefList(_) => "reflist",
			Self::Tree(_) => "tree",
		}
	}

	/// Narrow to an integer scalar.
	pub fn as_int(&self) -> Result<i64> {
		match self {
			Self::Int(value) => Ok(*value),
			other => Err(mismatch("int", other)),
		}
	}

	/// Narrow to a float scalar.
	pub fn as_float(&self) -> Result<f64> {
		match self {
			Self::Float(value) => Ok(*value),
			other => Err(mismatch("float", other)),
		}
	}

	/// Narrow to a boolean scalar.
	pub fn as_bool(&self) -> Result<bool> {
		match self {
			Self::Bool(value) => Ok(*value),
			other => Err(mismatch("bool", other)),
		}
	}

	/// Narrow to a text scalar.
	pub fn as_text(&self) -> Result<&str> {
		match self {
			Self::Text(value) => Ok(value),
			other => Err(mismatch("text", other)),
		}
	}

	/// Narrow to a single reference.
	pub fn as_ref(&self) -> Result<&ObjRef> {
		match self {
			Self::Ref(value) => Ok(value),
			other => Err(mismatch("ref", other)),
		}
	}

	/// Narrow to a reference list.
	pub fn as_ref_list(&self) -> Result<&[ObjRef]> {
		match self {
			Self::RefList(value) => Ok(value),
			other => Err(mismatch("reflist", other)),
		}
	}

	/// Narrow to a nested tree.
	pub fn as_tree(&self) -> Result<&Tree> {
		match self {
			Self::Tree(value) => Ok(value),
			other => Err(mismatch("tree", other)),
		}
	}

	/// Navigate a dotted path expression from this value.
	pub fn at(&self, path: &str) -> Result<&Value> {
		self.at_path(&PropPath::parse(path)?)
	}

	/// Navigate a parsed property path from this value.
	pub fn at_path(&self, path: &PropPath) -> Result<&Value> {
		let mut current = self;
		for key in &path.keys {
			let tree = current.as_tree()?;
			current = tree.get(key).ok_or_else(|| GobError::PathNotFound { path: path.render() })?;
		}
		Ok(current)
	}
}

fn mismatch(expected: &'static str, got: &Value) -> GobError {
	GobError::TypeMismatch { expected, got: got.kind() }
}

#[cfg(test)]
mod tests {
	use crate::gob::{GobError, ObjRef, Tree, Value};

	fn sample_tree() -> Tree {
		let mut inner = Tree::new();
		inner.insert("energy", Value::Int(95)).expect("insert energy");
		inner.insert("mood", Value::Text("fine".into())).expect("insert mood");

		let mut root = Tree::new();
		root.insert("metabolics", Value::Tree(inner)).expect("insert metabolics");
		root.insert(
			"skills",
			Value::Ref(ObjRef {
				tsid: "D1".into(),
				label: Some("skills".into()),
			}),
		)
		.expect("insert skills");
		root
	}

	#[test]
	fn duplicate_key_is_rejected() {
		let mut tree = Tree::new();
		tree.insert("a", Value::Int(1)).expect("first insert");
		let err = tree.insert("a", Value::Int(2)).expect_err("duplicate rejected");
		assert!(matches!(err, GobError::DuplicateKey { key } if key == "a"));
		assert_eq!(tree.len(), 1);
	}

	#[test]
	fn insertion_order_is_preserved() {
		let tree = sample_tree();
		let keys: Vec<_> = tree.iter().map(|entry| entry.key.as_ref()).collect();
		assert_eq!(keys, ["metabolics", "skills"]);
	}

	#[test]
	fn path_navigation_reaches_nested_scalars() {
		let root = Value::Tree(sample_tree());
		assert_eq!(root.at("metabolics.energy").expect("path resolves").as_int().expect("int"), 95);
		assert_eq!(root.at("metabolics.mood").expect("path resolves").as_text().expect("text"), "fine");
	}

	#[test]
	fn missing_key_reports_path_not_found() {
		let root = Value::Tree(sample_tree());
		let err = root.at("metabolics.tank").expect_err("missing key");
		assert!(matches!(err, GobError::PathNotFound { path } if path == "metabolics.tank"));
	}

	#[test]
	fn stepping_through_scalar_reports_type_mismatch() {
		let root = Value::Tree(sample_tree());
		let err = root.at("metabolics.energy.deeper").expect_err("scalar step");
		assert!(matches!(err, GobError::TypeMismatch { expected: "tree", got: "int" }));
	}

	#[test]
	fn accessor_mismatch_names_both_kinds() {
		let value = Value::Text("ten".into());
		let err = value.as_int().expect_err("not an int");
		assert!(matches!(err, GobError::TypeMismatch { expected: "int", got: "text" }));
	}
}
