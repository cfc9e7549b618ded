use std::sync::Arc;

use crate::gob::value::TreeEntry;
use crate::gob::{GameObject, ObjRef, Value};

/// One outgoing reference discovered in an object's property tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefRecord {
	/// Property path where the reference occurs (`skills`, `items[2]`,
	/// `metabolics.doc`, or `container` for the envelope relation).
	pub path: Arc<str>,
	/// Target object identifier.
	pub target: Arc<str>,
	/// Optional display label captured from the source record.
	pub label: Option<Arc<str>>,
}

/// Lazy depth-first iterator over an object's outgoing references.
///
/// Traversal order is deterministic: the container relation first, then tree
/// entries in insertion order, reference-list elements in list order. The
/// sequence never deduplicates; restarting from the same object replays it
/// exactly.
pub struct RefIter<'a> {
	container: Option<RefRecord>,
	stack: Vec<Frame<'a>>,
	list: Option<ListFrame<'a>>,
}

struct Frame<'a> {
	prefix: String,
	entries: std::slice::Iter<'a, TreeEntry>,
}

struct ListFrame<'a> {
	path: String,
	items: std::iter::Enumerate<std::slice::Iter<'a, ObjRef>>,
}

impl<'a> RefIter<'a> {
	pub(crate) fn new(object: &'a GameObject) -> Self {
		let container = object.container.as_deref().map(|target| RefRecord {
			path: Arc::<str>::from("container"),
			target: Arc::<str>::from(target),
			label: None,
		});

		Self {
			container,
			stack: vec![Frame {
				prefix: String::new(),
				entries: object.props.iter(),
			}],
			list: None,
		}
	}
}

impl<'a> Iterator for RefIter<'a> {
	type Item = RefRecord;

	fn next(&mut self) -> Option<Self::Item> {
		if let Some(record) = self.container.take() {
			return Some(record);
		}

		loop {
			if let Some(list) = &mut self.list {
				if let Some((idx, item)) = list.items.next() {
					return Some(record_at(&format!("{}[{idx}]", list.path), item));
				}
				self.list = None;
			}

			let frame = self.stack.last_mut()?;
			let Some(entry) = frame.entries.next() else {
				self.stack.pop();
				continue;
			};

			let path = format!("{}{}", frame.prefix, entry.key);
			match &entry.value {
				Value::Ref(item) => return Some(record_at(&path, item)),
				Value::RefList(items) => {
					self.list = Some(ListFrame {
						path,
						items: items.iter().enumerate(),
					});
				}
				Value::Tree(tree) => {
					self.stack.push(Frame {
						prefix: format!("{path}."),
						entries: tree.iter(),
					});
				}
				Value::Int(_) | Value::Float(_) | Value::Bool(_) | Value::Text(_) => {}
			}
		}
	}
}

fn record_at(path: &str, item: &ObjRef) -> RefRecord {
	RefRecord {
		path: Arc::<str>::from(path),
		target: Arc::<str>::from(item.tsid.as_ref()),
		label: item.label.as_deref().map(Arc::<str>::from),
	}
}
