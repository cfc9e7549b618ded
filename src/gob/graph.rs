use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::gob::{GameObject, GobError, Loader, ObjectStore, Result};

/// Traversal options for graph resolution.
#[derive(Debug, Clone, Copy)]
pub struct GraphOptions {
	/// Abort on the first dangling reference instead of reporting it.
	pub strict: bool,
	/// Maximum number of resolved objects before truncation.
	pub max_objects: usize,
	/// Upper bound on concurrent loads per traversal frontier.
	///
	/// A tuning knob, not a correctness requirement; `1` keeps the
	/// traversal fully sequential.
	pub frontier_loads: usize,
}

impl Default for GraphOptions {
	fn default() -> Self {
		Self {
			strict: false,
			max_objects: 100_000,
			frontier_loads: 1,
		}
	}
}

/// Truncation reason for graph resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphTruncation {
	/// Object budget was reached.
	MaxObjects,
}

/// One directed reference edge observed during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
	/// Source object identifier.
	pub from: Arc<str>,
	/// Property path on the source holding the reference.
	pub path: Arc<str>,
	/// Target object identifier.
	pub to: Arc<str>,
}

/// Why a referenced identifier could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DanglingReason {
	/// The backend has no record for the identifier.
	NotFound,
	/// A record exists but could not be loaded or parsed.
	Invalid {
		/// Rendered underlying failure.
		detail: String,
	},
}

/// One broken reference in the integrity report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRef {
	/// Identifier owning the broken reference.
	pub from: Arc<str>,
	/// Property path of the broken reference on its owner.
	pub path: Arc<str>,
	/// Target identifier that failed to resolve.
	pub to: Arc<str>,
	/// Failure classification.
	pub reason: DanglingReason,
}

/// Full reachability result with integrity report.
#[derive(Debug, Clone)]
pub struct GraphResult {
	/// Resolved objects in first-visit order.
	pub objects: Vec<Arc<GameObject>>,
	/// Every observed edge in traversal order, including edges into
	/// already-visited and dangling targets.
	pub edges: Vec<GraphEdge>,
	/// Broken references, one entry per dangling target, attributed to the
	/// first edge that discovered it.
	pub dangling: Vec<DanglingRef>,
	/// Optional truncation reason.
	pub truncated: Option<GraphTruncation>,
}

struct Pending {
	tsid: Arc<str>,
	origin: Option<(Arc<str>, Arc<str>)>,
}

/// Resolve every object transitively reachable from `roots`.
///
/// Breadth-first over reference edges; each identifier is resolved at most
/// once regardless of how many paths reach it, so reference cycles
/// terminate. A failing root is a hard error; a failing non-root target is
/// recorded as dangling and traversal continues unless `strict` is set.
pub fn resolve_graph<L: Loader>(store: &ObjectStore<L>, roots: &[&str], options: &GraphOptions) -> Result<GraphResult> {
	let mut scheduled: HashSet<Arc<str>> = HashSet::new();
	let mut objects = Vec::new();
	let mut edges = Vec::new();
	let mut dangling = Vec::new();
	let mut truncated = None;

	let mut frontier: Vec<Pending> = Vec::new();
	for root in roots {
		let tsid = Arc::<str>::from(*root);
		if scheduled.insert(tsid.clone()) {
			frontier.push(Pending { tsid, origin: None });
		}
	}

	'traversal: while !frontier.is_empty() {
		debug!(frontier = frontier.len(), visited = objects.len(), "resolving frontier");
		let results = load_frontier(store, &frontier, options.frontier_loads);
		let mut next = Vec::new();

		for (pending, result) in frontier.into_iter().zip(results) {
			match result {
				Ok(object) => {
					if objects.len() >= options.max_objects {
						truncated = Some(GraphTruncation::MaxObjects);
						break 'traversal;
					}
					objects.push(object.clone());

					let from = Arc::<str>::from(object.tsid.as_ref());
					for record in object.references() {
						edges.push(GraphEdge {
							from: from.clone(),
							path: record.path.clone(),
							to: record.target.clone(),
						});
						if scheduled.insert(record.target.clone()) {
							next.push(Pending {
								tsid: record.target,
								origin: Some((from.clone(), record.path)),
							});
						}
					}
				}
				Err(err) => {
					let Some((from, path)) = pending.origin else {
						return Err(err);
					};
					if options.strict {
						return Err(GobError::StrictDangling {
							from: from.to_string(),
							path: path.to_string(),
							to: pending.tsid.to_string(),
						});
					}

					warn!(from = %from, path = %path, to = %pending.tsid, "dangling reference");
					dangling.push(DanglingRef {
						from,
						path,
						to: pending.tsid,
						reason: reason_for(&err),
					});
				}
			}
		}

		frontier = next;
	}

	debug!(objects = objects.len(), edges = edges.len(), dangling = dangling.len(), "traversal complete");
	Ok(GraphResult {
		objects,
		edges,
		dangling,
		truncated,
	})
}

fn load_frontier<L: Loader>(store: &ObjectStore<L>, frontier: &[Pending], limit: usize) -> Vec<Result<Arc<GameObject>>> {
	if limit <= 1 || frontier.len() <= 1 {
		return frontier.iter().map(|pending| store.get(&pending.tsid)).collect();
	}

	let mut out = Vec::with_capacity(frontier.len());
	for chunk in frontier.chunks(limit) {
		let results: Vec<Result<Arc<GameObject>>> = std::thread::scope(|scope| {
			let handles: Vec<_> = chunk.iter().map(|pending| scope.spawn(move || store.get(&pending.tsid))).collect();
			handles.into_iter().map(|handle| handle.join().expect("frontier load panicked")).collect()
		});
		out.extend(results);
	}
	out
}

fn reason_for(err: &GobError) -> DanglingReason {
	match err {
		GobError::UnresolvedReference { .. } => DanglingReason::NotFound,
		other => DanglingReason::Invalid { detail: other.to_string() },
	}
}
