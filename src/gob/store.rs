use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};

use tracing::debug;

use crate::gob::{Classifier, GameObject, GobError, Loader, ParseOptions, Result, decode_bytes, parse_record};

/// Cache policies for the object store.
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
	/// Cache failed loads and replay the failure on later `get` calls.
	///
	/// When disabled, a failed identifier is forgotten so a later `get`
	/// retries against the backend.
	pub cache_failures: bool,
}

impl Default for StoreOptions {
	fn default() -> Self {
		Self { cache_failures: true }
	}
}

/// Lazy, loader-backed cache resolving identifiers to parsed objects.
///
/// Each identifier is loaded and parsed at most once per store; concurrent
/// `get` calls for one uncached identifier coordinate so exactly one does
/// the work and all callers share the result. Loads for different
/// identifiers never serialize against each other: the map lock is held
/// only for slot bookkeeping, never across loader or parser work. The cache
/// grows monotonically; eviction is a caller-level policy.
pub struct ObjectStore<L> {
	loader: L,
	classifier: Classifier,
	parse: ParseOptions,
	options: StoreOptions,
	state: Mutex<HashMap<String, Slot>>,
	ready: Condvar,
}

enum Slot {
	InFlight,
	Ready(Arc<GameObject>),
	Failed(GobError),
}

impl<L: Loader> ObjectStore<L> {
	/// Create a store over `loader` with default classification and policies.
	pub fn new(loader: L) -> Self {
		Self::with_options(loader, Classifier::default(), ParseOptions::default(), StoreOptions::default())
	}

	/// Create a store with explicit classification, parse, and cache policies.
	pub fn with_options(loader: L, classifier: Classifier, parse: ParseOptions, options: StoreOptions) -> Self {
		Self {
			loader,
			classifier,
			parse,
			options,
			state: Mutex::new(HashMap::new()),
			ready: Condvar::new(),
		}
	}

	/// Backing loader.
	pub fn loader(&self) -> &L {
		&self.loader
	}

	/// Resolve one identifier, loading and parsing on first access.
	pub fn get(&self, tsid: &str) -> Result<Arc<GameObject>> {
		let mut state = self.state.lock().expect("lock poisoned");
		loop {
			match state.get(tsid) {
				Some(Slot::Ready(object)) => return Ok(object.clone()),
				Some(Slot::Failed(err)) => return Err(err.clone()),
				Some(Slot::InFlight) => {
					state = self.ready.wait(state).expect("lock poisoned");
				}
				None => break,
			}
		}
		state.insert(tsid.to_owned(), Slot::InFlight);
		drop(state);

		let outcome = self.load_and_parse(tsid);

		let mut state = self.state.lock().expect("lock poisoned");
		let result = match outcome {
			Ok(object) => {
				let object = Arc::new(object);
				state.insert(tsid.to_owned(), Slot::Ready(object.clone()));
				Ok(object)
			}
			Err(err) => {
				if self.options.cache_failures {
					state.insert(tsid.to_owned(), Slot::Failed(err.clone()));
				} else {
					state.remove(tsid);
				}
				Err(err)
			}
		};
		drop(state);
		self.ready.notify_all();
		result
	}

	/// Returns `true` when the identifier has a cached outcome.
	pub fn contains(&self, tsid: &str) -> bool {
		matches!(
			self.state.lock().expect("lock poisoned").get(tsid),
			Some(Slot::Ready(_)) | Some(Slot::Failed(_))
		)
	}

	/// Number of cached outcomes (successes and failures).
	pub fn len(&self) -> usize {
		self.state
			.lock()
			.expect("lock poisoned")
			.values()
			.filter(|slot| !matches!(slot, Slot::InFlight))
			.count()
	}

	/// Returns `true` when nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Sorted list of identifiers with cached outcomes.
	pub fn cached_ids(&self) -> Vec<String> {
		let state = self.state.lock().expect("lock poisoned");
		let mut ids: Vec<String> = state
			.iter()
			.filter(|(_, slot)| !matches!(slot, Slot::InFlight))
			.map(|(tsid, _)| tsid.clone())
			.collect();
		ids.sort();
		ids
	}

	/// Drop every cached outcome.
	pub fn reset(&self) {
		self.state.lock().expect("lock poisoned").clear();
	}

	fn load_and_parse(&self, tsid: &str) -> Result<GameObject> {
		debug!(tsid, "resolving record");
		let raw = self.loader.load(tsid).map_err(|err| tag(tsid, err))?;
		let Some(raw) = raw else {
			return Err(GobError::UnresolvedReference { tsid: tsid.to_owned() });
		};

		let (compression, bytes) = decode_bytes(raw).map_err(|err| tag(tsid, err))?;
		debug!(tsid, compression = compression.as_str(), len = bytes.len(), "record decoded");
		parse_record(&self.classifier, &bytes, &self.parse).map_err(|err| tag(tsid, err))
	}
}

fn tag(tsid: &str, err: GobError) -> GobError {
	GobError::Load {
		tsid: tsid.to_owned(),
		source: Box::new(err),
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	use crate::gob::{GobError, Loader, MemLoader, ObjectStore, Result, StoreOptions};

	struct CountingLoader {
		inner: MemLoader,
		calls: AtomicUsize,
	}

	impl CountingLoader {
		fn new(inner: MemLoader) -> Self {
			Self {
				inner,
				calls: AtomicUsize::new(0),
			}
		}
	}

	impl Loader for CountingLoader {
		fn load(&self, tsid: &str) -> Result<Option<Vec<u8>>> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.inner.load(tsid)
		}
	}

	fn store_with(records: &[(&str, &str)]) -> ObjectStore<CountingLoader> {
		let mut loader = MemLoader::new();
		for (tsid, xml) in records {
			loader.insert(*tsid, xml.as_bytes());
		}
		ObjectStore::new(CountingLoader::new(loader))
	}

	#[test]
	fn get_caches_and_shares_one_parse() {
		let store = store_with(&[("I1", r#"<game_object tsid="I1"><int id="health">10</int></game_object>"#)]);

		let first = store.get("I1").expect("get succeeds");
		let second = store.get("I1").expect("get succeeds");

		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(store.loader().calls.load(Ordering::SeqCst), 1);
		assert_eq!(first.at("health").expect("health").as_int().expect("int"), 10);
	}

	#[test]
	fn missing_identifier_is_unresolved() {
		let store = store_with(&[]);
		let err = store.get("M1").expect_err("missing");
		assert!(matches!(err, GobError::UnresolvedReference { tsid } if tsid == "M1"));
	}

	#[test]
	fn parse_failure_is_tagged_and_cached() {
		let store = store_with(&[("X1", r#"<game_object class_tsid="human"/>"#)]);

		let err = store.get("X1").expect_err("malformed");
		assert!(matches!(&err, GobError::Load { tsid, .. } if tsid == "X1"));

		let replay = store.get("X1").expect_err("replayed failure");
		assert!(matches!(&replay, GobError::Load { tsid, .. } if tsid == "X1"));
		assert_eq!(store.loader().calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn uncached_failures_retry() {
		let mut loader = MemLoader::new();
		loader.insert("X1", br#"<game_object class_tsid="human"/>"#.as_slice());
		let store = ObjectStore::with_options(
			CountingLoader::new(loader),
			crate::gob::Classifier::default(),
			crate::gob::ParseOptions::default(),
			StoreOptions { cache_failures: false },
		);

		store.get("X1").expect_err("malformed");
		store.get("X1").expect_err("malformed again");
		assert_eq!(store.loader().calls.load(Ordering::SeqCst), 2);
		assert!(!store.contains("X1"));
	}

	#[test]
	fn reset_clears_cached_outcomes() {
		let store = store_with(&[("I1", r#"<game_object tsid="I1"/>"#)]);
		store.get("I1").expect("get succeeds");
		assert_eq!(store.cached_ids(), ["I1"]);

		store.reset();
		assert!(store.is_empty());

		store.get("I1").expect("get succeeds");
		assert_eq!(store.loader().calls.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn zstd_records_resolve_transparently() {
		let plain = br#"<game_object tsid="Z1"><int id="health">7</int></game_object>"#;
		let packed = zstd::stream::encode_all(plain.as_slice(), 0).expect("encode succeeds");
		let store = ObjectStore::new(MemLoader::new().with("Z1", packed));

		let object = store.get("Z1").expect("get succeeds");
		assert_eq!(object.at("health").expect("health").as_int().expect("int"), 7);
	}
}
