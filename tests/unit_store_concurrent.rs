#![allow(missing_docs)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

use glitchdoc::gob::{Loader, MemLoader, ObjectStore, Result};

struct SleepyLoader {
	inner: MemLoader,
	calls: AtomicUsize,
}

impl Loader for SleepyLoader {
	fn load(&self, tsid: &str) -> Result<Option<Vec<u8>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		std::thread::sleep(Duration::from_millis(50));
		self.inner.load(tsid)
	}
}

#[test]
fn concurrent_gets_for_one_identifier_share_one_load() {
	let loader = SleepyLoader {
		inner: MemLoader::new().with("P1", r#"<game_object tsid="P1"><int id="level">3</int></game_object>"#.as_bytes()),
		calls: AtomicUsize::new(0),
	};
	let store = Arc::new(ObjectStore::new(loader));

	let mut handles = Vec::new();
	for _ in 0..8 {
		let store = store.clone();
		handles.push(std::thread::spawn(move || store.get("P1").expect("get succeeds")));
	}
	let objects: Vec<_> = handles.into_iter().map(|handle| handle.join().expect("thread joins")).collect();

	assert_eq!(store.loader().calls.load(Ordering::SeqCst), 1);
	for object in &objects {
		assert!(Arc::ptr_eq(object, &objects[0]));
		assert_eq!(object.at("level").expect("level").as_int().expect("int"), 3);
	}
}

struct RendezvousLoader {
	inner: MemLoader,
	barrier: Barrier,
}

impl Loader for RendezvousLoader {
	fn load(&self, tsid: &str) -> Result<Option<Vec<u8>>> {
		// Both loads must be in flight at once for the barrier to release.
		self.barrier.wait();
		self.inner.load(tsid)
	}
}

#[test]
fn loads_for_different_identifiers_overlap() {
	let loader = RendezvousLoader {
		inner: MemLoader::new()
			.with("A1", r#"<game_object tsid="A1"/>"#.as_bytes())
			.with("B1", r#"<game_object tsid="B1"/>"#.as_bytes()),
		barrier: Barrier::new(2),
	};
	let store = Arc::new(ObjectStore::new(loader));

	let store_a = store.clone();
	let handle_a = std::thread::spawn(move || store_a.get("A1").expect("get succeeds"));
	let store_b = store.clone();
	let handle_b = std::thread::spawn(move || store_b.get("B1").expect("get succeeds"));

	assert_eq!(handle_a.join().expect("thread joins").tsid.as_ref(), "A1");
	assert_eq!(handle_b.join().expect("thread joins").tsid.as_ref(), "B1");
}

#[test]
fn concurrent_failures_share_one_load_too() {
	let loader = SleepyLoader {
		inner: MemLoader::new(),
		calls: AtomicUsize::new(0),
	};
	let store = Arc::new(ObjectStore::new(loader));

	let mut handles = Vec::new();
	for _ in 0..4 {
		let store = store.clone();
		handles.push(std::thread::spawn(move || store.get("M1").expect_err("missing")));
	}
	for handle in handles {
		handle.join().expect("thread joins");
	}

	assert_eq!(store.loader().calls.load(Ordering::SeqCst), 1);
}
