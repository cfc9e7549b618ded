use std::path::Path;

use glitchdoc::gob::{DirLoader, GameObject, ObjectStore, Result};

/// Build a store over a corpus directory, returning the loader for discovery.
pub(crate) fn open_corpus(dir: &Path) -> (DirLoader, ObjectStore<DirLoader>) {
	let loader = DirLoader::new(dir);
	(loader.clone(), ObjectStore::new(loader))
}

/// Load every discoverable object, collecting failures instead of aborting.
pub(crate) fn load_all(loader: &DirLoader, store: &ObjectStore<DirLoader>) -> Result<(Vec<std::sync::Arc<GameObject>>, Vec<(String, String)>)> {
	let mut objects = Vec::new();
	let mut failures = Vec::new();
	for tsid in loader.list_ids()? {
		match store.get(&tsid) {
			Ok(object) => objects.push(object),
			Err(err) => failures.push((tsid, err.to_string())),
		}
	}
	Ok((objects, failures))
}

/// Find the player object: an explicit tsid, or the first `human` in the corpus.
pub(crate) fn find_player(loader: &DirLoader, store: &ObjectStore<DirLoader>, explicit: Option<&str>) -> Result<std::sync::Arc<GameObject>> {
	if let Some(tsid) = explicit {
		return store.get(tsid);
	}

	for tsid in loader.list_ids()? {
		if let Ok(object) = store.get(&tsid)
			&& object.class_tsid.as_ref() == "human"
		{
			return Ok(object);
		}
	}

	Err(glitchdoc::gob::GobError::UnresolvedReference {
		tsid: "<no human object in corpus>".to_owned(),
	})
}

/// Coarse report bucket for a class tag, mirroring the classic analyzer.
pub(crate) fn class_group(class_tsid: &str) -> &'static str {
	if class_tsid.starts_with("bag_") {
		"Bags"
	} else if class_tsid == "dc" {
		"Data Containers"
	} else if class_tsid == "human" {
		"Players"
	} else if class_tsid == "group" {
		"Groups"
	} else if class_tsid.starts_with("trant_") {
		"Trees/Plants"
	} else {
		"Items"
	}
}

/// Render a millisecond-epoch timestamp for report output.
pub(crate) fn ts_millis_label(millis: i64) -> String {
	chrono::DateTime::from_timestamp_millis(millis)
		.map(|when| when.format("%Y-%m-%d %H:%M:%S").to_string())
		.unwrap_or_else(|| millis.to_string())
}

/// Render a second-epoch timestamp as a date for report output.
pub(crate) fn ts_secs_label(secs: i64) -> String {
	chrono::DateTime::from_timestamp(secs, 0)
		.map(|when| when.format("%Y-%m-%d").to_string())
		.unwrap_or_else(|| secs.to_string())
}

/// Object display label falling back to the identifier.
pub(crate) fn object_label(object: &GameObject) -> &str {
	object.label.as_deref().unwrap_or(object.tsid.as_ref())
}

/// Print a serializable payload as pretty JSON.
pub(crate) fn emit_json(payload: &impl serde::Serialize) {
	println!("{}", serde_json::to_string_pretty(payload).expect("payload serializes"));
}

/// Escape text for DOT label embedding.
pub(crate) fn dot_escape(input: &str) -> String {
	input.replace('\\', "\\\\").replace('"', "\\\"")
}
