#![allow(missing_docs)]

use std::fs;

use glitchdoc::gob::{DirLoader, GraphOptions, ObjectStore, resolve_graph};

fn write_corpus(dir: &std::path::Path) {
	fs::write(
		dir.join("P1.xml"),
		r#"<game_object tsid="P1" label="Stoot" class_tsid="human" x="-2147483648" y="-2147483648">
			<objref id="skills" tsid="D1"/>
			<objref id="missing" tsid="M1"/>
		</game_object>"#,
	)
	.expect("write P1");

	let skills = br#"<game_object tsid="D1" class_tsid="dc" container="P1">
		<object id="skills"><int id="mining_1">1294870000</int></object>
	</game_object>"#;
	let packed = zstd::stream::encode_all(skills.as_slice(), 0).expect("encode skills");
	fs::write(dir.join("D1.xml"), packed).expect("write D1");

	fs::write(dir.join("notes.txt"), "not a record").expect("write notes");
}

#[test]
fn directory_corpus_resolves_with_compression_and_dangling() {
	let dir = tempfile::tempdir().expect("tempdir");
	write_corpus(dir.path());

	let loader = DirLoader::new(dir.path());
	assert_eq!(loader.list_ids().expect("list ids"), ["D1", "P1"]);

	let store = ObjectStore::new(loader);
	let graph = resolve_graph(&store, &["P1"], &GraphOptions::default()).expect("resolve succeeds");

	let visited: Vec<_> = graph.objects.iter().map(|object| object.tsid.as_ref().to_owned()).collect();
	assert_eq!(visited, ["P1", "D1"]);

	// The sentinel coordinates normalize away at parse time.
	assert_eq!(graph.objects[0].position, None);

	// The compressed record parses identically to a plain one.
	let skills = store.get("D1").expect("cached skills");
	assert_eq!(
		skills.at("skills.mining_1").expect("skill entry").as_int().expect("int"),
		1_294_870_000
	);

	assert_eq!(graph.dangling.len(), 1);
	assert_eq!(graph.dangling[0].to.as_ref(), "M1");
}

#[test]
fn strict_resolution_fails_on_missing_target() {
	let dir = tempfile::tempdir().expect("tempdir");
	write_corpus(dir.path());

	let store = ObjectStore::new(DirLoader::new(dir.path()));
	let options = GraphOptions {
		strict: true,
		..GraphOptions::default()
	};
	resolve_graph(&store, &["P1"], &options).expect_err("strict abort");
}

#[test]
fn unknown_identifier_reads_as_not_found_not_io_error() {
	let dir = tempfile::tempdir().expect("tempdir");
	write_corpus(dir.path());

	let store = ObjectStore::new(DirLoader::new(dir.path()));
	let err = store.get("ZZZ").expect_err("missing record");
	assert!(matches!(err, glitchdoc::gob::GobError::UnresolvedReference { tsid } if tsid == "ZZZ"));
}
