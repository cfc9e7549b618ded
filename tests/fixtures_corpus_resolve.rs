#![allow(missing_docs)]

use glitchdoc::gob::{GraphOptions, MemLoader, ObjectStore, resolve_graph};

fn corpus() -> MemLoader {
	MemLoader::new()
		.with(
			"P1",
			r#"<game_object tsid="P1" label="Stoot" class_tsid="human">
				<objrefs id="items"><objref tsid="B1" label="Backpack"/></objrefs>
			</game_object>"#
				.as_bytes(),
		)
		.with(
			"B1",
			r#"<game_object tsid="B1" label="Backpack" class_tsid="bag_generic" container="P1">
				<objrefs id="items"><objref tsid="I1" label="Pick"/></objrefs>
			</game_object>"#
				.as_bytes(),
		)
		.with("I1", r#"<game_object tsid="I1" label="Pick" class_tsid="pick"><int id="health">10</int></game_object>"#.as_bytes())
}

#[test]
fn three_object_corpus_resolves_completely() {
	let store = ObjectStore::new(corpus());
	let graph = resolve_graph(&store, &["P1"], &GraphOptions::default()).expect("resolve succeeds");

	let visited: Vec<_> = graph.objects.iter().map(|object| object.tsid.as_ref().to_owned()).collect();
	assert_eq!(visited, ["P1", "B1", "I1"]);

	let edges: Vec<(String, String, String)> = graph
		.edges
		.iter()
		.map(|edge| (edge.from.to_string(), edge.path.to_string(), edge.to.to_string()))
		.collect();
	assert_eq!(
		edges,
		[
			("P1".to_owned(), "items[0]".to_owned(), "B1".to_owned()),
			("B1".to_owned(), "container".to_owned(), "P1".to_owned()),
			("B1".to_owned(), "items[0]".to_owned(), "I1".to_owned()),
		]
	);

	assert!(graph.dangling.is_empty());
	assert_eq!(graph.truncated, None);

	let item = store.get("I1").expect("cached item");
	assert_eq!(item.at("health").expect("health").as_int().expect("int"), 10);
}

#[test]
fn missing_item_is_dangling_while_rest_resolves() {
	let store = ObjectStore::new(
		corpus().with(
			"B1",
			r#"<game_object tsid="B1" class_tsid="bag_generic" container="P1">
				<objrefs id="items"><objref tsid="I1"/><objref tsid="M1"/></objrefs>
			</game_object>"#
				.as_bytes(),
		),
	);

	let graph = resolve_graph(&store, &["P1"], &GraphOptions::default()).expect("resolve succeeds");

	let visited: Vec<_> = graph.objects.iter().map(|object| object.tsid.as_ref().to_owned()).collect();
	assert_eq!(visited, ["P1", "B1", "I1"]);

	assert_eq!(graph.dangling.len(), 1);
	assert_eq!(graph.dangling[0].from.as_ref(), "B1");
	assert_eq!(graph.dangling[0].path.as_ref(), "items[1]");
	assert_eq!(graph.dangling[0].to.as_ref(), "M1");
}

#[test]
fn queries_after_abandoned_traversal_reuse_the_cache() {
	let store = ObjectStore::new(corpus());

	// Resolve a subgraph, then query the same store directly.
	resolve_graph(&store, &["B1"], &GraphOptions::default()).expect("resolve succeeds");
	assert!(store.contains("I1"));

	let graph = resolve_graph(&store, &["P1"], &GraphOptions::default()).expect("resolve succeeds");
	assert_eq!(graph.objects.len(), 3);
}
