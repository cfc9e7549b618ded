use std::path::PathBuf;

use glitchdoc::gob::{DanglingReason, GraphOptions, GraphResult, GraphTruncation, Result, resolve_graph};

use crate::cmd::util::{dot_escape, emit_json, object_label, open_corpus};

#[derive(clap::Args)]
pub struct Args {
	pub dir: PathBuf,
	#[arg(required = true)]
	pub roots: Vec<String>,
	#[arg(long)]
	pub strict: bool,
	#[arg(long = "max-objects")]
	pub max_objects: Option<usize>,
	#[arg(long = "frontier-loads")]
	pub frontier_loads: Option<usize>,
	#[arg(long)]
	pub dot: bool,
	#[arg(long)]
	pub json: bool,
}

/// Resolve and print the reference graph reachable from the given roots.
pub fn run(args: Args) -> Result<()> {
	let Args {
		dir,
		roots,
		strict,
		max_objects,
		frontier_loads,
		dot,
		json,
	} = args;

	let (_, store) = open_corpus(&dir);

	let mut options = GraphOptions::default();
	options.strict = strict;
	if let Some(max_objects) = max_objects {
		options.max_objects = max_objects;
	}
	if let Some(frontier_loads) = frontier_loads {
		options.frontier_loads = frontier_loads;
	}

	let root_refs: Vec<&str> = roots.iter().map(String::as_str).collect();
	let graph = resolve_graph(&store, &root_refs, &options)?;

	if json {
		print_json(&roots, &graph);
		return Ok(());
	}
	if dot {
		print_dot(&graph);
		return Ok(());
	}

	print_text(&dir, &roots, &graph);
	Ok(())
}

fn print_text(dir: &std::path::Path, roots: &[String], graph: &GraphResult) {
	println!("dir: {}", dir.display());
	println!("roots: {}", roots.join(" "));
	println!("objects: {}", graph.objects.len());
	println!("edges: {}", graph.edges.len());
	println!("dangling: {}", graph.dangling.len());
	println!("truncated: {}", truncation_label(graph.truncated));

	for edge in &graph.edges {
		println!("{} -{}-> {}", edge.from, edge.path, edge.to);
	}
	for broken in &graph.dangling {
		println!("dangling: {} -{}-> {} ({})", broken.from, broken.path, broken.to, reason_label(&broken.reason));
	}
}

fn print_dot(graph: &GraphResult) {
	println!("digraph glitchdoc {{");
	for object in &graph.objects {
		let label = format!("{}\\n{}", object_label(object), object.class_tsid);
		println!("  \"{}\" [label=\"{}\"]", object.tsid, dot_escape(&label));
	}
	for broken in &graph.dangling {
		println!("  \"{}\" [label=\"{}\\n(dangling)\", style=dashed]", broken.to, dot_escape(&broken.to));
	}
	for edge in &graph.edges {
		println!("  \"{}\" -> \"{}\" [label=\"{}\"]", edge.from, edge.to, dot_escape(&edge.path));
	}
	println!("}}");
}

fn print_json(roots: &[String], graph: &GraphResult) {
	let payload = GraphJson {
		roots: roots.to_vec(),
		truncated: truncation_value(graph.truncated).map(str::to_owned),
		objects: graph
			.objects
			.iter()
			.map(|object| NodeJson {
				tsid: object.tsid.to_string(),
				label: object.label.as_deref().map(str::to_owned),
				class_tsid: object.class_tsid.to_string(),
			})
			.collect(),
		edges: graph
			.edges
			.iter()
			.map(|edge| EdgeJson {
				from: edge.from.to_string(),
				path: edge.path.to_string(),
				to: edge.to.to_string(),
			})
			.collect(),
		dangling: graph
			.dangling
			.iter()
			.map(|broken| DanglingJson {
				from: broken.from.to_string(),
				path: broken.path.to_string(),
				to: broken.to.to_string(),
				reason: reason_label(&broken.reason).to_owned(),
			})
			.collect(),
	};
	emit_json(&payload);
}

fn truncation_label(value: Option<GraphTruncation>) -> &'static str {
	match value {
		Some(GraphTruncation::MaxObjects) => "max_objects",
		None => "none",
	}
}

fn truncation_value(value: Option<GraphTruncation>) -> Option<&'static str> {
	match value {
		Some(GraphTruncation::MaxObjects) => Some("max_objects"),
		None => None,
	}
}

fn reason_label(reason: &DanglingReason) -> String {
	match reason {
		DanglingReason::NotFound => "not found".to_owned(),
		DanglingReason::Invalid { detail } => detail.clone(),
	}
}

#[derive(serde::Serialize)]
struct GraphJson {
	roots: Vec<String>,
	truncated: Option<String>,
	objects: Vec<NodeJson>,
	edges: Vec<EdgeJson>,
	dangling: Vec<DanglingJson>,
}

#[derive(serde::Serialize)]
struct NodeJson {
	tsid: String,
	label: Option<String>,
	class_tsid: String,
}

#[derive(serde::Serialize)]
struct EdgeJson {
	from: String,
	path: String,
	to: String,
}

#[derive(serde::Serialize)]
struct DanglingJson {
	from: String,
	path: String,
	to: String,
	reason: String,
}
