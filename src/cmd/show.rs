use std::path::PathBuf;

use glitchdoc::gob::Result;

use crate::cmd::print::{print_tree, print_value, tree_to_json, value_to_json};
use crate::cmd::util::{emit_json, open_corpus, ts_millis_label};

#[derive(clap::Args)]
pub struct Args {
	pub dir: PathBuf,
	pub tsid: String,
	#[arg(long = "path")]
	pub path_expr: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Print one object's envelope and property tree, or a single path value.
pub fn run(args: Args) -> Result<()> {
	let Args { dir, tsid, path_expr, json } = args;

	let (_, store) = open_corpus(&dir);
	let object = store.get(&tsid)?;

	if let Some(path_expr) = path_expr {
		let value = object.at(&path_expr)?;
		if json {
			emit_json(&serde_json::json!({
				"tsid": object.tsid.as_ref(),
				"path": path_expr,
				"value": value_to_json(value),
			}));
			return Ok(());
		}
		print_value(&path_expr, value, 0);
		return Ok(());
	}

	if json {
		let payload = ShowJson {
			tsid: object.tsid.to_string(),
			label: object.label.as_deref().map(str::to_owned),
			class_tsid: object.class_tsid.to_string(),
			ts: object.ts,
			last_update: ts_millis_label(object.ts),
			container: object.container.as_deref().map(str::to_owned),
			position: object.position,
			props: tree_to_json(&object.props),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("tsid: {}", object.tsid);
	if let Some(label) = &object.label {
		println!("label: {label}");
	}
	println!("class: {}", object.class_tsid);
	println!("last_update: {}", ts_millis_label(object.ts));
	if let Some(container) = &object.container {
		println!("container: {container}");
	}
	match object.position {
		Some((x, y)) => println!("position: ({x}, {y})"),
		None => println!("position: unplaced"),
	}
	println!("props:");
	print_tree(&object.props, 1);

	Ok(())
}

#[derive(serde::Serialize)]
struct ShowJson {
	tsid: String,
	label: Option<String>,
	class_tsid: String,
	ts: i64,
	last_update: String,
	container: Option<String>,
	position: Option<(i64, i64)>,
	props: serde_json::Value,
}
