use std::path::PathBuf;

use glitchdoc::gob::Result;

use crate::cmd::util::{emit_json, open_corpus};

#[derive(clap::Args)]
pub struct Args {
	pub dir: PathBuf,
	pub tsid: String,
	#[arg(long)]
	pub limit: Option<usize>,
	#[arg(long)]
	pub json: bool,
}

/// List an object's outgoing references with their property paths.
pub fn run(args: Args) -> Result<()> {
	let Args { dir, tsid, limit, json } = args;

	let (_, store) = open_corpus(&dir);
	let object = store.get(&tsid)?;

	let mut records: Vec<_> = object.references().collect();
	if let Some(max) = limit {
		records.truncate(max);
	}

	if json {
		let payload = RefsJson {
			tsid: object.tsid.to_string(),
			refs: records
				.iter()
				.map(|record| RefJson {
					path: record.path.to_string(),
					target: record.target.to_string(),
					label: record.label.as_deref().map(str::to_owned),
				})
				.collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("tsid: {}", object.tsid);
	println!("refs: {}", records.len());
	println!("path\ttarget\tlabel");
	for record in records {
		println!("{}\t{}\t{}", record.path, record.target, record.label.as_deref().unwrap_or("-"));
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct RefsJson {
	tsid: String,
	refs: Vec<RefJson>,
}

#[derive(serde::Serialize)]
struct RefJson {
	path: String,
	target: String,
	label: Option<String>,
}
