use std::collections::HashMap;
use std::path::PathBuf;

use glitchdoc::gob::Result;

use crate::cmd::util::{class_group, emit_json, load_all, object_label, open_corpus, ts_millis_label};

#[derive(clap::Args)]
pub struct Args {
	pub dir: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print corpus-wide object statistics and the main player's surroundings.
pub fn run(args: Args) -> Result<()> {
	let Args { dir, json } = args;

	let (loader, store) = open_corpus(&dir);
	let (objects, failures) = load_all(&loader, &store)?;

	let mut counts: HashMap<&'static str, usize> = HashMap::new();
	for object in &objects {
		*counts.entry(class_group(&object.class_tsid)).or_insert(0) += 1;
	}
	let mut counts: Vec<(&'static str, usize)> = counts.into_iter().collect();
	counts.sort_by_key(|item| item.0);

	let player = objects.iter().find(|object| object.class_tsid.as_ref() == "human");
	let contained: Vec<_> = match player {
		Some(player) => objects.iter().filter(|object| object.container.as_deref() == Some(player.tsid.as_ref())).collect(),
		None => Vec::new(),
	};

	if json {
		let payload = SummaryJson {
			dir: dir.display().to_string(),
			total: objects.len(),
			counts: counts.iter().map(|(group, count)| CountJson { group, count: *count }).collect(),
			player: player.map(|player| PlayerJson {
				tsid: player.tsid.to_string(),
				label: player.label.as_deref().map(str::to_owned),
				last_update: ts_millis_label(player.ts),
				contained: contained.len(),
			}),
			failures: failures.iter().map(|(tsid, detail)| FailureJson { tsid, detail }).collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("dir: {}", dir.display());
	println!("objects: {}", objects.len());
	println!("failures: {}", failures.len());
	println!("breakdown:");
	for (group, count) in &counts {
		println!("  {group}: {count}");
	}

	if let Some(player) = player {
		println!("player: {} ({})", object_label(player), player.tsid);
		println!("player_last_update: {}", ts_millis_label(player.ts));
		println!("connected_objects: {}", contained.len());
		for object in contained.iter().take(5) {
			println!("  - {} ({})", object_label(object), object.class_tsid);
		}
		if contained.len() > 5 {
			println!("  ... and {} more", contained.len() - 5);
		}
	}

	for (tsid, detail) in &failures {
		println!("failed: {tsid}: {detail}");
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct SummaryJson<'a> {
	dir: String,
	total: usize,
	counts: Vec<CountJson>,
	player: Option<PlayerJson>,
	failures: Vec<FailureJson<'a>>,
}

#[derive(serde::Serialize)]
struct CountJson {
	group: &'static str,
	count: usize,
}

#[derive(serde::Serialize)]
struct PlayerJson {
	tsid: String,
	label: Option<String>,
	last_update: String,
	contained: usize,
}

#[derive(serde::Serialize)]
struct FailureJson<'a> {
	tsid: &'a str,
	detail: &'a str,
}
