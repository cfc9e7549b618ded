use std::path::PathBuf;
use std::sync::Arc;

use glitchdoc::gob::{DirLoader, GameObject, ObjectStore, Result};

use crate::cmd::util::{find_player, object_label, open_corpus, ts_secs_label};

#[derive(clap::Args)]
pub struct Args {
	pub dir: PathBuf,
	#[arg(long)]
	pub player: Option<String>,
	#[arg(long)]
	pub skills: bool,
	#[arg(long)]
	pub achievements: bool,
	#[arg(long, default_value_t = 5)]
	pub recent: usize,
}

/// Print skill and achievement timelines for a player.
pub fn run(args: Args) -> Result<()> {
	let Args {
		dir,
		player,
		skills,
		achievements,
		recent,
	} = args;

	let (loader, store) = open_corpus(&dir);
	let player = find_player(&loader, &store, player.as_deref())?;
	println!("player: {} ({})", object_label(&player), player.tsid);

	// No flag selects both sections, matching the classic analyzer.
	let all = !skills && !achievements;

	if skills || all {
		print_section(&store, &player, "skills", recent);
	}
	if achievements || all {
		print_section(&store, &player, "achievements", recent);
	}

	Ok(())
}

fn print_section(store: &ObjectStore<DirLoader>, player: &Arc<GameObject>, key: &str, recent: usize) {
	println!("{key}:");
	match timeline_for(store, player, key) {
		Ok(entries) => {
			println!("  total: {}", entries.len());
			let start = entries.len().saturating_sub(recent);
			for (name, when) in &entries[start..] {
				println!("  {}: {}", ts_secs_label(*when), name);
			}
		}
		Err(err) => println!("  unavailable: {err}"),
	}
}

/// Collect `(name, epoch-seconds)` pairs from the referenced tracker object,
/// sorted by time. The tracker keeps one integer child per earned entry.
fn timeline_for(store: &ObjectStore<DirLoader>, player: &Arc<GameObject>, key: &str) -> Result<Vec<(String, i64)>> {
	let reference = player.at(key)?.as_ref()?;
	let tracker = store.get(&reference.tsid)?;
	let tree = tracker.at(key)?.as_tree()?;

	let mut entries: Vec<(String, i64)> = tree
		.iter()
		.filter_map(|entry| entry.value.as_int().ok().map(|when| (entry.key.to_string(), when)))
		.collect();
	entries.sort_by_key(|(_, when)| *when);
	Ok(entries)
}
