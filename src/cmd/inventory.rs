use std::path::PathBuf;

use glitchdoc::gob::Result;

use crate::cmd::util::{find_player, load_all, object_label, open_corpus};

#[derive(clap::Args)]
pub struct Args {
	pub dir: PathBuf,
	#[arg(long)]
	pub player: Option<String>,
}

/// List the player's bags and a sample of each bag's item references.
pub fn run(args: Args) -> Result<()> {
	let Args { dir, player } = args;

	let (loader, store) = open_corpus(&dir);
	let player = find_player(&loader, &store, player.as_deref())?;
	let (objects, _) = load_all(&loader, &store)?;

	let bags: Vec<_> = objects
		.iter()
		.filter(|object| object.container.as_deref() == Some(player.tsid.as_ref()) && object.class_tsid.starts_with("bag_"))
		.collect();

	println!("player: {} ({})", object_label(&player), player.tsid);
	println!("bags: {}", bags.len());

	for bag in bags {
		let items: Vec<_> = bag.references().filter(|record| record.path.as_ref() != "container").collect();
		println!("{} ({}):", object_label(bag), bag.class_tsid);
		println!("  items: {}", items.len());
		for record in items.iter().take(3) {
			println!("    - {}", record.label.as_deref().unwrap_or(record.target.as_ref()));
		}
		if items.len() > 3 {
			println!("    ... and {} more", items.len() - 3);
		}
	}

	Ok(())
}
