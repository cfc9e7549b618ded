#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "glitchdoc", about = "Glitch game-object archive inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Corpus overview: object counts, main player, load failures.
	Summary(cmd::summary::Args),
	/// Print one object's envelope and property tree.
	Show(cmd::show::Args),
	/// List outgoing references of one object.
	Refs(cmd::refs::Args),
	/// Resolve the reference graph from one or more roots.
	Graph(cmd::graph::Args),
	/// Skill and achievement timelines for a player.
	Progression(cmd::progression::Args),
	/// Player bags and their item lists.
	Inventory(cmd::inventory::Args),
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_writer(std::io::stderr)
		.init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> glitchdoc::gob::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Summary(args) => cmd::summary::run(args),
		Commands::Show(args) => cmd::show::run(args),
		Commands::Refs(args) => cmd::refs::run(args),
		Commands::Graph(args) => cmd::graph::run(args),
		Commands::Progression(args) => cmd::progression::run(args),
		Commands::Inventory(args) => cmd::inventory::run(args),
	}
}
