mod cli;
mod commands;
mod config;
mod display;

use clap::Parser;
use cli::{Cli, Command};
use config::Config;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();

	let cli = Cli::parse();
	let config = Config::load(cli.config.as_deref())?;

	match cli.command {
		Command::Tag(args) => commands::tag(args, &config),
		Command::Check(args) => commands::check(args),
		Command::Fetch(args) => commands::fetch(args, &config),
	}
}
