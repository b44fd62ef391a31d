use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "inktag")]
#[command(about = "Tag, inspect, and fetch metadata for comic archives")]
#[command(version)]
pub struct Cli {
	/// Configuration file (defaults to inktag/config.toml in the user
	/// config directory)
	#[arg(long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Tag a comic archive, or erase/show its embedded metadata
	Tag(TagArgs),
	/// Show the embedded metadata of one or more archives
	Check(CheckArgs),
	/// Query the remote catalog
	Fetch(FetchArgs),
}

/// Arguments for the `tag` subcommand.
#[derive(Args, Debug)]
pub struct TagArgs {
	/// Path to the .cbz comic archive
	#[arg(value_name = "COMIC_FILE")]
	pub comic_file: PathBuf,

	/// Catalog issue ID to fetch metadata from
	#[arg(long, value_name = "ISSUE_ID", conflicts_with_all = ["from_file", "erase", "check"])]
	pub issue_id: Option<i64>,

	/// JSON file with metadata to apply
	#[arg(long, value_name = "JSON_FILE", conflicts_with_all = ["erase", "check"])]
	pub from_file: Option<PathBuf>,

	/// Erase the embedded metadata entry
	#[arg(long, conflicts_with = "check")]
	pub erase: bool,

	/// Show the embedded metadata without modifying anything
	#[arg(long)]
	pub check: bool,

	/// Replace the existing metadata entry instead of merging into it
	#[arg(long)]
	pub overwrite_all: bool,

	/// Rename the file from the written metadata
	#[arg(long)]
	pub rename: bool,

	/// Translate descriptive text to this language code (e.g. pl, de)
	#[arg(long, value_name = "LANG")]
	pub translate: Option<String>,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
	/// Paths of .cbz files to inspect
	#[arg(value_name = "COMIC_FILE", required = true)]
	pub paths: Vec<PathBuf>,
}

/// Arguments for the `fetch` subcommand.
#[derive(Args, Debug)]
#[command(group = ArgGroup::new("mode").required(true).multiple(false))]
pub struct FetchArgs {
	/// Search for volumes using the filter options below
	#[arg(long, group = "mode")]
	pub search_volumes: bool,

	/// Fetch a specific volume by ID
	#[arg(long, value_name = "VOLUME_ID", group = "mode")]
	pub get_volume: Option<i64>,

	/// Fetch a specific issue by ID
	#[arg(long, value_name = "ISSUE_ID", group = "mode")]
	pub get_issue: Option<i64>,

	/// Filter volumes by series name
	#[arg(long, value_name = "NAME")]
	pub series: Option<String>,

	/// Filter volumes by author/creator name
	#[arg(long, value_name = "NAME")]
	pub author: Option<String>,

	/// Filter volumes by publisher name
	#[arg(long, value_name = "NAME")]
	pub publisher: Option<String>,

	/// Filter volumes by exact start year
	#[arg(long, value_name = "YYYY")]
	pub year: Option<i32>,

	/// Filter volumes by exact number of issues
	#[arg(long, value_name = "N")]
	pub num_issues: Option<i64>,

	/// Show all available detail for --get-issue
	#[arg(long, short = 'V')]
	pub verbose: bool,
}
