//! Subcommand handlers.

use inktag_catalog::{CatalogClient, VolumeFilters};
use inktag_core::{
	EraseOutcome, MergeMode, MetadataSource, RenameOutcome, TagAction, TagOutcome, TagRequest,
	Tagger,
};
use inktag_translate::{TranslationCache, Translator};

use crate::cli::{CheckArgs, FetchArgs, TagArgs};
use crate::config::Config;
use crate::display;

/// Runs the `tag` subcommand.
pub fn tag(args: TagArgs, config: &Config) -> anyhow::Result<()> {
	let action = build_action(&args)?;

	let catalog = if args.issue_id.is_some() {
		Some(CatalogClient::new(config.catalog_config())?)
	} else {
		None
	};
	let translator = match &args.translate {
		Some(lang) => {
			let translator_config = config.translator_config();
			if translator_config.api_key.is_empty() {
				tracing::warn!(
					lang = %lang,
					"translation requested but no translation API key is configured; proceeding without translation"
				);
				None
			} else {
				let cache = TranslationCache::load(config.translation_cache_path());
				Some(Translator::new(translator_config, cache)?)
			}
		}
		None => None,
	};

	let mut tagger = Tagger::new();
	if let Some(catalog) = &catalog {
		tagger = tagger.with_catalog(catalog);
	}
	if let Some(translator) = &translator {
		tagger = tagger.with_translator(translator);
	}

	let request = TagRequest { archive: args.comic_file.clone(), action };
	match tagger.run(&request)? {
		TagOutcome::Tagged { path, rename } => {
			println!("Tagged {}", path.display());
			report_rename(&rename);
		}
		TagOutcome::Erased(EraseOutcome::Erased) => {
			println!("Erased metadata from {}", args.comic_file.display());
		}
		TagOutcome::Erased(EraseOutcome::AlreadyAbsent) => {
			println!("No metadata entry in {}; nothing to erase.", args.comic_file.display());
		}
		TagOutcome::Inspected(record) => {
			display::print_record(&args.comic_file, record.as_ref());
		}
	}
	Ok(())
}

fn build_action(args: &TagArgs) -> anyhow::Result<TagAction> {
	if args.erase {
		return Ok(TagAction::Erase);
	}
	if args.check {
		return Ok(TagAction::Inspect);
	}
	let source = match (args.issue_id, &args.from_file) {
		(Some(id), None) => MetadataSource::CatalogIssue(id),
		(None, Some(path)) => MetadataSource::LocalFile(path.clone()),
		_ => anyhow::bail!(
			"specify a metadata source (--issue-id or --from-file), or use --erase / --check"
		),
	};
	let mode = if args.overwrite_all { MergeMode::Overwrite } else { MergeMode::Merge };
	Ok(TagAction::Apply {
		source,
		mode,
		rename: args.rename,
		translate_to: args.translate.clone(),
	})
}

fn report_rename(outcome: &RenameOutcome) {
	match outcome {
		RenameOutcome::NotRequested | RenameOutcome::Renamed { .. } => {}
		RenameOutcome::AlreadyNamed => println!("Filename already matches the metadata."),
		RenameOutcome::NoSuggestion => {
			println!("No filename could be derived; keeping the original name.");
		}
		RenameOutcome::TargetExists { target } => {
			println!("Rename skipped: {} already exists.", target.display());
		}
		RenameOutcome::Failed { error } => {
			println!("Rename failed ({error}); keeping the original name.");
		}
	}
}

/// Runs the `check` subcommand. Per-file problems are reported and skipped;
/// the command itself only fails on usage errors.
pub fn check(args: CheckArgs) -> anyhow::Result<()> {
	let tagger = Tagger::new();
	let mut processed = 0usize;
	let mut with_metadata = 0usize;

	for path in &args.paths {
		let is_cbz = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("cbz"));
		if !is_cbz {
			println!("Skipping non-cbz file: {}", path.display());
			continue;
		}
		let request = TagRequest { archive: path.clone(), action: TagAction::Inspect };
		match tagger.run(&request) {
			Ok(TagOutcome::Inspected(record)) => {
				processed += 1;
				if record.is_some() {
					with_metadata += 1;
				}
				display::print_record(path, record.as_ref());
			}
			Ok(_) => {}
			Err(error) => {
				tracing::error!(path = %path.display(), %error, "could not inspect archive");
			}
		}
	}

	println!("\nProcessed {processed} archive(s); {with_metadata} with embedded metadata.");
	Ok(())
}

/// Runs the `fetch` subcommand.
pub fn fetch(args: FetchArgs, config: &Config) -> anyhow::Result<()> {
	let client = CatalogClient::new(config.catalog_config())?;

	if let Some(issue_id) = args.get_issue {
		let issue = client.issue(issue_id)?;
		display::print_issue(&issue, args.verbose);
	} else if let Some(volume_id) = args.get_volume {
		let volume = client.volume(volume_id)?;
		display::print_volume(&volume);
	} else {
		let filters = VolumeFilters {
			series: args.series.clone(),
			author: args.author.clone(),
			publisher: args.publisher.clone(),
			start_year: args.year,
			issue_count: args.num_issues,
		};
		let volumes = client.search_volumes(&filters)?;
		display::print_volume_list(&volumes);
	}
	Ok(())
}
