//! The tagging orchestrator.
//!
//! Sequences one operation end to end: validate the archive path, obtain the
//! source record from its collaborator, map it, write it through the archive
//! store, and optionally rename the file from the written record. All
//! collaborator traffic (catalog fetch, translation) happens strictly before
//! the store is invoked.

use std::path::{Path, PathBuf};

use inktag_archive::{EraseOutcome, erase_record, read_record, write_record};
use inktag_schema::ComicInfoRecord;
use serde_json::Value;

use crate::error::TagError;
use crate::filename::derive_filename;
use crate::mapper::RecordMapper;
use crate::request::{MetadataSource, SourceRecord, TagAction, TagRequest};
use crate::{IssueLookup, Translate};

/// Result of a completed operation.
#[derive(Debug)]
pub enum TagOutcome {
	/// Metadata was written; `path` is the final (possibly renamed) path.
	Tagged {
		/// Where the archive lives now.
		path: PathBuf,
		/// What happened to the optional rename.
		rename: RenameOutcome,
	},
	/// The erase action completed.
	Erased(EraseOutcome),
	/// The inspect action completed; `None` means no metadata entry.
	Inspected(Option<ComicInfoRecord>),
}

/// What happened to a requested rename.
///
/// Every variant except `Renamed` leaves the file where it was; none of them
/// make the tagging operation itself fail.
#[derive(Debug)]
pub enum RenameOutcome {
	/// The request did not ask for a rename.
	NotRequested,
	/// The file was renamed to the derived name.
	Renamed {
		/// The new path.
		to: PathBuf,
	},
	/// The derived name already matches the current name.
	AlreadyNamed,
	/// No filename could be derived from the record.
	NoSuggestion,
	/// A file already exists at the derived target path.
	TargetExists {
		/// The occupied target path.
		target: PathBuf,
	},
	/// The rename itself failed.
	Failed {
		/// The underlying I/O error.
		error: std::io::Error,
	},
}

/// Orchestrates tagging operations against comic archives.
///
/// Collaborators are injected at construction; a `Tagger` without a catalog
/// client can still tag from local files, erase, and inspect.
#[derive(Default)]
pub struct Tagger<'a> {
	catalog: Option<&'a dyn IssueLookup>,
	translator: Option<&'a dyn Translate>,
}

impl<'a> Tagger<'a> {
	/// Creates a tagger with no collaborators.
	pub fn new() -> Self {
		Self::default()
	}

	/// Attaches a remote catalog client.
	pub fn with_catalog(mut self, catalog: &'a dyn IssueLookup) -> Self {
		self.catalog = Some(catalog);
		self
	}

	/// Attaches a translation collaborator.
	pub fn with_translator(mut self, translator: &'a dyn Translate) -> Self {
		self.translator = Some(translator);
		self
	}

	/// Runs one operation to completion.
	pub fn run(&self, request: &TagRequest) -> Result<TagOutcome, TagError> {
		validate_archive_path(&request.archive)?;

		match &request.action {
			TagAction::Inspect => Ok(TagOutcome::Inspected(read_record(&request.archive)?)),
			TagAction::Erase => {
				tracing::info!(path = %request.archive.display(), "erasing metadata entry");
				Ok(TagOutcome::Erased(erase_record(&request.archive)?))
			}
			TagAction::Apply { source, mode, rename, translate_to } => {
				let source_record = self.resolve_source(source)?;

				let target_lang = translate_to.as_deref();
				if target_lang.is_some() && self.translator.is_none() {
					tracing::warn!(
						"translation requested but no translator is configured; proceeding without translation"
					);
				}
				let mapper = RecordMapper::with_translation(self.translator, target_lang);
				let record = mapper.map(&source_record);
				if record.is_empty() {
					return Err(TagError::EmptyRecord);
				}

				write_record(&request.archive, &record, *mode)?;
				tracing::info!(
					path = %request.archive.display(),
					fields = record.len(),
					"metadata written"
				);

				let rename_outcome = if *rename {
					try_rename(&request.archive, &record)
				} else {
					RenameOutcome::NotRequested
				};
				let final_path = match &rename_outcome {
					RenameOutcome::Renamed { to } => to.clone(),
					_ => request.archive.clone(),
				};
				Ok(TagOutcome::Tagged { path: final_path, rename: rename_outcome })
			}
		}
	}

	fn resolve_source(&self, source: &MetadataSource) -> Result<SourceRecord, TagError> {
		match source {
			MetadataSource::CatalogIssue(id) => {
				let catalog = self.catalog.ok_or(TagError::CatalogUnavailable)?;
				tracing::info!(issue_id = id, "fetching issue record from catalog");
				let value = catalog
					.fetch_issue(*id)
					.map_err(|source| TagError::Catalog { id: *id, source })?;
				Ok(SourceRecord::Catalog(value))
			}
			MetadataSource::LocalFile(path) => {
				let text = std::fs::read_to_string(path).map_err(|source| TagError::SourceFile {
					path: path.clone(),
					source,
				})?;
				let value: Value =
					serde_json::from_str(&text).map_err(|source| TagError::SourceJson {
						path: path.clone(),
						source,
					})?;
				match value {
					Value::Object(map) => Ok(SourceRecord::Flat(map)),
					_ => Err(TagError::SourceNotObject { path: path.clone() }),
				}
			}
		}
	}
}

fn validate_archive_path(path: &Path) -> Result<(), TagError> {
	if !path.is_file() {
		return Err(TagError::InvalidPath {
			path: path.to_path_buf(),
			reason: "not an existing file",
		});
	}
	let is_cbz = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("cbz"));
	if !is_cbz {
		return Err(TagError::InvalidPath {
			path: path.to_path_buf(),
			reason: "expected a .cbz archive",
		});
	}
	Ok(())
}

/// Attempts the post-tag rename. Never fails the operation.
fn try_rename(path: &Path, record: &ComicInfoRecord) -> RenameOutcome {
	let extension = path
		.extension()
		.map(|ext| format!(".{}", ext.to_string_lossy()))
		.unwrap_or_default();
	let Some(base_name) = derive_filename(record, &extension) else {
		tracing::info!(path = %path.display(), "no filename suggestion; keeping original name");
		return RenameOutcome::NoSuggestion;
	};

	let target = path.with_file_name(&base_name);
	let unchanged = path
		.file_name()
		.map(|current| current.to_string_lossy().eq_ignore_ascii_case(&base_name))
		.unwrap_or(false);
	if unchanged {
		tracing::debug!(path = %path.display(), "derived name matches current name");
		return RenameOutcome::AlreadyNamed;
	}
	if target.exists() {
		tracing::warn!(target = %target.display(), "rename skipped: target already exists");
		return RenameOutcome::TargetExists { target };
	}

	match std::fs::rename(path, &target) {
		Ok(()) => {
			tracing::info!(from = %path.display(), to = %target.display(), "archive renamed");
			RenameOutcome::Renamed { to: target }
		}
		Err(error) => {
			tracing::warn!(path = %path.display(), error = %error, "rename failed; keeping original name");
			RenameOutcome::Failed { error }
		}
	}
}
