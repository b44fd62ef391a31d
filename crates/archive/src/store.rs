use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use inktag_schema::{ComicInfoRecord, markup};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Result, StoreError};

/// Reserved name of the metadata entry.
///
/// Lookup is case-insensitive; a rewrite collapses any case variant into this
/// canonical spelling.
pub const METADATA_ENTRY: &str = "ComicInfo.xml";

/// How a write interacts with metadata already present in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
	/// Fields of the new record overwrite or extend the existing entry;
	/// fields not mentioned are left as found.
	#[default]
	Merge,
	/// The existing entry is discarded and rebuilt from the new record only.
	Overwrite,
}

/// Result of an erase operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseOutcome {
	/// The entry existed and the archive was rewritten without it.
	Erased,
	/// No entry was present; the archive was not touched.
	AlreadyAbsent,
}

/// Reads the metadata entry, if any.
///
/// A corrupted entry (bad encoding, malformed markup) is downgraded to
/// "absent" with a warning; only an unreadable container is an error.
pub fn read_record(path: &Path) -> Result<Option<ComicInfoRecord>> {
	let mut archive = open_archive(path)?;
	let Some(entry_name) = find_entry(&archive) else {
		return Ok(None);
	};

	let mut bytes = Vec::new();
	{
		let mut entry = archive.by_name(&entry_name).map_err(|source| StoreError::Archive {
			path: path.to_path_buf(),
			source,
		})?;
		entry.read_to_end(&mut bytes).map_err(|source| StoreError::Io {
			path: path.to_path_buf(),
			source,
		})?;
	}

	let text = String::from_utf8_lossy(&bytes);
	match markup::parse_document(&text) {
		Ok(record) => Ok(Some(record)),
		Err(err) => {
			tracing::warn!(
				path = %path.display(),
				error = %err,
				"existing metadata entry is corrupted; treating it as absent"
			);
			Ok(None)
		}
	}
}

/// Writes `record` into the archive's metadata entry.
///
/// In [`MergeMode::Merge`], an existing parseable entry is loaded first and
/// the new record is merged into it at the field level; its element order is
/// preserved. Otherwise (overwrite mode, no entry, or a corrupt entry) the
/// document is built fresh in canonical field order.
pub fn write_record(path: &Path, record: &ComicInfoRecord, mode: MergeMode) -> Result<()> {
	let existing = match mode {
		MergeMode::Merge => read_record(path)?,
		MergeMode::Overwrite => None,
	};

	let merged = match existing {
		Some(mut base) => {
			tracing::debug!(path = %path.display(), "merging into existing metadata entry");
			base.merge_from(record);
			base
		}
		None => {
			let mut fresh = record.clone();
			fresh.canonicalize();
			fresh
		}
	};

	let document = markup::to_document(&merged);
	rewrite(path, Some(document.as_bytes()))
}

/// Removes the metadata entry from the archive.
///
/// Succeeds without rewriting anything when the entry is already absent.
pub fn erase_record(path: &Path) -> Result<EraseOutcome> {
	let archive = open_archive(path)?;
	if find_entry(&archive).is_none() {
		tracing::debug!(path = %path.display(), "no metadata entry present; nothing to erase");
		return Ok(EraseOutcome::AlreadyAbsent);
	}
	drop(archive);

	rewrite(path, None)?;
	Ok(EraseOutcome::Erased)
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
	let file = File::open(path).map_err(|source| StoreError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	ZipArchive::new(file).map_err(|source| StoreError::Archive {
		path: path.to_path_buf(),
		source,
	})
}

fn find_entry(archive: &ZipArchive<File>) -> Option<String> {
	archive
		.file_names()
		.find(|name| name.eq_ignore_ascii_case(METADATA_ENTRY))
		.map(str::to_string)
}

/// Rebuilds the container next to the original and swaps it in atomically.
///
/// Every non-reserved entry is copied raw, in original order, keeping its
/// compression untouched. The metadata entry (when given) is written last.
/// The staged file lives in the archive's own directory so the final rename
/// never crosses a filesystem boundary.
fn rewrite(path: &Path, metadata: Option<&[u8]>) -> Result<()> {
	let mut source = open_archive(path)?;

	let parent = match path.parent() {
		Some(p) if !p.as_os_str().is_empty() => p,
		_ => Path::new("."),
	};
	let staged = tempfile::Builder::new()
		.prefix(".inktag-stage-")
		.suffix(".zip")
		.tempfile_in(parent)
		.map_err(|source| StoreError::Io {
			path: parent.to_path_buf(),
			source,
		})?;
	let staged_file = staged.reopen().map_err(|source| StoreError::Io {
		path: staged.path().to_path_buf(),
		source,
	})?;

	let mut writer = ZipWriter::new(staged_file);
	for index in 0..source.len() {
		let entry = source.by_index_raw(index).map_err(|source| StoreError::Archive {
			path: path.to_path_buf(),
			source,
		})?;
		if entry.name().eq_ignore_ascii_case(METADATA_ENTRY) {
			continue;
		}
		writer.raw_copy_file(entry).map_err(|source| StoreError::Stage {
			path: path.to_path_buf(),
			source,
		})?;
	}

	if let Some(bytes) = metadata {
		let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
		writer.start_file(METADATA_ENTRY, options).map_err(|source| StoreError::Stage {
			path: path.to_path_buf(),
			source,
		})?;
		writer.write_all(bytes).map_err(|source| StoreError::Io {
			path: staged.path().to_path_buf(),
			source,
		})?;
	}

	writer.finish().map_err(|source| StoreError::Stage {
		path: path.to_path_buf(),
		source,
	})?;

	staged.persist(path).map_err(|err| StoreError::Persist {
		path: path.to_path_buf(),
		source: err.error,
	})?;
	tracing::debug!(path = %path.display(), "archive rewritten in place");
	Ok(())
}
