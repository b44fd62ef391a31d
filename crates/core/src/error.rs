//! Error taxonomy for tagging operations.

use std::path::PathBuf;

use inktag_archive::StoreError;
use thiserror::Error;

use crate::BoxError;

/// Errors that abort a tagging operation.
///
/// Input and source-record errors occur before the archive store is invoked
/// and therefore have no side effects. Store errors are fatal for the
/// operation but guarantee the original archive is untouched. Rename
/// problems are deliberately *not* here — they are reported as a non-fatal
/// [`crate::RenameOutcome`] on an otherwise successful operation.
#[derive(Debug, Error)]
pub enum TagError {
	/// The archive path is missing, not a file, or not a comic archive.
	#[error("invalid comic archive path {path}: {reason}")]
	InvalidPath {
		/// The offending path.
		path: PathBuf,
		/// Why it was rejected.
		reason: &'static str,
	},

	/// A local metadata file could not be read.
	#[error("failed to read metadata file {path}: {source}")]
	SourceFile {
		/// Path of the metadata file.
		path: PathBuf,
		/// The underlying I/O error.
		source: std::io::Error,
	},

	/// A local metadata file is not valid JSON.
	#[error("metadata file {path} is not valid JSON: {source}")]
	SourceJson {
		/// Path of the metadata file.
		path: PathBuf,
		/// The parse error.
		source: serde_json::Error,
	},

	/// A local metadata file parsed, but not to a JSON object.
	#[error("metadata file {path} must contain a JSON object")]
	SourceNotObject {
		/// Path of the metadata file.
		path: PathBuf,
	},

	/// A catalog lookup was requested but no catalog client is configured.
	#[error("catalog lookup requested but no catalog client is configured")]
	CatalogUnavailable,

	/// The catalog collaborator failed to produce an issue record.
	#[error("catalog lookup for issue {id} failed: {source}")]
	Catalog {
		/// The issue identifier that was looked up.
		id: i64,
		/// The collaborator's error.
		source: BoxError,
	},

	/// Mapping the source record produced no fields; nothing to write.
	#[error("source record mapped to an empty metadata record")]
	EmptyRecord,

	/// The archive store failed; the original file is untouched.
	#[error(transparent)]
	Store(#[from] StoreError),
}
