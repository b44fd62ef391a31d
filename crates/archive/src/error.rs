//! Error types for archive metadata operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or rewriting an archive.
///
/// Every error leaves the original archive untouched: failures before the
/// final swap only ever affect the staged temporary file, which is discarded.
#[derive(Debug, Error)]
pub enum StoreError {
	/// The file is not a readable ZIP container.
	#[error("not a valid comic archive {path}: {source}")]
	Archive {
		/// Path of the archive.
		path: PathBuf,
		/// Underlying container error.
		source: zip::result::ZipError,
	},

	/// An I/O operation on the archive or its staging file failed.
	#[error("I/O error on {path}: {source}")]
	Io {
		/// Path the operation touched.
		path: PathBuf,
		/// The underlying I/O error.
		source: std::io::Error,
	},

	/// Writing an entry into the staged container failed.
	#[error("failed to stage rewrite of {path}: {source}")]
	Stage {
		/// Path of the archive being rewritten.
		path: PathBuf,
		/// Underlying container error.
		source: zip::result::ZipError,
	},

	/// The atomic swap of the staged container over the original failed.
	#[error("failed to replace {path} with staged archive: {source}")]
	Persist {
		/// Path of the archive being replaced.
		path: PathBuf,
		/// The rename error; the temporary file is cleaned up on drop.
		source: std::io::Error,
	},
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
