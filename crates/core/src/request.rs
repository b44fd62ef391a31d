//! Explicit request types for one tagging operation.
//!
//! One `TagRequest` describes everything the orchestrator needs; nothing is
//! read from ambient state and nothing is persisted.

use std::path::PathBuf;

use inktag_archive::MergeMode;

/// A single tagging operation against one archive.
#[derive(Debug, Clone)]
pub struct TagRequest {
	/// Path of the comic archive to operate on.
	pub archive: PathBuf,
	/// What to do with it.
	pub action: TagAction,
}

/// The action to perform.
#[derive(Debug, Clone)]
pub enum TagAction {
	/// Map a source record and write it into the archive.
	Apply {
		/// Where the source record comes from.
		source: MetadataSource,
		/// Merge with or overwrite existing metadata.
		mode: MergeMode,
		/// Rename the archive from the written record afterwards.
		rename: bool,
		/// Target language code for optional translation.
		translate_to: Option<String>,
	},
	/// Remove the metadata entry.
	Erase,
	/// Read the metadata entry without modifying anything.
	Inspect,
}

/// Where the source record for an apply action comes from.
#[derive(Debug, Clone)]
pub enum MetadataSource {
	/// Fetch the issue record from the remote catalog.
	CatalogIssue(i64),
	/// Read a flat key/value JSON object from a local file.
	LocalFile(PathBuf),
}

/// A source record with its provenance.
///
/// The mapper treats the two shapes differently: catalog records have the
/// nested issue/volume structure of the remote service, local records are
/// flat field maps whose values are coerced to strings.
#[derive(Debug, Clone)]
pub enum SourceRecord {
	/// A remote catalog issue record.
	Catalog(serde_json::Value),
	/// A free-form flat JSON object.
	Flat(serde_json::Map<String, serde_json::Value>),
}
