//! Tagging engine for comic archives.
//!
//! This crate ties the schema and the archive store together:
//!
//! - [`request`]: the explicit request types describing one tagging
//!   operation (archive path, action, metadata source, merge mode, flags).
//! - [`mapper`]: the pure transformation from a source record (remote
//!   catalog shape or free-form JSON) into a [`inktag_schema::ComicInfoRecord`].
//! - [`filename`]: the pure filename deriver used for optional renaming.
//! - [`tagger`]: the orchestrator sequencing obtain → map → write → rename.
//!
//! External collaborators plug in through two seam traits: [`IssueLookup`]
//! (remote catalog) and [`Translate`] (optional text translation). Both are
//! resolved strictly before the archive store is invoked, so a failing
//! network collaborator can never leave an archive half-written.

pub mod filename;
pub mod mapper;
pub mod request;
pub mod tagger;
pub mod text;

mod error;

pub use error::TagError;
pub use inktag_archive::{EraseOutcome, MergeMode};
pub use mapper::RecordMapper;
pub use request::{MetadataSource, SourceRecord, TagAction, TagRequest};
pub use tagger::{RenameOutcome, TagOutcome, Tagger};

/// Boxed error type used at the collaborator seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Remote catalog collaborator: fetches one issue record by identifier.
///
/// The returned value is the plain issue record (the catalog envelope's
/// `results` object), consumed by the mapper as-is.
pub trait IssueLookup {
	/// Fetches the issue record for `issue_id`.
	fn fetch_issue(&self, issue_id: i64) -> Result<serde_json::Value, BoxError>;
}

/// Text translation collaborator.
///
/// Absence of this collaborator is never fatal: callers fall back to the
/// untranslated text and report the condition.
pub trait Translate {
	/// Translates `text` into the target language code.
	fn translate(&self, text: &str, target_lang: &str) -> Result<String, BoxError>;
}
