//! Canonical comic metadata schema for inktag.
//!
//! This crate defines the in-memory representation of the metadata record
//! embedded into comic archives ([`ComicInfoRecord`]) and the flat markup
//! codec used to persist it ([`markup`]).
//!
//! The record is an *ordered, open* field set: a fixed list of recognized
//! field names gets a stable canonical ordering when a document is built
//! fresh, but callers may attach arbitrary extra fields and they survive
//! serialization. Two invariants hold everywhere:
//!
//! - A field is present only if its value is non-empty after trimming.
//! - List-valued fields (credits, characters, genres, ...) are stored as a
//!   single comma-joined string, sorted case-insensitively and de-duplicated
//!   before joining (see [`join_names`]).

pub mod error;
pub mod fields;
pub mod markup;
mod record;

pub use error::{MarkupError, Result};
pub use record::{ComicInfoRecord, join_names};
