//! The archive metadata store.
//!
//! A comic archive is a ZIP container holding page images plus, optionally,
//! one reserved metadata entry (`ComicInfo.xml`, matched case-insensitively).
//! This crate owns that entry exclusively: it reads it, rewrites it (merging
//! with or replacing what was there), and erases it. Every other entry is
//! opaque payload and survives a rewrite byte-for-byte, including its
//! original compression.
//!
//! Rewrites are crash-safe. The new container is staged as a temporary
//! sibling file and swapped over the original with a single rename; until
//! that rename the original is the sole source of truth, and any failure
//! discards the staged file. There is no intermediate state in which the
//! original has been partially overwritten.

mod error;
mod store;

pub use error::{Result, StoreError};
pub use store::{EraseOutcome, METADATA_ENTRY, MergeMode, erase_record, read_record, write_record};
