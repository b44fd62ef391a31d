//! Error types for the markup codec.

use thiserror::Error;

/// Errors that can occur when parsing a metadata document.
#[derive(Debug, Error)]
pub enum MarkupError {
	/// The document ended in the middle of a construct.
	#[error("unexpected end of document")]
	UnexpectedEnd,

	/// The document does not start with a root element.
	#[error("missing root element")]
	MissingRoot,

	/// An element contains child elements; the schema is flat.
	#[error("element <{0}> contains nested markup")]
	NestedElement(String),

	/// A closing tag does not match the element it closes.
	#[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
	MismatchedClose {
		/// Name of the element being closed.
		expected: String,
		/// Name actually found in the closing tag.
		found: String,
	},

	/// A tag or entity is syntactically malformed.
	#[error("malformed markup near offset {0}")]
	Malformed(usize),
}

/// Result type for markup operations.
pub type Result<T> = std::result::Result<T, MarkupError>;
