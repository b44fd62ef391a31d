//! Error types for the translation collaborator.

use thiserror::Error;

/// Errors that can occur while translating text.
///
/// Callers at the mapping layer treat all of these as soft: the untranslated
/// text is used and the condition is logged.
#[derive(Debug, Error)]
pub enum TranslateError {
	/// No API key is configured.
	#[error("translation API key is not configured")]
	MissingApiKey,

	/// The transport layer failed (connect, timeout, decode).
	#[error("translation request failed: {0}")]
	Http(#[from] reqwest::Error),

	/// The service answered with an HTTP error status.
	#[error("unexpected translation HTTP status {0}")]
	Status(u16),

	/// The service returned no usable content.
	#[error("translation service returned an empty result")]
	EmptyResult,
}

/// Result type for translation operations.
pub type Result<T> = std::result::Result<T, TranslateError>;
