//! Error types for catalog requests.

use thiserror::Error;

/// Errors that can occur while talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
	/// No API key is configured; the service rejects anonymous requests.
	#[error("catalog API key is not configured")]
	MissingApiKey,

	/// The transport layer failed (connect, timeout, decode).
	#[error("catalog request failed: {0}")]
	Http(#[from] reqwest::Error),

	/// The service rejected the API key.
	#[error("catalog rejected the API key (HTTP 401)")]
	Unauthorized,

	/// The requested resource URL does not exist.
	#[error("catalog resource not found: {resource}")]
	NotFound {
		/// The resource path that was requested.
		resource: String,
	},

	/// The service reports the object itself does not exist.
	#[error("catalog has no record of the requested object")]
	ObjectNotFound,

	/// Rate limited and out of retries.
	#[error("catalog rate limit exceeded after {attempts} attempts")]
	RateLimited {
		/// Number of attempts made.
		attempts: u32,
	},

	/// An HTTP status the client does not handle.
	#[error("unexpected catalog HTTP status {0}")]
	Status(u16),

	/// The response envelope carried an application-level error.
	#[error("catalog API error: {message}")]
	Api {
		/// The error message from the envelope.
		message: String,
		/// The service's own status code, when present.
		status_code: Option<i64>,
	},

	/// A success envelope without a results payload.
	#[error("catalog response is missing the results payload")]
	MissingResults,
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
