//! Remote catalog client.
//!
//! Talks to the ComicVine-shaped metadata service: fetch one issue, fetch
//! one volume, or search volumes by filter. All requests are blocking and
//! happen strictly before any archive rewrite — the tagging core only ever
//! sees the plain record object this crate returns.
//!
//! Rate limiting (HTTP 429) is retried a bounded number of times with a
//! fixed wait; every other failure is surfaced as a typed error. The API
//! key is appended to each request and never logged.

mod client;
mod error;

pub use client::{CatalogClient, CatalogConfig, VolumeFilters};
pub use error::{CatalogError, Result};
