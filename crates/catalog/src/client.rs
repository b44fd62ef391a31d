use std::time::Duration;

use inktag_core::{BoxError, IssueLookup};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::{CatalogError, Result};

/// Resource prefix for issue identifiers in catalog URLs.
const ISSUE_PREFIX: &str = "4000-";
/// Resource prefix for volume identifiers in catalog URLs.
const VOLUME_PREFIX: &str = "4050-";

const VOLUME_FIELD_LIST: &str = "id,name,issues,people,publisher(id|name|site_detail_url),start_year,count_of_issues,description,image,date_last_updated,api_detail_url,site_detail_url";
const SEARCH_FIELD_LIST: &str = "id,name,publisher,start_year,count_of_issues,description,image,date_last_updated,api_detail_url,site_detail_url";

/// Connection settings for the catalog service.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
	/// Base API URL, with trailing slash.
	pub base_url: String,
	/// Per-user API key.
	pub api_key: String,
	/// User agent sent with every request.
	pub user_agent: String,
	/// Per-request timeout.
	pub timeout: Duration,
	/// Wait between attempts when rate limited.
	pub rate_limit_wait: Duration,
	/// Retries after the first rate-limited attempt.
	pub max_retries: u32,
}

impl Default for CatalogConfig {
	fn default() -> Self {
		Self {
			base_url: "https://comicvine.gamespot.com/api/".to_string(),
			api_key: String::new(),
			user_agent: concat!("inktag/", env!("CARGO_PKG_VERSION")).to_string(),
			timeout: Duration::from_secs(30),
			rate_limit_wait: Duration::from_secs(5),
			max_retries: 3,
		}
	}
}

/// Search criteria for [`CatalogClient::search_volumes`].
///
/// Name, author, and publisher go to the service as API filters; start year
/// and issue count are exact matches applied locally, and the series name is
/// additionally narrowed locally with a contains match (the API filter is
/// fuzzy).
#[derive(Debug, Clone, Default)]
pub struct VolumeFilters {
	/// Series name filter.
	pub series: Option<String>,
	/// Author/creator name filter.
	pub author: Option<String>,
	/// Publisher name filter.
	pub publisher: Option<String>,
	/// Exact start year.
	pub start_year: Option<i32>,
	/// Exact number of issues.
	pub issue_count: Option<i64>,
}

impl VolumeFilters {
	fn is_empty(&self) -> bool {
		self.series.is_none()
			&& self.author.is_none()
			&& self.publisher.is_none()
			&& self.start_year.is_none()
			&& self.issue_count.is_none()
	}
}

/// Blocking client for the remote catalog.
pub struct CatalogClient {
	config: CatalogConfig,
	http: Client,
}

impl CatalogClient {
	/// Builds a client from connection settings.
	pub fn new(config: CatalogConfig) -> Result<Self> {
		let http = Client::builder()
			.user_agent(config.user_agent.clone())
			.timeout(config.timeout)
			.build()?;
		Ok(Self { config, http })
	}

	/// Fetches the full record of one issue.
	pub fn issue(&self, issue_id: i64) -> Result<Value> {
		self.get(&format!("issue/{ISSUE_PREFIX}{issue_id}/"), &[])
	}

	/// Fetches one volume with the curated field list.
	pub fn volume(&self, volume_id: i64) -> Result<Value> {
		self.get(
			&format!("volume/{VOLUME_PREFIX}{volume_id}/"),
			&[("field_list", VOLUME_FIELD_LIST)],
		)
	}

	/// Searches volumes, applying local post-filters on top of the API's.
	pub fn search_volumes(&self, filters: &VolumeFilters) -> Result<Vec<Value>> {
		let mut api_filters: Vec<String> = Vec::new();
		if let Some(series) = &filters.series {
			api_filters.push(format!("name:{series}"));
		}
		if let Some(author) = &filters.author {
			// The person filter is broad: it matches any volume the person
			// is associated with.
			api_filters.push(format!("person:{author}"));
		}
		if let Some(publisher) = &filters.publisher {
			api_filters.push(format!("publisher:{publisher}"));
		}
		if filters.is_empty() {
			tracing::info!("no search criteria given; performing a broad volume search");
		}

		let filter_param = api_filters.join(",");
		let sort = if filters.series.is_some() || filters.author.is_some() {
			"date_last_updated:desc"
		} else {
			"name:asc"
		};
		let mut params: Vec<(&str, &str)> = vec![
			("field_list", SEARCH_FIELD_LIST),
			("limit", "100"),
			("sort", sort),
		];
		if !filter_param.is_empty() {
			params.push(("filter", filter_param.as_str()));
		}

		let results = self.get("volumes/", &params)?;
		let volumes = results.as_array().cloned().unwrap_or_default();
		Ok(volumes.into_iter().filter(|v| matches_local_filters(v, filters)).collect())
	}

	/// Performs one catalog GET, handling the envelope and rate limiting.
	fn get(&self, resource: &str, params: &[(&str, &str)]) -> Result<Value> {
		if self.config.api_key.is_empty() {
			return Err(CatalogError::MissingApiKey);
		}
		let url = format!("{}{}", self.config.base_url, resource);

		let mut attempts = 0;
		loop {
			attempts += 1;
			tracing::debug!(resource, attempt = attempts, "catalog request");
			let response = self
				.http
				.get(&url)
				.query(params)
				.query(&[("api_key", self.config.api_key.as_str()), ("format", "json")])
				.header(reqwest::header::ACCEPT, "application/json")
				.send()?;

			match response.status() {
				StatusCode::OK => {
					let envelope: Value = response.json()?;
					return decode_envelope(envelope);
				}
				StatusCode::UNAUTHORIZED => return Err(CatalogError::Unauthorized),
				StatusCode::NOT_FOUND => {
					return Err(CatalogError::NotFound { resource: resource.to_string() });
				}
				StatusCode::TOO_MANY_REQUESTS => {
					if attempts > self.config.max_retries {
						return Err(CatalogError::RateLimited { attempts });
					}
					tracing::warn!(
						resource,
						attempt = attempts,
						wait_secs = self.config.rate_limit_wait.as_secs(),
						"catalog rate limit hit; backing off"
					);
					std::thread::sleep(self.config.rate_limit_wait);
				}
				status => return Err(CatalogError::Status(status.as_u16())),
			}
		}
	}
}

impl IssueLookup for CatalogClient {
	fn fetch_issue(&self, issue_id: i64) -> std::result::Result<Value, BoxError> {
		Ok(self.issue(issue_id)?)
	}
}

/// Unwraps the service's `{error, status_code, results}` envelope.
fn decode_envelope(envelope: Value) -> Result<Value> {
	let error = envelope.get("error").and_then(Value::as_str).unwrap_or("Unknown API error");
	if error != "OK" {
		let status_code = envelope.get("status_code").and_then(Value::as_i64);
		if status_code == Some(101) {
			return Err(CatalogError::ObjectNotFound);
		}
		return Err(CatalogError::Api { message: error.to_string(), status_code });
	}
	envelope.get("results").cloned().ok_or(CatalogError::MissingResults)
}

fn matches_local_filters(volume: &Value, filters: &VolumeFilters) -> bool {
	if let Some(series) = &filters.series {
		let name = volume.get("name").and_then(Value::as_str).unwrap_or("");
		if !name.to_lowercase().contains(&series.to_lowercase()) {
			return false;
		}
	}
	if let Some(publisher) = &filters.publisher {
		let name = volume
			.get("publisher")
			.and_then(|p| p.get("name"))
			.and_then(Value::as_str)
			.unwrap_or("");
		if !name.to_lowercase().contains(&publisher.to_lowercase()) {
			return false;
		}
	}
	if let Some(start_year) = filters.start_year {
		let year = volume.get("start_year");
		let matches = match year {
			Some(Value::String(s)) => s.trim() == start_year.to_string(),
			Some(Value::Number(n)) => n.as_i64() == Some(i64::from(start_year)),
			_ => false,
		};
		if !matches {
			return false;
		}
	}
	if let Some(issue_count) = filters.issue_count {
		if volume.get("count_of_issues").and_then(Value::as_i64) != Some(issue_count) {
			return false;
		}
	}
	true
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	#[test]
	fn envelope_unwraps_results_on_ok() {
		let results = decode_envelope(json!({
			"error": "OK",
			"status_code": 1,
			"results": { "id": 48791 }
		}))
		.unwrap();
		assert_eq!(results, json!({ "id": 48791 }));
	}

	#[test]
	fn envelope_maps_object_not_found() {
		let err = decode_envelope(json!({
			"error": "Object Not Found",
			"status_code": 101
		}))
		.unwrap_err();
		assert!(matches!(err, CatalogError::ObjectNotFound));
	}

	#[test]
	fn envelope_surfaces_api_errors() {
		let err = decode_envelope(json!({
			"error": "Invalid API Key",
			"status_code": 100
		}))
		.unwrap_err();
		assert!(matches!(err, CatalogError::Api { status_code: Some(100), .. }));
	}

	#[test]
	fn envelope_without_results_is_an_error() {
		let err = decode_envelope(json!({ "error": "OK" })).unwrap_err();
		assert!(matches!(err, CatalogError::MissingResults));
	}

	#[test]
	fn local_filters_narrow_search_results() {
		let volume = json!({
			"name": "Watchmen",
			"publisher": { "name": "DC Comics" },
			"start_year": "1986",
			"count_of_issues": 12
		});

		let mut filters = VolumeFilters {
			series: Some("watch".to_string()),
			publisher: Some("dc".to_string()),
			start_year: Some(1986),
			issue_count: Some(12),
			..VolumeFilters::default()
		};
		assert!(matches_local_filters(&volume, &filters));

		filters.start_year = Some(1987);
		assert!(!matches_local_filters(&volume, &filters));

		filters.start_year = Some(1986);
		filters.series = Some("sandman".to_string());
		assert!(!matches_local_filters(&volume, &filters));
	}

	#[test]
	fn numeric_start_years_also_match() {
		let volume = json!({ "start_year": 1986 });
		let filters =
			VolumeFilters { start_year: Some(1986), ..VolumeFilters::default() };
		assert!(matches_local_filters(&volume, &filters));
	}
}
