//! TOML configuration for the CLI.
//!
//! Looked up at `<config_dir>/inktag/config.toml` unless a path is given on
//! the command line. A missing default file just yields defaults; a file
//! that exists but fails to parse is a fatal input error. Secrets can also
//! come from the environment (`INKTAG_CV_API_KEY`,
//! `INKTAG_OPENROUTER_API_KEY`, `INKTAG_USER_AGENT`), which wins over the
//! file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use inktag_catalog::CatalogConfig;
use inktag_translate::TranslatorConfig;
use serde::Deserialize;

/// Parsed configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Remote catalog settings.
	pub catalog: CatalogSection,
	/// Translation service settings.
	pub translation: TranslationSection,
}

/// The `[catalog]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
	/// API key for the catalog service.
	pub api_key: Option<String>,
	/// Base API URL override.
	pub base_url: Option<String>,
	/// User agent override.
	pub user_agent: Option<String>,
	/// Request timeout in seconds.
	pub timeout_secs: Option<u64>,
	/// Wait between rate-limited attempts, in seconds.
	pub rate_limit_wait_secs: Option<u64>,
	/// Retries after the first rate-limited attempt.
	pub max_retries: Option<u32>,
}

/// The `[translation]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TranslationSection {
	/// API key for the translation service.
	pub api_key: Option<String>,
	/// Chat-completion endpoint override.
	pub api_url: Option<String>,
	/// Model identifier override.
	pub model: Option<String>,
	/// Language code the source text is written in.
	pub source_lang: Option<String>,
	/// Where the translation cache file lives.
	pub cache_path: Option<PathBuf>,
}

impl Config {
	/// Loads configuration from `path`, or from the default location.
	///
	/// An explicitly given path must exist; the default location is allowed
	/// to be absent.
	pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
		let (path, required) = match path {
			Some(p) => (Some(p.to_path_buf()), true),
			None => (default_path(), false),
		};
		let Some(path) = path else {
			return Ok(Self::default());
		};
		if !path.exists() {
			if required {
				anyhow::bail!("configuration file not found: {}", path.display());
			}
			tracing::debug!(path = %path.display(), "no configuration file; using defaults");
			return Ok(Self::default());
		}

		let text = std::fs::read_to_string(&path)
			.with_context(|| format!("failed to read configuration file {}", path.display()))?;
		let config: Self = toml::from_str(&text)
			.with_context(|| format!("invalid configuration file {}", path.display()))?;
		tracing::debug!(path = %path.display(), "configuration loaded");
		Ok(config)
	}

	/// Resolves the catalog connection settings.
	pub fn catalog_config(&self) -> CatalogConfig {
		let mut config = CatalogConfig::default();
		if let Some(key) = env_or(&self.catalog.api_key, "INKTAG_CV_API_KEY") {
			config.api_key = key;
		}
		if let Some(url) = self.catalog.base_url.clone() {
			config.base_url = url;
		}
		if let Some(agent) = env_or(&self.catalog.user_agent, "INKTAG_USER_AGENT") {
			config.user_agent = agent;
		}
		if let Some(secs) = self.catalog.timeout_secs {
			config.timeout = Duration::from_secs(secs);
		}
		if let Some(secs) = self.catalog.rate_limit_wait_secs {
			config.rate_limit_wait = Duration::from_secs(secs);
		}
		if let Some(retries) = self.catalog.max_retries {
			config.max_retries = retries;
		}
		config
	}

	/// Resolves the translator settings.
	pub fn translator_config(&self) -> TranslatorConfig {
		let mut config = TranslatorConfig::default();
		if let Some(key) = env_or(&self.translation.api_key, "INKTAG_OPENROUTER_API_KEY") {
			config.api_key = key;
		}
		if let Some(url) = self.translation.api_url.clone() {
			config.api_url = url;
		}
		if let Some(model) = self.translation.model.clone() {
			config.model = model;
		}
		if let Some(lang) = self.translation.source_lang.clone() {
			config.source_lang = lang;
		}
		config
	}

	/// Where the translation cache file lives.
	pub fn translation_cache_path(&self) -> PathBuf {
		self.translation.cache_path.clone().unwrap_or_else(|| {
			dirs::cache_dir()
				.unwrap_or_else(|| PathBuf::from("."))
				.join("inktag/translation_cache.json")
		})
	}
}

fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("inktag/config.toml"))
}

/// Environment variable wins over the file value.
fn env_or(file_value: &Option<String>, var: &str) -> Option<String> {
	std::env::var(var).ok().filter(|v| !v.is_empty()).or_else(|| file_value.clone())
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn parses_a_full_configuration_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		std::fs::write(
			&path,
			r#"
[catalog]
api_key = "abc123"
timeout_secs = 10
max_retries = 1

[translation]
model = "some/model"
cache_path = "/tmp/cache.json"
"#,
		)
		.unwrap();

		let config = Config::load(Some(&path)).unwrap();
		let catalog = config.catalog_config();
		assert_eq!(catalog.timeout, Duration::from_secs(10));
		assert_eq!(catalog.max_retries, 1);
		let translator = config.translator_config();
		assert_eq!(translator.model, "some/model");
		assert_eq!(config.translation_cache_path(), PathBuf::from("/tmp/cache.json"));
	}

	#[test]
	fn missing_explicit_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
	}

	#[test]
	fn malformed_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		std::fs::write(&path, "not [valid toml").unwrap();
		assert!(Config::load(Some(&path)).is_err());
	}

	#[test]
	fn empty_sections_fall_back_to_defaults() {
		let config = Config::default();
		let catalog = config.catalog_config();
		assert!(catalog.base_url.starts_with("https://"));
	}
}
