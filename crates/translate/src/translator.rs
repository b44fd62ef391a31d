use std::sync::Mutex;
use std::time::Duration;

use inktag_core::{BoxError, Translate};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::cache::TranslationCache;
use crate::error::{Result, TranslateError};

/// Connection and model settings for the translation service.
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
	/// Chat-completion endpoint URL.
	pub api_url: String,
	/// Bearer token for the service.
	pub api_key: String,
	/// Model identifier sent with each request.
	pub model: String,
	/// Language code the source text is written in.
	pub source_lang: String,
	/// Per-request timeout.
	pub timeout: Duration,
	/// Wait before retrying a failed request.
	pub retry_delay: Duration,
	/// Retries after the first failed attempt.
	pub max_retries: u32,
}

impl Default for TranslatorConfig {
	fn default() -> Self {
		Self {
			api_url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
			api_key: String::new(),
			model: "google/gemini-2.0-flash-001".to_string(),
			source_lang: "en".to_string(),
			timeout: Duration::from_secs(20),
			retry_delay: Duration::from_secs(5),
			max_retries: 1,
		}
	}
}

#[derive(Serialize)]
struct ChatRequest<'a> {
	model: &'a str,
	messages: [ChatMessage<'a>; 1],
	temperature: f32,
	max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
	role: &'static str,
	content: &'a str,
}

/// LLM-backed translator with a response cache.
///
/// The cache is consulted before any network call and updated (and flushed)
/// after each successful translation. A flush failure is logged but does not
/// fail the translation — the result is still correct, only uncached.
pub struct Translator {
	config: TranslatorConfig,
	http: Client,
	cache: Mutex<TranslationCache>,
}

impl Translator {
	/// Builds a translator around a loaded cache.
	pub fn new(config: TranslatorConfig, cache: TranslationCache) -> Result<Self> {
		let http = Client::builder().timeout(config.timeout).build()?;
		Ok(Self { config, http, cache: Mutex::new(cache) })
	}

	/// Translates `text` into `target_lang`, going through the cache.
	pub fn translate_text(&self, text: &str, target_lang: &str) -> Result<String> {
		if text.trim().is_empty() {
			return Ok(text.to_string());
		}
		if self.config.api_key.is_empty() {
			return Err(TranslateError::MissingApiKey);
		}

		let key = cache_key(text, &self.config.source_lang, target_lang, &self.config.model);
		if let Ok(cache) = self.cache.lock()
			&& let Some(hit) = cache.get(&key)
		{
			tracing::debug!(target_lang, "translation cache hit");
			return Ok(hit.to_string());
		}

		let source_name = language_name(&self.config.source_lang);
		let target_name = language_name(target_lang);
		tracing::info!(
			from = source_name,
			to = target_name,
			chars = text.len(),
			"requesting translation"
		);
		let translated = self.request_with_retry(&build_prompt(text, source_name, target_name))?;

		if let Ok(mut cache) = self.cache.lock() {
			cache.insert(key, translated.clone());
			if let Err(error) = cache.flush() {
				tracing::warn!(%error, "could not persist translation cache");
			}
		}
		Ok(translated)
	}

	fn request_with_retry(&self, prompt: &str) -> Result<String> {
		let mut last_error = TranslateError::EmptyResult;
		for attempt in 0..=self.config.max_retries {
			if attempt > 0 {
				tracing::warn!(attempt, "retrying translation request");
				std::thread::sleep(self.config.retry_delay);
			}
			match self.request_once(prompt) {
				Ok(translated) => return Ok(translated),
				Err(error) => {
					tracing::warn!(attempt, %error, "translation request failed");
					last_error = error;
				}
			}
		}
		Err(last_error)
	}

	fn request_once(&self, prompt: &str) -> Result<String> {
		let body = ChatRequest {
			model: &self.config.model,
			messages: [ChatMessage { role: "user", content: prompt }],
			temperature: 0.2,
			max_tokens: 1500,
		};
		let response = self
			.http
			.post(&self.config.api_url)
			.bearer_auth(&self.config.api_key)
			.header(reqwest::header::ACCEPT, "application/json")
			.json(&body)
			.send()?;

		let status = response.status();
		if !status.is_success() {
			return Err(TranslateError::Status(status.as_u16()));
		}

		let payload: Value = response.json()?;
		let content = payload
			.get("choices")
			.and_then(|c| c.get(0))
			.and_then(|c| c.get("message"))
			.and_then(|m| m.get("content"))
			.and_then(Value::as_str)
			.map(str::trim)
			.unwrap_or_default();
		if content.is_empty() {
			return Err(TranslateError::EmptyResult);
		}
		Ok(content.to_string())
	}
}

impl Translate for Translator {
	fn translate(&self, text: &str, target_lang: &str) -> std::result::Result<String, BoxError> {
		Ok(self.translate_text(text, target_lang)?)
	}
}

fn build_prompt(text: &str, source_name: &str, target_name: &str) -> String {
	format!(
		"You are an expert translator specializing in comic book and narrative content. \
		 Translate ONLY the following Description text, from {source_name} to {target_name}, \
		 preserving the original tone, style, and formatting. \
		 DO NOT add any summaries, explanations, notes, or comments. \
		 Return ONLY the translated Description text, nothing else. \
		 Here is the Description text:\n\n\"{text}\""
	)
}

/// Full language names for the codes the service handles well; unknown codes
/// pass through unchanged.
fn language_name(code: &str) -> &str {
	match code.to_lowercase().as_str() {
		"pl" => "Polish",
		"en" => "English",
		"de" => "German",
		"fr" => "French",
		"es" => "Spanish",
		_ => code,
	}
}

fn cache_key(text: &str, source: &str, target: &str, model: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(text.as_bytes());
	hasher.update(b"|");
	hasher.update(source.as_bytes());
	hasher.update(b"|");
	hasher.update(target.as_bytes());
	hasher.update(b"|");
	hasher.update(model.as_bytes());
	let digest = hasher.finalize();
	digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn cache_keys_are_stable_and_distinct() {
		let a = cache_key("text", "en", "pl", "model");
		let b = cache_key("text", "en", "pl", "model");
		let c = cache_key("text", "en", "de", "model");
		assert_eq!(a, b);
		assert_ne!(a, c);
		assert_eq!(a.len(), 64);
	}

	#[test]
	fn known_language_codes_expand_to_names() {
		assert_eq!(language_name("pl"), "Polish");
		assert_eq!(language_name("ES"), "Spanish");
		assert_eq!(language_name("ja"), "ja");
	}

	#[test]
	fn empty_text_short_circuits_without_a_key() {
		let translator = Translator::new(
			TranslatorConfig::default(),
			TranslationCache::empty("unused.json".into()),
		)
		.unwrap();
		assert_eq!(translator.translate_text("   ", "pl").unwrap(), "   ");
	}

	#[test]
	fn missing_api_key_is_reported() {
		let translator = Translator::new(
			TranslatorConfig::default(),
			TranslationCache::empty("unused.json".into()),
		)
		.unwrap();
		let err = translator.translate_text("some text", "pl").unwrap_err();
		assert!(matches!(err, TranslateError::MissingApiKey));
	}

	#[test]
	fn cached_entries_bypass_the_network() {
		let dir = tempfile::tempdir().unwrap();
		let mut cache = TranslationCache::empty(dir.path().join("cache.json"));
		let config = TranslatorConfig { api_key: "sk-test".to_string(), ..Default::default() };
		let key = cache_key("hello", &config.source_lang, "pl", &config.model);
		cache.insert(key, "cześć".to_string());

		let translator = Translator::new(config, cache).unwrap();
		assert_eq!(translator.translate_text("hello", "pl").unwrap(), "cześć");
	}
}
