use std::collections::BTreeMap;
use std::path::PathBuf;

/// File-backed translation response cache.
///
/// A plain JSON object of cache key → translated text. Loading tolerates a
/// missing or corrupt file (the cache starts empty with a warning); flushing
/// writes the whole map back. The owner decides when to flush — the
/// [`crate::Translator`] does so after every successful insert.
#[derive(Debug)]
pub struct TranslationCache {
	path: PathBuf,
	entries: BTreeMap<String, String>,
}

impl TranslationCache {
	/// Loads the cache from `path`, starting empty when the file is missing
	/// or unreadable.
	pub fn load(path: PathBuf) -> Self {
		let entries = match std::fs::read_to_string(&path) {
			Ok(text) => match serde_json::from_str(&text) {
				Ok(entries) => entries,
				Err(error) => {
					tracing::warn!(
						path = %path.display(),
						%error,
						"translation cache is corrupt; starting with an empty cache"
					);
					BTreeMap::new()
				}
			},
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
				tracing::debug!(path = %path.display(), "no translation cache file yet");
				BTreeMap::new()
			}
			Err(error) => {
				tracing::warn!(
					path = %path.display(),
					%error,
					"could not read translation cache; starting with an empty cache"
				);
				BTreeMap::new()
			}
		};
		Self { path, entries }
	}

	/// Creates an empty cache that will flush to `path`.
	pub fn empty(path: PathBuf) -> Self {
		Self { path, entries: BTreeMap::new() }
	}

	/// Looks up a cached translation.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries.get(key).map(String::as_str)
	}

	/// Stores a translation. Call [`TranslationCache::flush`] to persist.
	pub fn insert(&mut self, key: String, value: String) {
		self.entries.insert(key, value);
	}

	/// Number of cached entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true when nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Writes the cache back to its file.
	pub fn flush(&self) -> std::io::Result<()> {
		if let Some(parent) = self.path.parent()
			&& !parent.as_os_str().is_empty()
		{
			std::fs::create_dir_all(parent)?;
		}
		let json = serde_json::to_string_pretty(&self.entries).map_err(std::io::Error::other)?;
		std::fs::write(&self.path, json)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn round_trips_through_the_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("cache.json");

		let mut cache = TranslationCache::load(path.clone());
		assert!(cache.is_empty());
		cache.insert("key-1".to_string(), "wartość".to_string());
		cache.flush().unwrap();

		let reloaded = TranslationCache::load(path);
		assert_eq!(reloaded.len(), 1);
		assert_eq!(reloaded.get("key-1"), Some("wartość"));
	}

	#[test]
	fn corrupt_cache_files_start_empty() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("cache.json");
		std::fs::write(&path, b"{ not json").unwrap();

		let cache = TranslationCache::load(path);
		assert!(cache.is_empty());
	}

	#[test]
	fn flush_creates_missing_parent_directories() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested/dir/cache.json");

		let mut cache = TranslationCache::empty(path.clone());
		cache.insert("k".to_string(), "v".to_string());
		cache.flush().unwrap();

		assert!(path.is_file());
	}
}
