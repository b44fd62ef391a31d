use indexmap::IndexMap;

use crate::fields;

/// An ordered, open set of metadata fields.
///
/// Field order is significant: it is the order elements are written when the
/// record is serialized. A record parsed from an existing document keeps that
/// document's order; a record built fresh should be passed through
/// [`ComicInfoRecord::canonicalize`] before serialization.
///
/// Empty values cannot exist in a record: [`ComicInfoRecord::set`] trims its
/// input and drops the field when nothing remains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComicInfoRecord {
	fields: IndexMap<String, String>,
}

impl ComicInfoRecord {
	/// Creates an empty record.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets a field, trimming the value first.
	///
	/// An empty-after-trim value removes the field instead. When the field
	/// already exists its position is kept; new fields append.
	pub fn set(&mut self, name: impl Into<String>, value: impl AsRef<str>) {
		let name = name.into();
		let value = value.as_ref().trim();
		if value.is_empty() {
			self.fields.shift_remove(&name);
		} else {
			self.fields.insert(name, value.to_string());
		}
	}

	/// Returns the value of a field, if present.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.fields.get(name).map(String::as_str)
	}

	/// Returns true if the field is present (and therefore non-empty).
	pub fn contains(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	/// Number of fields present.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Returns true if no fields are present.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Iterates fields in record order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Appends a labeled paragraph to the `Notes` field.
	///
	/// Paragraphs are separated by a single newline; the first paragraph
	/// creates the field.
	pub fn append_note(&mut self, paragraph: &str) {
		let paragraph = paragraph.trim();
		if paragraph.is_empty() {
			return;
		}
		match self.fields.get_mut("Notes") {
			Some(notes) => {
				notes.push('\n');
				notes.push_str(paragraph);
			}
			None => self.set("Notes", paragraph),
		}
	}

	/// Merges `other` into `self` at the field level.
	///
	/// Every field of `other` overwrites or inserts into `self`; fields not
	/// mentioned in `other` keep their value and position. This is the pure
	/// replacement for in-place document editing: parse, merge, serialize.
	pub fn merge_from(&mut self, other: &ComicInfoRecord) {
		for (name, value) in other.iter() {
			self.set(name, value);
		}
	}

	/// Reorders fields into canonical order.
	///
	/// Recognized fields come first in the fixed canonical order; any extra
	/// fields follow in their existing relative order. Only freshly built
	/// documents are canonicalized — a merged document keeps the order found
	/// on disk.
	pub fn canonicalize(&mut self) {
		let mut ordered = IndexMap::with_capacity(self.fields.len());
		for name in fields::CANONICAL_ORDER {
			if let Some(value) = self.fields.shift_remove(*name) {
				ordered.insert(name.to_string(), value);
			}
		}
		for (name, value) in self.fields.drain(..) {
			ordered.insert(name, value);
		}
		self.fields = ordered;
	}
}

impl<S: Into<String>, V: AsRef<str>> FromIterator<(S, V)> for ComicInfoRecord {
	fn from_iter<T: IntoIterator<Item = (S, V)>>(iter: T) -> Self {
		let mut record = Self::new();
		for (name, value) in iter {
			record.set(name, value);
		}
		record
	}
}

/// Flattens a list of names into the canonical comma-joined form.
///
/// Names are de-duplicated by exact match, sorted case-insensitively, and
/// joined with `", "`. Returns `None` when nothing remains after trimming.
pub fn join_names<I, S>(names: I) -> Option<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut seen: Vec<String> = Vec::new();
	for name in names {
		let name = name.as_ref().trim();
		if name.is_empty() || seen.iter().any(|s| s == name) {
			continue;
		}
		seen.push(name.to_string());
	}
	if seen.is_empty() {
		return None;
	}
	seen.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
	Some(seen.join(", "))
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn set_drops_empty_values() {
		let mut record = ComicInfoRecord::new();
		record.set("Title", "  ");
		assert!(record.is_empty());

		record.set("Title", " Watchmen ");
		assert_eq!(record.get("Title"), Some("Watchmen"));

		record.set("Title", "");
		assert!(!record.contains("Title"));
	}

	#[test]
	fn merge_overwrites_and_appends_without_reordering() {
		let mut existing: ComicInfoRecord =
			[("Notes", "keep"), ("Title", "Old"), ("Series", "S")].into_iter().collect();
		let incoming: ComicInfoRecord = [("Title", "New"), ("Year", "1986")].into_iter().collect();

		existing.merge_from(&incoming);

		let order: Vec<_> = existing.iter().map(|(k, _)| k).collect();
		assert_eq!(order, vec!["Notes", "Title", "Series", "Year"]);
		assert_eq!(existing.get("Title"), Some("New"));
		assert_eq!(existing.get("Notes"), Some("keep"));
	}

	#[test]
	fn canonicalize_orders_recognized_fields_first() {
		let mut record: ComicInfoRecord = [
			("MyCustomField", "x"),
			("Year", "1986"),
			("Title", "Watchmen #1"),
			("AnotherExtra", "y"),
		]
		.into_iter()
		.collect();

		record.canonicalize();

		let order: Vec<_> = record.iter().map(|(k, _)| k).collect();
		assert_eq!(order, vec!["Title", "Year", "MyCustomField", "AnotherExtra"]);
	}

	#[test]
	fn join_names_sorts_case_insensitively_and_dedups() {
		let joined = join_names(["alan Moore", "Dave Gibbons", "alan Moore", "  "]);
		assert_eq!(joined.as_deref(), Some("alan Moore, Dave Gibbons"));
		assert_eq!(join_names(Vec::<&str>::new()), None);
	}

	#[test]
	fn append_note_builds_paragraphs() {
		let mut record = ComicInfoRecord::new();
		record.append_note("Aliases:\nNight Owl");
		record.append_note("Store Date: 1986-09-05");
		assert_eq!(record.get("Notes"), Some("Aliases:\nNight Owl\nStore Date: 1986-09-05"));
	}
}
