//! Source record → canonical metadata record mapping.
//!
//! The mapper is a pure transformation: given a source record and an
//! optional translation collaborator it produces a [`ComicInfoRecord`] and
//! touches nothing else. Translation is strictly limited to descriptive
//! text (title, series name, summary, deck, concept names); identifiers,
//! dates, URLs, and person/character names are never translated, and a
//! missing or failing translator degrades to the untranslated text with a
//! warning rather than an error.


use chrono::{Datelike, NaiveDate};
use inktag_schema::{ComicInfoRecord, join_names};
use serde_json::Value;

use crate::Translate;
use crate::request::SourceRecord;
use crate::text::strip_html;

/// Role keyword → canonical credit field.
///
/// Matched as case-insensitive substrings of the contributor's free-text
/// role string; one contributor can land in several fields.
const ROLE_TABLE: &[(&str, &str)] = &[
	("writer", "Writer"),
	("penciler", "Penciller"),
	("inker", "Inker"),
	("colorist", "Colorist"),
	("letterer", "Letterer"),
	("cover", "CoverArtist"),
	("artist", "Artist"),
	("editor", "Editor"),
	("plotter", "Writer"),
	("scripter", "Writer"),
];

/// Role fragments that push a contributor into the generic `Artist` bucket
/// when no specific art field matched.
const GENERIC_ART_TERMS: &[&str] = &["art", "colors", "letters", "pencils", "inks"];

/// The specific art fields that suppress the generic bucket.
const SPECIFIC_ART_FIELDS: &[&str] = &["Penciller", "Inker", "Colorist", "CoverArtist"];

/// Maps source records into canonical metadata records.
pub struct RecordMapper<'a> {
	translator: Option<&'a dyn Translate>,
	target_lang: Option<&'a str>,
}

impl<'a> RecordMapper<'a> {
	/// Creates a mapper without translation.
	pub fn new() -> Self {
		Self { translator: None, target_lang: None }
	}

	/// Enables translation of descriptive text into `target_lang`.
	///
	/// Passing `None` for either part disables translation; the combination
	/// "language requested, no translator" is handled softly by the caller.
	pub fn with_translation(
		translator: Option<&'a dyn Translate>,
		target_lang: Option<&'a str>,
	) -> Self {
		Self { translator, target_lang }
	}

	/// Maps a source record into a canonical record.
	///
	/// The output only ever contains fields whose trimmed value is
	/// non-empty.
	pub fn map(&self, source: &SourceRecord) -> ComicInfoRecord {
		match source {
			SourceRecord::Catalog(value) => self.map_catalog(value),
			SourceRecord::Flat(map) => map_flat(map),
		}
	}

	fn map_catalog(&self, issue: &Value) -> ComicInfoRecord {
		let mut record = ComicInfoRecord::new();

		if let Some(name) = text_field(issue, "name") {
			record.set("Title", self.translate_soft(&name, "Title"));
		}
		if let Some(number) = text_field(issue, "issue_number") {
			record.set("Number", number);
		}
		if let Some(url) = text_field(issue, "site_detail_url") {
			record.set("Web", url);
		}
		if let Some(aliases) = text_field(issue, "aliases") {
			record.append_note(&format!("Aliases:\n{}", strip_html(&aliases)));
		}

		let cover_date = text_field(issue, "cover_date");
		if let Some(raw) = cover_date.as_deref() {
			match decompose_date(raw) {
				Some(DateParts { year, month, day }) => {
					record.set("Year", year.to_string());
					if let Some(month) = month {
						record.set("Month", month.to_string());
					}
					if let Some(day) = day {
						record.set("Day", day.to_string());
					}
				}
				None => {
					tracing::warn!(date = raw, "could not parse cover date; leaving date fields empty");
				}
			}
		}
		if let Some(store_date) = text_field(issue, "store_date")
			&& cover_date.as_deref() != Some(store_date.as_str())
		{
			record.append_note(&format!("Store Date: {store_date}"));
		}

		if let Some(description) = text_field(issue, "description") {
			let cleaned = strip_html(&description);
			record.set("Summary", self.translate_soft(&cleaned, "Summary"));
		}
		if let Some(deck) = text_field(issue, "deck") {
			let cleaned = strip_html(&deck);
			let translated = self.translate_soft(&cleaned, "Deck");
			if !translated.trim().is_empty() {
				record.append_note(&format!("Deck (Summary): {translated}"));
			}
		}

		if let Some(volume) = issue.get("volume").filter(|v| v.is_object()) {
			if let Some(series) = text_field(volume, "name") {
				record.set("Series", self.translate_soft(&series, "Series"));
			}
			if let Some(publisher) = volume.get("publisher").filter(|v| v.is_object())
				&& let Some(name) = text_field(publisher, "name")
			{
				record.set("Publisher", name);
			}
			if let Some(count) = text_field(volume, "count_of_issues") {
				record.set("Count", count);
			}
			// Issue-level cover date always wins; the volume start year only
			// fills an absent Year.
			if let Some(start_year) = text_field(volume, "start_year")
				&& !record.contains("Year")
			{
				record.set("Year", start_year);
			}
		}

		self.map_person_credits(issue, &mut record);
		map_name_list(issue, "character_credits", "Characters", &mut record);
		map_name_list(issue, "team_credits", "Teams", &mut record);
		map_name_list(issue, "location_credits", "Locations", &mut record);
		map_name_list(issue, "story_arc_credits", "StoryArc", &mut record);
		self.fold_concepts_into_genre(issue, &mut record);

		if let Some(objects) = name_list(issue, "object_credits")
			&& let Some(joined) = join_names(&objects)
		{
			record.append_note(&format!("Objects: {joined}"));
		}

		if let (Some(_), Some(lang)) = (self.translator, self.target_lang)
			&& !record.contains("LanguageISO")
		{
			record.set("LanguageISO", lang);
		}

		record
	}

	fn map_person_credits(&self, issue: &Value, record: &mut ComicInfoRecord) {
		let Some(credits) = issue.get("person_credits").and_then(Value::as_array) else {
			return;
		};

		// Field → contributor names, in encounter order.
		let mut by_field: Vec<(&'static str, Vec<String>)> = Vec::new();
		let push = |field: &'static str, name: &str, by_field: &mut Vec<(&'static str, Vec<String>)>| {
			match by_field.iter_mut().find(|(f, _)| *f == field) {
				Some((_, names)) => names.push(name.to_string()),
				None => by_field.push((field, vec![name.to_string()])),
			}
		};

		for person in credits {
			let Some(name) = text_field(person, "name") else {
				continue;
			};
			let role = text_field(person, "role").unwrap_or_default().to_lowercase();

			let mut assigned: Vec<&'static str> = Vec::new();
			for &(keyword, field) in ROLE_TABLE {
				if role.contains(keyword) {
					push(field, &name, &mut by_field);
					assigned.push(field);
				}
			}
			let has_specific_art = assigned.iter().any(|f| SPECIFIC_ART_FIELDS.contains(f));
			if !has_specific_art && GENERIC_ART_TERMS.iter().any(|term| role.contains(term)) {
				push("Artist", &name, &mut by_field);
			}
		}

		for (field, names) in by_field {
			if let Some(joined) = join_names(&names) {
				record.set(field, joined);
			}
		}
	}

	fn fold_concepts_into_genre(&self, issue: &Value, record: &mut ComicInfoRecord) {
		let Some(concepts) = name_list(issue, "concept_credits") else {
			return;
		};
		let mut genres: Vec<String> = record
			.get("Genre")
			.map(|g| g.split(',').map(|s| s.trim().to_string()).collect())
			.unwrap_or_default();
		for concept in concepts {
			genres.push(self.translate_soft(&concept, "Genre"));
		}
		if let Some(joined) = join_names(&genres) {
			record.set("Genre", joined);
		}
	}

	/// Translates when both a translator and a target language are present;
	/// any failure keeps the original text.
	fn translate_soft(&self, value: &str, field: &'static str) -> String {
		let (Some(translator), Some(lang)) = (self.translator, self.target_lang) else {
			return value.to_string();
		};
		if value.trim().is_empty() {
			return value.to_string();
		}
		tracing::debug!(field, lang, "translating field");
		match translator.translate(value, lang) {
			Ok(translated) => translated,
			Err(error) => {
				tracing::warn!(field, error = %error, "translation failed; keeping original text");
				value.to_string()
			}
		}
	}
}

impl Default for RecordMapper<'_> {
	fn default() -> Self {
		Self::new()
	}
}

/// Maps a free-form flat JSON object: keys become field names, values are
/// coerced to their string form (nulls are skipped, nested values keep
/// their compact JSON rendering).
fn map_flat(map: &serde_json::Map<String, Value>) -> ComicInfoRecord {
	let mut record = ComicInfoRecord::new();
	for (key, value) in map {
		match value {
			Value::Null => {}
			Value::String(s) => record.set(key.clone(), s),
			other => record.set(key.clone(), other.to_string()),
		}
	}
	record
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DateParts {
	year: i32,
	month: Option<u32>,
	day: Option<u32>,
}

/// Decomposes a date string using the fixed recognized formats:
/// `YYYY-MM-DD[ HH:MM:SS]`, `YYYY-MM`, and `YYYY`.
fn decompose_date(raw: &str) -> Option<DateParts> {
	let head = raw.split(' ').next().unwrap_or(raw);
	let bytes = head.as_bytes();

	if head.len() == 10 && bytes[4] == b'-' && bytes[7] == b'-' {
		let date = NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()?;
		return Some(DateParts {
			year: date.year(),
			month: Some(date.month()),
			day: Some(date.day()),
		});
	}
	if head.len() == 7 && bytes[4] == b'-' {
		let year: i32 = head[..4].parse().ok()?;
		let month: u32 = head[5..7].parse().ok()?;
		NaiveDate::from_ymd_opt(year, month, 1)?;
		return Some(DateParts { year, month: Some(month), day: None });
	}
	if head.len() == 4 && head.chars().all(|c| c.is_ascii_digit()) {
		return Some(DateParts { year: head.parse().ok()?, month: None, day: None });
	}
	None
}

/// Reads a field as trimmed text, coercing numbers and booleans the way a
/// loosely typed source would render them. Returns `None` for empties.
fn text_field(value: &Value, key: &str) -> Option<String> {
	let field = value.get(key)?;
	let text = match field {
		Value::String(s) => s.trim().to_string(),
		Value::Number(n) => n.to_string(),
		Value::Bool(b) => b.to_string(),
		_ => return None,
	};
	if text.is_empty() { None } else { Some(text) }
}

/// Collects the `name` of every object in a list-valued field.
fn name_list(value: &Value, key: &str) -> Option<Vec<String>> {
	let items = value.get(key)?.as_array()?;
	let names: Vec<String> = items.iter().filter_map(|item| text_field(item, "name")).collect();
	if names.is_empty() { None } else { Some(names) }
}

fn map_name_list(issue: &Value, key: &str, field: &'static str, record: &mut ComicInfoRecord) {
	if let Some(names) = name_list(issue, key)
		&& let Some(joined) = join_names(&names)
	{
		record.set(field, joined);
	}
}
