//! Filename derivation from a metadata record.

use inktag_schema::ComicInfoRecord;

use crate::text::sanitize_filename;

/// Derives a suggested file name from a record.
///
/// Parts are concatenated in fixed order: sanitized Series, `V<Volume>`,
/// `#<Number>` (zero-padded to three digits for whole numbers), `(<Year>)`,
/// and `- <Title>` unless the title merely restates the series or the issue
/// number. Returns `None` when no part can be formed, in which case the
/// caller keeps the original name. Pure and idempotent.
pub fn derive_filename(record: &ComicInfoRecord, original_extension: &str) -> Option<String> {
	let mut parts: Vec<String> = Vec::new();

	if let Some(series) = record.get("Series") {
		let series = sanitize_filename(series);
		if !series.is_empty() {
			parts.push(series);
		}
	}
	if let Some(volume) = record.get("Volume") {
		let volume = sanitize_filename(volume);
		if !volume.is_empty() {
			parts.push(format!("V{volume}"));
		}
	}
	if let Some(number) = record.get("Number") {
		parts.push(format!("#{}", format_number(number)));
	}
	if let Some(year) = record.get("Year") {
		let year = sanitize_filename(year);
		if !year.is_empty() {
			parts.push(format!("({year})"));
		}
	}
	if let Some(title) = record.get("Title")
		&& !title_is_redundant(record, title)
	{
		let title = sanitize_filename(title);
		if !title.is_empty() {
			parts.push(format!("- {title}"));
		}
	}

	if parts.is_empty() {
		None
	} else {
		Some(format!("{}{}", parts.join(" "), original_extension))
	}
}

/// Whole numbers are zero-padded to three digits; anything else keeps its
/// literal (sanitized) form.
fn format_number(number: &str) -> String {
	match number.parse::<f64>() {
		Ok(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
			format!("{:03}", value as i64)
		}
		Ok(value) => value.to_string(),
		Err(_) => sanitize_filename(number),
	}
}

/// A title that restates the series name or the issue number adds nothing
/// to the filename.
fn title_is_redundant(record: &ComicInfoRecord, title: &str) -> bool {
	let title = title.to_lowercase();
	if let Some(series) = record.get("Series")
		&& title == series.to_lowercase()
	{
		return true;
	}
	if let Some(number) = record.get("Number") {
		let number = number.to_lowercase();
		if title == format!("#{number}") || title == format!("issue #{number}") {
			return true;
		}
	}
	false
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn record(pairs: &[(&str, &str)]) -> ComicInfoRecord {
		pairs.iter().copied().collect()
	}

	#[test]
	fn builds_the_full_form() {
		let rec = record(&[
			("Series", "Watchmen"),
			("Volume", "1"),
			("Number", "2"),
			("Year", "1986"),
			("Title", "Absent Friends"),
		]);
		assert_eq!(
			derive_filename(&rec, ".cbz").as_deref(),
			Some("Watchmen V1 #002 (1986) - Absent Friends.cbz")
		);
	}

	#[test]
	fn derivation_is_deterministic() {
		let rec = record(&[("Series", "Saga"), ("Number", "1")]);
		assert_eq!(derive_filename(&rec, ".cbz"), derive_filename(&rec, ".cbz"));
	}

	#[test]
	fn fractional_numbers_keep_their_literal_form() {
		let rec = record(&[("Series", "Saga"), ("Number", "2.5")]);
		assert_eq!(derive_filename(&rec, ".cbz").as_deref(), Some("Saga #2.5.cbz"));

		let rec = record(&[("Series", "Saga"), ("Number", "Annual 1")]);
		assert_eq!(derive_filename(&rec, ".cbz").as_deref(), Some("Saga #Annual 1.cbz"));
	}

	#[test]
	fn redundant_titles_are_omitted() {
		let rec = record(&[("Series", "Watchmen"), ("Number", "1"), ("Title", "watchmen")]);
		assert_eq!(derive_filename(&rec, ".cbz").as_deref(), Some("Watchmen #001.cbz"));

		let rec = record(&[("Series", "Watchmen"), ("Number", "1"), ("Title", "#1")]);
		assert_eq!(derive_filename(&rec, ".cbz").as_deref(), Some("Watchmen #001.cbz"));

		let rec = record(&[("Series", "Watchmen"), ("Number", "1"), ("Title", "Issue #1")]);
		assert_eq!(derive_filename(&rec, ".cbz").as_deref(), Some("Watchmen #001.cbz"));
	}

	#[test]
	fn empty_record_yields_no_suggestion() {
		assert_eq!(derive_filename(&ComicInfoRecord::new(), ".cbz"), None);
	}

	#[test]
	fn illegal_characters_are_sanitized_out() {
		let rec = record(&[("Series", "Batman: Year One"), ("Number", "1")]);
		assert_eq!(derive_filename(&rec, ".cbz").as_deref(), Some("Batman Year One #001.cbz"));
	}
}
