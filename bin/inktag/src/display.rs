//! Plain-text rendering of records and catalog results.
//!
//! Everything here goes to stdout; diagnostics go through `tracing` to
//! stderr so the data output stays pipeable.

use std::path::Path;

use inktag_core::text::strip_html;
use inktag_schema::ComicInfoRecord;
use serde_json::Value;

const LABEL_WIDTH: usize = 18;

/// Fields shown as single lines, with display labels, in display order.
const FIELD_LABELS: &[(&str, &str)] = &[
	("Title", "Title"),
	("Series", "Series"),
	("Number", "Number"),
	("Volume", "Volume"),
	("Count", "Count"),
	("Publisher", "Publisher"),
	("Imprint", "Imprint"),
	("Year", "Year"),
	("Month", "Month"),
	("Day", "Day"),
	("Writer", "Writer(s)"),
	("Penciller", "Penciller(s)"),
	("Inker", "Inker(s)"),
	("Colorist", "Colorist(s)"),
	("Letterer", "Letterer(s)"),
	("CoverArtist", "Cover Artist(s)"),
	("Editor", "Editor(s)"),
	("Artist", "Artist(s)"),
	("Genre", "Genre(s)"),
	("Characters", "Character(s)"),
	("Teams", "Team(s)"),
	("Locations", "Location(s)"),
	("StoryArc", "Story Arc(s)"),
	("SeriesGroup", "Series Group"),
	("Format", "Format"),
	("AgeRating", "Age Rating"),
	("LanguageISO", "Language"),
	("PageCount", "Page Count"),
	("BlackAndWhite", "B&W"),
	("Manga", "Manga"),
	("ScanInformation", "Scan Info"),
	("Web", "Web URL"),
];

/// Fields rendered as an indented text block rather than one line.
const BLOCK_FIELDS: &[(&str, &str)] = &[("Summary", "Summary"), ("Notes", "Notes")];

fn line(label: &str, value: &str) {
	println!("{:<LABEL_WIDTH$} {value}", format!("{label}:"));
}

fn block(label: &str, value: &str) {
	println!("{label}:");
	for text_line in value.lines() {
		println!("  {text_line}");
	}
}

/// Prints one archive's embedded metadata.
pub fn print_record(path: &Path, record: Option<&ComicInfoRecord>) {
	println!("\n=== {} ===", path.display());
	let Some(record) = record else {
		println!("(no embedded metadata)");
		return;
	};

	for (field, label) in FIELD_LABELS {
		if let Some(value) = record.get(field) {
			line(label, value);
		}
	}
	for (field, label) in BLOCK_FIELDS {
		if let Some(value) = record.get(field) {
			block(label, value);
		}
	}
	// Anything the canonical tables do not know about.
	let shown = |name: &str| {
		FIELD_LABELS.iter().any(|(f, _)| *f == name)
			|| BLOCK_FIELDS.iter().any(|(f, _)| *f == name)
	};
	for (name, value) in record.iter().filter(|(name, _)| !shown(name)) {
		line(name, value);
	}
}

fn text_of<'v>(value: &'v Value, key: &str) -> Option<&'v str> {
	value.get(key).and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

fn display_of(value: &Value, key: &str) -> Option<String> {
	match value.get(key)? {
		Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}

/// Prints a fetched issue record.
pub fn print_issue(issue: &Value, verbose: bool) {
	let title = text_of(issue, "name")
		.map(str::to_string)
		.or_else(|| display_of(issue, "issue_number").map(|n| format!("Issue #{n}")))
		.unwrap_or_else(|| "Issue".to_string());
	println!("\n=== {title} ===");

	if let Some(name) = text_of(issue, "name") {
		line("Title", name);
	}
	if let Some(number) = display_of(issue, "issue_number") {
		line("Issue Num", &number);
	}
	if let Some(id) = display_of(issue, "id") {
		line("ID", &id);
	}
	if let Some(volume) = issue.get("volume") {
		if let Some(name) = text_of(volume, "name") {
			match display_of(volume, "id") {
				Some(id) => line("Volume", &format!("{name} (ID: {id})")),
				None => line("Volume", name),
			}
		}
		if let Some(publisher) = volume.get("publisher")
			&& let Some(name) = text_of(publisher, "name")
		{
			line("Publisher", name);
		}
	}
	if let Some(date) = text_of(issue, "cover_date") {
		line("Cover Date", date);
	}
	if verbose {
		if let Some(date) = text_of(issue, "store_date") {
			line("Store Date", date);
		}
		if let Some(aliases) = text_of(issue, "aliases") {
			block("Aliases", &strip_html(aliases));
		}
		if let Some(deck) = text_of(issue, "deck") {
			block("Deck (Summary)", &strip_html(deck));
		}
	}
	if let Some(description) = text_of(issue, "description") {
		block("Description", &strip_html(description));
	}
	if let Some(url) = text_of(issue, "site_detail_url") {
		line("Catalog URL", url);
	}

	if verbose {
		for (key, label) in [
			("person_credits", "People / Creators"),
			("character_credits", "Characters"),
			("team_credits", "Teams"),
			("location_credits", "Locations"),
			("concept_credits", "Concepts"),
			("object_credits", "Objects"),
			("story_arc_credits", "Story Arcs"),
		] {
			print_credit_list(issue, key, label);
		}
	} else {
		print_credit_summary(issue);
		println!("(use --verbose for full details)");
	}
}

fn print_credit_list(issue: &Value, key: &str, label: &str) {
	let Some(items) = issue.get(key).and_then(Value::as_array) else {
		return;
	};
	if items.is_empty() {
		return;
	}
	println!("{label}:");
	let mut entries: Vec<String> = items
		.iter()
		.filter_map(|item| {
			let name = text_of(item, "name")?;
			Some(match text_of(item, "role") {
				Some(role) => format!("{name} ({role})"),
				None => name.to_string(),
			})
		})
		.collect();
	entries.sort_by_key(|e| e.to_lowercase());
	for entry in entries {
		println!("  - {entry}");
	}
}

fn print_credit_summary(issue: &Value) {
	let Some(credits) = issue.get("person_credits").and_then(Value::as_array) else {
		return;
	};
	let names_with_role = |fragments: &[&str]| -> Vec<String> {
		let mut names: Vec<String> = credits
			.iter()
			.filter_map(|person| {
				let name = text_of(person, "name")?;
				let role = text_of(person, "role").unwrap_or("").to_lowercase();
				fragments.iter().any(|f| role.contains(f)).then(|| name.to_string())
			})
			.collect();
		names.sort_by_key(|n| n.to_lowercase());
		names.dedup();
		names
	};

	let writers = names_with_role(&["writer"]);
	if !writers.is_empty() {
		line("Writer(s)", &writers.join(", "));
	}
	let artists = names_with_role(&["penciler", "artist", "inker", "cover"]);
	if !artists.is_empty() {
		line("Artist(s)", &artists.join(", "));
	}
}

/// Prints a fetched volume record, including its issue list when present.
pub fn print_volume(volume: &Value) {
	let name = text_of(volume, "name").unwrap_or("Volume");
	println!("\n=== Volume: {name} ===");
	if let Some(id) = display_of(volume, "id") {
		line("ID", &id);
	}
	if let Some(publisher) = volume.get("publisher")
		&& let Some(pub_name) = text_of(publisher, "name")
	{
		line("Publisher", pub_name);
	}
	if let Some(year) = display_of(volume, "start_year") {
		line("Start Year", &year);
	}
	if let Some(count) = display_of(volume, "count_of_issues") {
		line("Total Issues", &count);
	}
	if let Some(description) = text_of(volume, "description") {
		block("Description", &strip_html(description));
	}
	if let Some(url) = text_of(volume, "site_detail_url") {
		line("Catalog URL", url);
	}

	if let Some(issues) = volume.get("issues").and_then(Value::as_array)
		&& !issues.is_empty()
	{
		println!("Issues ({}):", issues.len());
		let mut sorted: Vec<&Value> = issues.iter().collect();
		sorted.sort_by(|a, b| issue_sort_key(a).partial_cmp(&issue_sort_key(b)).unwrap_or(std::cmp::Ordering::Equal));
		for issue in sorted {
			let number = display_of(issue, "issue_number").unwrap_or_else(|| "?".to_string());
			let name = text_of(issue, "name")
				.map(str::to_string)
				.unwrap_or_else(|| format!("Issue #{number}"));
			match display_of(issue, "id") {
				Some(id) => println!("  #{number}: {name} (ID: {id})"),
				None => println!("  #{number}: {name}"),
			}
		}
	}
}

/// Prints volume search results.
pub fn print_volume_list(volumes: &[Value]) {
	if volumes.is_empty() {
		println!("No volumes found matching your criteria.");
		return;
	}
	println!("Found {} volume(s):", volumes.len());
	for volume in volumes {
		print_volume(volume);
	}
}

fn issue_sort_key(issue: &Value) -> f64 {
	display_of(issue, "issue_number")
		.and_then(|n| n.parse::<f64>().ok())
		.unwrap_or(f64::MAX)
}
