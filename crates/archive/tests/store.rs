#![allow(unused_crate_dependencies)]

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use inktag_archive::{EraseOutcome, METADATA_ENTRY, MergeMode, erase_record, read_record, write_record};
use inktag_schema::ComicInfoRecord;
use pretty_assertions::assert_eq;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

struct Entry {
	name: &'static str,
	bytes: &'static [u8],
	method: CompressionMethod,
}

fn make_archive(dir: &Path, name: &str, entries: &[Entry]) -> PathBuf {
	let path = dir.join(name);
	let mut writer = ZipWriter::new(File::create(&path).unwrap());
	for entry in entries {
		let options = SimpleFileOptions::default().compression_method(entry.method);
		writer.start_file(entry.name, options).unwrap();
		writer.write_all(entry.bytes).unwrap();
	}
	writer.finish().unwrap();
	path
}

fn page_entries() -> Vec<Entry> {
	vec![
		Entry {
			name: "page001.jpg",
			bytes: b"\xff\xd8fake-jpeg-one",
			method: CompressionMethod::Stored,
		},
		Entry {
			name: "page002.jpg",
			bytes: b"\xff\xd8fake-jpeg-two",
			method: CompressionMethod::Deflated,
		},
	]
}

fn record(pairs: &[(&str, &str)]) -> ComicInfoRecord {
	pairs.iter().copied().collect()
}

fn raw_entry_bytes(path: &Path, name: &str) -> Vec<u8> {
	let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
	let mut entry = archive.by_name(name).unwrap();
	let mut bytes = Vec::new();
	entry.read_to_end(&mut bytes).unwrap();
	bytes
}

#[test]
fn round_trip_exposes_exactly_the_written_fields() {
	let dir = tempfile::tempdir().unwrap();
	let path = make_archive(dir.path(), "book.cbz", &page_entries());

	let rec = record(&[
		("Title", "Watchmen #1"),
		("Number", "1"),
		("Year", "1986"),
		("Month", "9"),
		("Day", "1"),
		("Series", "Watchmen"),
		("Publisher", "DC Comics"),
	]);
	write_record(&path, &rec, MergeMode::Merge).unwrap();

	let read = read_record(&path).unwrap().expect("entry should exist");
	assert_eq!(read.len(), 7);
	assert_eq!(read.get("Title"), Some("Watchmen #1"));
	assert_eq!(read.get("Number"), Some("1"));
	assert_eq!(read.get("Year"), Some("1986"));
	assert_eq!(read.get("Month"), Some("9"));
	assert_eq!(read.get("Day"), Some("1"));
	assert_eq!(read.get("Series"), Some("Watchmen"));
	assert_eq!(read.get("Publisher"), Some("DC Comics"));
}

#[test]
fn merge_preserves_untouched_fields() {
	let dir = tempfile::tempdir().unwrap();
	let path = make_archive(dir.path(), "book.cbz", &page_entries());

	write_record(&path, &record(&[("Series", "Watchmen")]), MergeMode::Merge).unwrap();
	write_record(&path, &record(&[("Year", "1986")]), MergeMode::Merge).unwrap();

	let read = read_record(&path).unwrap().unwrap();
	assert_eq!(read.get("Series"), Some("Watchmen"));
	assert_eq!(read.get("Year"), Some("1986"));
}

#[test]
fn overwrite_discards_prior_state() {
	let dir = tempfile::tempdir().unwrap();
	let path = make_archive(dir.path(), "book.cbz", &page_entries());

	write_record(&path, &record(&[("Series", "Watchmen")]), MergeMode::Merge).unwrap();
	write_record(&path, &record(&[("Year", "1986")]), MergeMode::Overwrite).unwrap();

	let read = read_record(&path).unwrap().unwrap();
	assert!(!read.contains("Series"));
	assert_eq!(read.get("Year"), Some("1986"));
	assert_eq!(read.len(), 1);
}

#[test]
fn retagging_identical_input_is_byte_identical() {
	let dir = tempfile::tempdir().unwrap();
	let path = make_archive(dir.path(), "book.cbz", &page_entries());
	let rec = record(&[("Title", "Saga #1"), ("Series", "Saga"), ("Number", "1")]);

	write_record(&path, &rec, MergeMode::Merge).unwrap();
	let first = raw_entry_bytes(&path, METADATA_ENTRY);
	write_record(&path, &rec, MergeMode::Merge).unwrap();
	let second = raw_entry_bytes(&path, METADATA_ENTRY);

	assert_eq!(first, second);
}

#[test]
fn payload_entries_survive_byte_for_byte_with_compression() {
	let dir = tempfile::tempdir().unwrap();
	let path = make_archive(dir.path(), "book.cbz", &page_entries());

	write_record(&path, &record(&[("Title", "X")]), MergeMode::Merge).unwrap();

	assert_eq!(raw_entry_bytes(&path, "page001.jpg"), b"\xff\xd8fake-jpeg-one");
	assert_eq!(raw_entry_bytes(&path, "page002.jpg"), b"\xff\xd8fake-jpeg-two");

	let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
	let methods: Vec<_> = (0..archive.len())
		.map(|i| {
			let entry = archive.by_index(i).unwrap();
			(entry.name().to_string(), entry.compression())
		})
		.collect();
	assert_eq!(
		methods,
		vec![
			("page001.jpg".to_string(), CompressionMethod::Stored),
			("page002.jpg".to_string(), CompressionMethod::Deflated),
			(METADATA_ENTRY.to_string(), CompressionMethod::Deflated),
		]
	);
}

#[test]
fn case_variant_entry_is_the_same_logical_entry() {
	let dir = tempfile::tempdir().unwrap();
	let mut entries = page_entries();
	entries.push(Entry {
		name: "comicinfo.XML",
		bytes: b"<ComicInfo><Series>Old</Series><Notes>kept</Notes></ComicInfo>",
		method: CompressionMethod::Deflated,
	});
	let path = make_archive(dir.path(), "book.cbz", &entries);

	write_record(&path, &record(&[("Series", "New")]), MergeMode::Merge).unwrap();

	let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
	let names: Vec<_> = archive.file_names().map(str::to_string).collect();
	assert!(names.contains(&METADATA_ENTRY.to_string()));
	assert!(!names.contains(&"comicinfo.XML".to_string()));
	drop(archive);

	let read = read_record(&path).unwrap().unwrap();
	assert_eq!(read.get("Series"), Some("New"));
	assert_eq!(read.get("Notes"), Some("kept"));
}

#[test]
fn corrupt_existing_entry_is_treated_as_absent() {
	let dir = tempfile::tempdir().unwrap();
	let mut entries = page_entries();
	entries.push(Entry {
		name: METADATA_ENTRY,
		bytes: b"<ComicInfo><Title>unterminated",
		method: CompressionMethod::Deflated,
	});
	let path = make_archive(dir.path(), "book.cbz", &entries);

	assert!(read_record(&path).unwrap().is_none());

	write_record(&path, &record(&[("Title", "Fresh")]), MergeMode::Merge).unwrap();
	let read = read_record(&path).unwrap().unwrap();
	assert_eq!(read.get("Title"), Some("Fresh"));
	assert_eq!(read.len(), 1);
}

#[test]
fn erase_removes_the_entry_and_keeps_payload() {
	let dir = tempfile::tempdir().unwrap();
	let path = make_archive(dir.path(), "book.cbz", &page_entries());
	write_record(&path, &record(&[("Title", "X")]), MergeMode::Merge).unwrap();

	assert_eq!(erase_record(&path).unwrap(), EraseOutcome::Erased);
	assert!(read_record(&path).unwrap().is_none());
	assert_eq!(raw_entry_bytes(&path, "page001.jpg"), b"\xff\xd8fake-jpeg-one");
}

#[test]
fn erase_on_absent_entry_leaves_the_file_bytes_alone() {
	let dir = tempfile::tempdir().unwrap();
	let path = make_archive(dir.path(), "book.cbz", &page_entries());
	let before = std::fs::read(&path).unwrap();

	assert_eq!(erase_record(&path).unwrap(), EraseOutcome::AlreadyAbsent);

	let after = std::fs::read(&path).unwrap();
	assert_eq!(before, after);
}

#[test]
fn invalid_container_fails_without_touching_the_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("not-a-zip.cbz");
	std::fs::write(&path, b"this is not a zip container").unwrap();
	let before = std::fs::read(&path).unwrap();

	let err = write_record(&path, &record(&[("Title", "X")]), MergeMode::Merge);
	assert!(err.is_err());
	assert_eq!(std::fs::read(&path).unwrap(), before);

	// No staging leftovers either.
	let leftovers: Vec<_> = std::fs::read_dir(dir.path())
		.unwrap()
		.filter_map(|e| e.ok())
		.filter(|e| e.file_name().to_string_lossy().starts_with(".inktag-stage-"))
		.collect();
	assert!(leftovers.is_empty());
}
