//! Flat markup codec for the embedded metadata document.
//!
//! The on-disk format is a single-level XML document: one root element with
//! one child element per field and text-only content. The writer always
//! produces the same bytes for the same record (declaration, namespace
//! attributes on the root, tab indentation, one element per line), which is
//! what makes re-tagging idempotent at the byte level.
//!
//! The parser accepts documents produced by other tools as well: prolog,
//! comments, attributes and self-closing elements are tolerated, entities are
//! decoded, and element order is preserved in the returned record. Content
//! with nested elements is rejected — the schema is flat, and callers treat a
//! parse failure as "no existing metadata".

use crate::error::{MarkupError, Result};
use crate::record::ComicInfoRecord;

/// Root element name of the metadata document.
pub const ROOT_ELEMENT: &str = "ComicInfo";

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";
const ROOT_OPEN: &str = "<ComicInfo xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\">";

/// Serializes a record into the canonical document form.
pub fn to_document(record: &ComicInfoRecord) -> String {
	let mut out = String::with_capacity(256 + record.len() * 32);
	out.push_str(XML_DECLARATION);
	out.push('\n');
	out.push_str(ROOT_OPEN);
	out.push('\n');
	for (name, value) in record.iter() {
		out.push('\t');
		out.push('<');
		out.push_str(name);
		out.push('>');
		push_escaped(&mut out, value);
		out.push_str("</");
		out.push_str(name);
		out.push_str(">\n");
	}
	out.push_str("</");
	out.push_str(ROOT_ELEMENT);
	out.push_str(">\n");
	out
}

/// Parses a document into a record, preserving element order.
///
/// Elements whose content is empty after trimming are skipped, matching the
/// record invariant that empty fields do not exist.
pub fn parse_document(input: &str) -> Result<ComicInfoRecord> {
	let mut cur = Cursor::new(input.strip_prefix('\u{feff}').unwrap_or(input));
	cur.skip_misc();

	if !cur.eat('<') {
		return Err(MarkupError::MissingRoot);
	}
	let root = cur.take_name();
	if root.is_empty() {
		return Err(MarkupError::MissingRoot);
	}
	let root = root.to_string();

	let mut record = ComicInfoRecord::new();
	if cur.skip_attrs()? {
		return Ok(record);
	}

	loop {
		cur.skip_misc();
		if cur.rest().starts_with("</") {
			cur.bump(2);
			let close = cur.take_name().to_string();
			cur.skip_ws();
			if !cur.eat('>') {
				return Err(MarkupError::Malformed(cur.pos));
			}
			if close != root {
				return Err(MarkupError::MismatchedClose { expected: root, found: close });
			}
			return Ok(record);
		}
		if !cur.eat('<') {
			return Err(if cur.rest().is_empty() {
				MarkupError::UnexpectedEnd
			} else {
				MarkupError::Malformed(cur.pos)
			});
		}
		let name = cur.take_name().to_string();
		if name.is_empty() {
			return Err(MarkupError::Malformed(cur.pos));
		}
		if cur.skip_attrs()? {
			continue;
		}

		let text = cur.take_text()?;
		if !cur.rest().starts_with("</") {
			// Another open tag inside the element body.
			return Err(MarkupError::NestedElement(name));
		}
		cur.bump(2);
		let close = cur.take_name().to_string();
		cur.skip_ws();
		if !cur.eat('>') {
			return Err(MarkupError::Malformed(cur.pos));
		}
		if close != name {
			return Err(MarkupError::MismatchedClose { expected: name, found: close });
		}
		record.set(name, unescape(text)?);
	}
}

fn push_escaped(out: &mut String, text: &str) {
	for ch in text.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			_ => out.push(ch),
		}
	}
}

fn unescape(text: &str) -> Result<String> {
	if !text.contains('&') {
		return Ok(text.to_string());
	}
	let mut out = String::with_capacity(text.len());
	let mut rest = text;
	while let Some(idx) = rest.find('&') {
		out.push_str(&rest[..idx]);
		rest = &rest[idx..];
		let end = rest.find(';').ok_or(MarkupError::Malformed(idx))?;
		let entity = &rest[1..end];
		match entity {
			"amp" => out.push('&'),
			"lt" => out.push('<'),
			"gt" => out.push('>'),
			"quot" => out.push('"'),
			"apos" => out.push('\''),
			_ => {
				let code = entity
					.strip_prefix("#x")
					.or_else(|| entity.strip_prefix("#X"))
					.map(|hex| u32::from_str_radix(hex, 16))
					.or_else(|| entity.strip_prefix('#').map(str::parse::<u32>))
					.ok_or(MarkupError::Malformed(idx))?
					.map_err(|_| MarkupError::Malformed(idx))?;
				out.push(char::from_u32(code).ok_or(MarkupError::Malformed(idx))?);
			}
		}
		rest = &rest[end + 1..];
	}
	out.push_str(rest);
	Ok(out)
}

struct Cursor<'a> {
	input: &'a str,
	pos: usize,
}

impl<'a> Cursor<'a> {
	fn new(input: &'a str) -> Self {
		Self { input, pos: 0 }
	}

	fn rest(&self) -> &'a str {
		&self.input[self.pos..]
	}

	fn bump(&mut self, n: usize) {
		self.pos += n;
	}

	fn eat(&mut self, ch: char) -> bool {
		if self.rest().starts_with(ch) {
			self.pos += ch.len_utf8();
			true
		} else {
			false
		}
	}

	fn skip_ws(&mut self) {
		let trimmed = self.rest().trim_start();
		self.pos = self.input.len() - trimmed.len();
	}

	/// Skips whitespace, XML declarations / processing instructions,
	/// comments, and doctype declarations.
	fn skip_misc(&mut self) {
		loop {
			self.skip_ws();
			let rest = self.rest();
			if rest.starts_with("<?") {
				match rest.find("?>") {
					Some(end) => self.bump(end + 2),
					None => {
						self.pos = self.input.len();
						return;
					}
				}
			} else if rest.starts_with("<!--") {
				match rest.find("-->") {
					Some(end) => self.bump(end + 3),
					None => {
						self.pos = self.input.len();
						return;
					}
				}
			} else if rest.starts_with("<!") {
				match rest.find('>') {
					Some(end) => self.bump(end + 1),
					None => {
						self.pos = self.input.len();
						return;
					}
				}
			} else {
				return;
			}
		}
	}

	fn take_name(&mut self) -> &'a str {
		let rest = self.rest();
		let len = rest
			.char_indices()
			.find(|(_, c)| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')))
			.map_or(rest.len(), |(i, _)| i);
		self.pos += len;
		&rest[..len]
	}

	/// Consumes attributes up to and including the tag terminator.
	///
	/// Returns true for a self-closing tag. Quoted attribute values may
	/// contain `>`, so the scan is quote-aware.
	fn skip_attrs(&mut self) -> Result<bool> {
		let mut quote: Option<char> = None;
		let mut chars = self.rest().char_indices();
		while let Some((i, ch)) = chars.next() {
			match quote {
				Some(q) => {
					if ch == q {
						quote = None;
					}
				}
				None => match ch {
					'"' | '\'' => quote = Some(ch),
					'>' => {
						self.bump(i + 1);
						return Ok(false);
					}
					'/' => {
						if let Some((j, '>')) = chars.next() {
							self.bump(j + 1);
							return Ok(true);
						}
					}
					_ => {}
				},
			}
		}
		Err(MarkupError::UnexpectedEnd)
	}

	/// Takes raw text content up to the next tag open.
	fn take_text(&mut self) -> Result<&'a str> {
		let rest = self.rest();
		let end = rest.find('<').ok_or(MarkupError::UnexpectedEnd)?;
		self.bump(end);
		Ok(&rest[..end])
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn record(pairs: &[(&str, &str)]) -> ComicInfoRecord {
		pairs.iter().copied().collect()
	}

	#[test]
	fn document_round_trip_preserves_fields_and_order() {
		let original = record(&[
			("Title", "Watchmen #1"),
			("Series", "Watchmen"),
			("Notes", "Store Date: 1986-09-05"),
			("CustomField", "kept"),
		]);
		let doc = to_document(&original);
		let parsed = parse_document(&doc).unwrap();
		assert_eq!(parsed, original);
	}

	#[test]
	fn serialization_is_stable() {
		let rec = record(&[("Title", "X"), ("Year", "1986")]);
		assert_eq!(to_document(&rec), to_document(&rec));
	}

	#[test]
	fn special_characters_survive_the_round_trip() {
		let rec = record(&[("Summary", "Rorschach & Nite Owl <uncut>"), ("Title", "\"Quote\"")]);
		let doc = to_document(&rec);
		assert!(doc.contains("Rorschach &amp; Nite Owl &lt;uncut&gt;"));
		assert_eq!(parse_document(&doc).unwrap(), rec);
	}

	#[test]
	fn parses_foreign_documents() {
		let doc = "<?xml version='1.0' encoding='utf-8'?>\n\
			<!-- written elsewhere -->\n\
			<ComicInfo xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\n\
			  <Title>Saga #1</Title>\n\
			  <Blank/>\n\
			  <Empty>   </Empty>\n\
			  <Number>1</Number>\n\
			</ComicInfo>";
		let parsed = parse_document(doc).unwrap();
		let order: Vec<_> = parsed.iter().collect();
		assert_eq!(order, vec![("Title", "Saga #1"), ("Number", "1")]);
	}

	#[test]
	fn decodes_entities_including_numeric_references() {
		let doc = "<ComicInfo><Title>A &amp; B &#233; &#x2014; &apos;q&apos;</Title></ComicInfo>";
		let parsed = parse_document(doc).unwrap();
		assert_eq!(parsed.get("Title"), Some("A & B \u{e9} \u{2014} 'q'"));
	}

	#[test]
	fn duplicate_elements_keep_the_last_value() {
		let doc = "<ComicInfo><Title>first</Title><Title>second</Title></ComicInfo>";
		let parsed = parse_document(doc).unwrap();
		assert_eq!(parsed.get("Title"), Some("second"));
		assert_eq!(parsed.len(), 1);
	}

	#[test]
	fn nested_markup_is_rejected() {
		let doc = "<ComicInfo><Pages><Page Image=\"0\"/></Pages></ComicInfo>";
		assert!(matches!(parse_document(doc), Err(MarkupError::NestedElement(name)) if name == "Pages"));
	}

	#[test]
	fn mismatched_and_truncated_documents_are_rejected() {
		assert!(matches!(
			parse_document("<ComicInfo><Title>x</Series></ComicInfo>"),
			Err(MarkupError::MismatchedClose { .. })
		));
		assert!(matches!(parse_document("<ComicInfo><Title>x"), Err(MarkupError::UnexpectedEnd)));
		assert!(matches!(parse_document("not markup"), Err(MarkupError::MissingRoot)));
	}

	#[test]
	fn self_closing_root_is_an_empty_record() {
		let parsed = parse_document("<ComicInfo/>").unwrap();
		assert!(parsed.is_empty());
	}
}
