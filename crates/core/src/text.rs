//! Text cleanup helpers shared by the mapper and the filename deriver.

use std::sync::LazyLock;

use regex::Regex;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static ILLEGAL: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|\x00-\x1f]"#).unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Removes HTML tags and decodes the common entities, then trims.
pub fn strip_html(input: &str) -> String {
	if input.is_empty() {
		return String::new();
	}
	let clean = HTML_TAG.replace_all(input, "");
	clean
		.replace("&nbsp;", " ")
		.replace("&amp;", "&")
		.replace("&lt;", "<")
		.replace("&gt;", ">")
		.replace("&quot;", "\"")
		.replace("&#39;", "'")
		.replace("&apos;", "'")
		.trim()
		.to_string()
}

/// Makes a string safe to use as a filename component.
///
/// Characters illegal on common filesystems are removed, whitespace runs
/// collapse to a single space, and trailing dots are trimmed.
pub fn sanitize_filename(input: &str) -> String {
	let clean = ILLEGAL.replace_all(input, "");
	let clean = WHITESPACE.replace_all(&clean, " ");
	clean.trim().trim_end_matches('.').trim_end().to_string()
}
