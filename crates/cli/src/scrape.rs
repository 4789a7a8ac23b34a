//! Validation-error scraping for the post-save editor page.
//!
//! The hub reports compile results by re-rendering the editor page with
//! alert banners; there is no structured channel. Two passes run over
//! the page: banner elements filtered by a compiler-output vocabulary,
//! then a full-text sweep for lines carrying a line-number marker. The
//! vocabulary is a heuristic against the hub's current wording, not a
//! contract, so a clean report means "nothing matched", not "the hub
//! accepted the code" in any stronger sense.

use std::collections::HashSet;

use serde::Serialize;

/// Collects the visible text of every banner-styled element.
pub const COLLECT_BANNERS_JS: &str = r#"
(function () {
	const selector = ".alert-warning, .alert-danger, .warning, [class*='warning'], [class*='alert'], [class*='error']";
	const texts = [];
	for (const el of document.querySelectorAll(selector)) {
		const text = (el.innerText || '').trim();
		if (text) { texts.push(text); }
	}
	return texts;
})()
"#;

/// Vocabulary a banner text must contain to count as compiler output.
const BANNER_VOCAB: [&str; 15] = [
	"expecting",
	"found",
	"@ line",
	"line ",
	"column",
	"syntax error",
	"compilation error",
	"parse error",
	"unexpected",
	"token",
	"cannot",
	"failed",
	"error",
	"exception",
	"invalid",
];

/// Markers identifying a compiler line reference in running text.
const LINE_MARKERS: [&str; 2] = ["@ line", "line "];

/// Keywords the full-text pass requires next to a line marker.
const LINE_VOCAB: [&str; 11] = [
	"expecting",
	"found",
	"unexpected",
	"token",
	"syntax",
	"error",
	"exception",
	"cannot",
	"invalid",
	"failed",
	"parse",
];

/// Outcome of the post-save scrape.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
	/// Ordered, de-duplicated error texts. Empty means no validation
	/// output matched.
	pub errors: Vec<String>,
}

impl ScrapeReport {
	pub fn is_clean(&self) -> bool {
		self.errors.is_empty()
	}
}

/// Keeps banner texts that read like compiler output.
pub fn filter_banner_errors<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
	texts
		.into_iter()
		.filter_map(|text| {
			let normalized = normalize(text);
			if normalized.is_empty() {
				return None;
			}
			let lower = normalized.to_lowercase();
			BANNER_VOCAB
				.iter()
				.any(|needle| lower.contains(needle))
				.then_some(normalized)
		})
		.collect()
}

/// Pulls error-shaped lines out of the page's rendered text. A line
/// must carry both a line-number marker and a compiler keyword; either
/// alone matches far too much page chrome.
pub fn collect_line_errors(body_text: &str) -> Vec<String> {
	body_text
		.lines()
		.filter_map(|line| {
			let normalized = normalize(line);
			if normalized.is_empty() {
				return None;
			}
			let lower = normalized.to_lowercase();
			let has_marker = LINE_MARKERS.iter().any(|marker| lower.contains(marker));
			let has_keyword = LINE_VOCAB.iter().any(|keyword| lower.contains(keyword));
			(has_marker && has_keyword).then_some(normalized)
		})
		.collect()
}

/// Merges both passes preserving first appearance, dropping texts that
/// normalize to an already-seen entry.
pub fn merge_errors(banner: Vec<String>, lines: Vec<String>) -> Vec<String> {
	let mut seen = HashSet::new();
	let mut merged = Vec::new();
	for error in banner.into_iter().chain(lines) {
		if seen.insert(error.clone()) {
			merged.push(error);
		}
	}
	merged
}

/// Collapses whitespace runs the way browsers render them, so the same
/// error seen via innerText and via raw markup compares equal.
fn normalize(text: &str) -> String {
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn banner_pass_keeps_compiler_output_only() {
		let errors = filter_banner_errors([
			"expecting '}', found 'if' @ line 42, column 5",
			"Unsaved changes",
			"You are logged in as admin",
		]);
		assert_eq!(errors, vec!["expecting '}', found 'if' @ line 42, column 5"]);
	}

	#[test]
	fn line_pass_needs_marker_and_keyword_together() {
		let body = "Apps\nline 12 of the changelog\nunexpected token: else @ line 3\nDone";
		let errors = collect_line_errors(body);
		// "line 12 of the changelog" has a marker but no keyword.
		assert_eq!(errors, vec!["unexpected token: else @ line 3"]);
	}

	#[test]
	fn same_error_from_both_passes_reports_once() {
		let banner = filter_banner_errors(["expecting '}'  @ line  7"]);
		let lines = collect_line_errors("expecting '}' @ line 7\n");
		let merged = merge_errors(banner, lines);
		assert_eq!(merged, vec!["expecting '}' @ line 7"]);
	}

	#[test]
	fn merge_preserves_first_appearance_order() {
		let merged = merge_errors(
			vec!["first error".into(), "second error".into()],
			vec!["second error".into(), "third error".into()],
		);
		assert_eq!(merged, vec!["first error", "second error", "third error"]);
	}

	#[test]
	fn whitespace_only_banners_are_dropped() {
		let errors = filter_banner_errors(["   \n\t  ", ""]);
		assert!(errors.is_empty());
	}

	#[test]
	fn clean_report_has_no_errors() {
		let report = ScrapeReport { errors: merge_errors(vec![], vec![]) };
		assert!(report.is_clean());
	}
}
