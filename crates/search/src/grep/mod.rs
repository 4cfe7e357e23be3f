//! Grep-output parsing and prompt suggestion mapping.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use sift_host::ui::Suggestion;

/// Full char budget for a displayed suggestion line.
const DISPLAY_LIMIT: usize = 60;
/// Chars kept before the ellipsis when content overflows the budget.
const DISPLAY_KEEP: usize = 57;

static GREP_LINE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^([^:]+):(\d+):(\d+):(.*)$").expect("grep line pattern"));

/// One match parsed from a `file:line:column:content` grep output line.
///
/// Line and column are 1-based. The value is transient: produced from
/// one output line, passed around by value, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
	pub file: PathBuf,
	pub line: usize,
	pub column: usize,
	pub content: String,
}

/// Parses one grep output line, rejecting anything that deviates from
/// the `path:line:column:content` shape (the path part carries no
/// colon). No partial parses.
pub fn parse_grep_line(line: &str) -> Option<SearchMatch> {
	let caps = GREP_LINE.captures(line)?;
	let line_no = caps[2].parse().ok()?;
	let column = caps[3].parse().ok()?;
	Some(SearchMatch {
		file: PathBuf::from(&caps[1]),
		line: line_no,
		column,
		content: caps[4].to_string(),
	})
}

/// Parses a whole stdout capture, skipping malformed lines.
pub fn parse_grep_output(stdout: &str) -> Vec<SearchMatch> {
	stdout.lines().filter_map(parse_grep_line).collect()
}

/// Maps matches into prompt suggestions: first `max_results` in input
/// order, content trimmed and truncated, the match's position as the
/// selection value.
pub fn matches_to_suggestions(matches: &[SearchMatch], max_results: usize) -> Vec<Suggestion> {
	matches
		.iter()
		.take(max_results)
		.enumerate()
		.map(|(index, m)| Suggestion {
			text: display_content(&m.content),
			description: Some(format!("{}:{}:{}", m.file.display(), m.line, m.column)),
			value: index.to_string(),
		})
		.collect()
}

fn display_content(content: &str) -> String {
	let trimmed = content.trim();
	if trimmed.chars().count() > DISPLAY_LIMIT {
		let kept: String = trimmed.chars().take(DISPLAY_KEEP).collect();
		format!("{kept}...")
	} else {
		trimmed.to_string()
	}
}
