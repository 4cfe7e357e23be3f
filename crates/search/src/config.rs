//! Tunables for the live content search feature.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Search feature configuration.
///
/// The external command owns the match semantics; it must emit
/// `file:line:column:content` lines (ripgrep's `--vimgrep` format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
	/// External search program.
	pub program: String,
	/// Arguments placed before the query.
	pub args: Vec<String>,
	/// Queries shorter than this (trimmed) never spawn a search.
	pub min_query_len: usize,
	/// Quiet window between the last keystroke and execution.
	pub debounce_ms: u64,
	/// Cap on suggestions shown for one result set.
	pub max_results: usize,
	/// Context lines rendered above and below a previewed match.
	pub context_lines: usize,
	/// Preview split size ratio.
	pub split_ratio: f32,
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			program: "rg".to_string(),
			args: vec!["--vimgrep".to_string(), "--smart-case".to_string()],
			min_query_len: 2,
			debounce_ms: 150,
			max_results: 100,
			context_lines: 5,
			split_ratio: 0.5,
		}
	}
}

impl SearchConfig {
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}
}
