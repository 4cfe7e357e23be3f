//! Search configuration loading.

use std::path::Path;

use anyhow::{Context, Result};
use sift_search::config::SearchConfig;

/// Reads a [`SearchConfig`] from a TOML file. Missing keys fall back to
/// the feature defaults.
pub fn load_config(path: &Path) -> Result<SearchConfig> {
	let text = std::fs::read_to_string(path).with_context(|| format!("read search config {}", path.display()))?;
	parse_config(&text).with_context(|| format!("parse search config {}", path.display()))
}

/// Parses a [`SearchConfig`] from TOML text.
pub fn parse_config(text: &str) -> Result<SearchConfig> {
	toml::from_str(text).context("invalid search config")
}
