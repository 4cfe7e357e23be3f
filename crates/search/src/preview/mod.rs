//! Preview panel lifecycle for the highlighted match.
//!
//! The preview surface (one virtual buffer in one split) is created
//! lazily on the first selection and only has its content replaced on
//! subsequent ones. The host editor owns both resources; this module
//! holds back-reference handles that are cleared the moment the panel
//! closes. Failures reading or rendering never propagate and never
//! leave the panel half-updated.

use std::sync::Arc;

use sift_host::diag::DiagnosticsSink;
use sift_host::fs::FileStore;
use sift_host::ui::{BufferId, EditorHost, ModeSpec, SplitDirection, SplitId, SplitSpec};

use crate::config::SearchConfig;
use crate::grep::SearchMatch;

/// Mode governing the preview buffer's key bindings.
pub const PREVIEW_MODE: &str = "search-preview";
/// Stable panel identifier, making split creation idempotent at the host.
pub const PREVIEW_PANEL: &str = "search-preview";

const PREVIEW_BUFFER_NAME: &str = "*Search Preview*";
const CLOSE_KEY: &str = "q";
const CLOSE_COMMAND: &str = "search-preview-close";

/// Owns the preview surface for one search session.
pub struct SearchPreview {
	files: Arc<dyn FileStore>,
	diagnostics: Arc<dyn DiagnosticsSink>,
	context_lines: usize,
	split_ratio: f32,
	buffer: Option<BufferId>,
	split: Option<SplitId>,
	original_split: Option<SplitId>,
}

impl SearchPreview {
	pub fn new(config: &SearchConfig, files: Arc<dyn FileStore>, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
		Self {
			files,
			diagnostics,
			context_lines: config.context_lines,
			split_ratio: config.split_ratio,
			buffer: None,
			split: None,
			original_split: None,
		}
	}

	/// Records the split to restore focus to after the panel is first
	/// created, so the search prompt keeps receiving input.
	pub fn set_original_split(&mut self, split: SplitId) {
		self.original_split = Some(split);
	}

	pub fn is_open(&self) -> bool {
		self.buffer.is_some()
	}

	/// Renders `selected` with surrounding context into the preview,
	/// creating the panel on first use.
	pub async fn update(&mut self, host: &mut dyn EditorHost, selected: &SearchMatch) {
		let content = match self.files.read_to_string(&selected.file).await {
			Ok(content) => content,
			Err(err) => {
				self.diagnostics.report(&format!("preview read failed for {}: {err}", selected.file.display()));
				return;
			}
		};
		let rendered = render_preview(selected, &content, self.context_lines);

		if let Some(buffer) = self.buffer {
			if let Err(err) = host.set_buffer_content(buffer, rendered) {
				self.diagnostics.report(&format!("preview content update failed: {err}"));
			}
			return;
		}
		self.open(host, rendered);
	}

	fn open(&mut self, host: &mut dyn EditorHost, rendered: String) {
		let mode = ModeSpec {
			name: PREVIEW_MODE.to_string(),
			bindings: vec![(CLOSE_KEY.to_string(), CLOSE_COMMAND.to_string())],
			read_only: true,
		};
		if let Err(err) = host.define_mode(&mode) {
			self.diagnostics.report(&format!("preview mode definition failed: {err}"));
			return;
		}

		let spec = SplitSpec {
			name: PREVIEW_BUFFER_NAME.to_string(),
			mode: PREVIEW_MODE.to_string(),
			ratio: self.split_ratio,
			direction: SplitDirection::Vertical,
			panel_id: PREVIEW_PANEL.to_string(),
		};
		let (buffer, split) = match host.create_preview_split(&spec, rendered) {
			Ok(handles) => handles,
			Err(err) => {
				self.diagnostics.report(&format!("preview split creation failed: {err}"));
				return;
			}
		};
		self.buffer = Some(buffer);
		self.split = Some(split);

		if let Some(original) = self.original_split
			&& let Err(err) = host.focus_split(original)
		{
			self.diagnostics.report(&format!("prompt focus restore failed: {err}"));
		}
	}

	/// Releases the preview buffer and split. Safe to call repeatedly
	/// and before the panel was ever created.
	pub fn close(&mut self, host: &mut dyn EditorHost) {
		if let Some(buffer) = self.buffer.take()
			&& let Err(err) = host.close_buffer(buffer)
		{
			self.diagnostics.report(&format!("preview buffer close failed: {err}"));
		}
		if let Some(split) = self.split.take()
			&& let Err(err) = host.close_split(split)
		{
			self.diagnostics.report(&format!("preview split close failed: {err}"));
		}
		self.original_split = None;
	}
}

/// Renders the preview block: a location header, a rule, then the match
/// line with `context` lines on both sides, clamped to the file bounds.
fn render_preview(selected: &SearchMatch, content: &str, context: usize) -> String {
	let lines: Vec<&str> = content.lines().collect();
	let total = lines.len();
	let match_line = selected.line;

	let header = format!("{}:{}:{}", selected.file.display(), selected.line, selected.column);
	let mut out = String::new();
	out.push_str(&header);
	out.push('\n');
	out.push_str(&"─".repeat(header.chars().count()));
	out.push('\n');

	let first = match_line.saturating_sub(context).max(1);
	let last = match_line.saturating_add(context).min(total);
	for number in first..=last {
		let marker = if number == match_line { "> " } else { "  " };
		let text = lines.get(number - 1).copied().unwrap_or_default();
		out.push_str(&format!("{number:>4} {marker}{text}\n"));
	}
	out
}

#[cfg(test)]
mod tests;
