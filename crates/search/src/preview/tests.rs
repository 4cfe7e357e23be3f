use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use sift_host::diag::DiagnosticsSink;
use sift_host::fs::TokioFileStore;
use sift_host::ui::{BufferId, EditorHost, HostError, ModeSpec, SplitId, SplitSpec, Suggestion};

use super::{SearchPreview, render_preview};
use crate::config::SearchConfig;
use crate::grep::SearchMatch;

#[derive(Default)]
struct CollectingSink(Mutex<Vec<String>>);

impl CollectingSink {
	fn messages(&self) -> Vec<String> {
		self.0.lock().clone()
	}
}

impl DiagnosticsSink for CollectingSink {
	fn report(&self, message: &str) {
		self.0.lock().push(message.to_string());
	}
}

/// Records host operations in call order.
#[derive(Default)]
struct FakeHost {
	ops: Vec<String>,
	content: Option<String>,
	focused: Option<SplitId>,
	next_id: u64,
	fail_create: bool,
	fail_set_content: bool,
}

impl FakeHost {
	fn count(&self, op: &str) -> usize {
		self.ops.iter().filter(|entry| entry.starts_with(op)).count()
	}
}

impl EditorHost for FakeHost {
	fn define_mode(&mut self, spec: &ModeSpec) -> Result<(), HostError> {
		self.ops.push(format!("define_mode {}", spec.name));
		Ok(())
	}

	fn create_preview_split(&mut self, spec: &SplitSpec, content: String) -> Result<(BufferId, SplitId), HostError> {
		if self.fail_create {
			return Err(HostError::Backend("split backend unavailable".to_string()));
		}
		self.ops.push(format!("create_split {}", spec.panel_id));
		self.content = Some(content);
		self.next_id += 1;
		Ok((BufferId(self.next_id), SplitId(self.next_id + 100)))
	}

	fn set_buffer_content(&mut self, buffer: BufferId, content: String) -> Result<(), HostError> {
		if self.fail_set_content {
			return Err(HostError::UnknownBuffer(buffer));
		}
		self.ops.push(format!("set_content {}", buffer.0));
		self.content = Some(content);
		Ok(())
	}

	fn close_buffer(&mut self, buffer: BufferId) -> Result<(), HostError> {
		self.ops.push(format!("close_buffer {}", buffer.0));
		Ok(())
	}

	fn close_split(&mut self, split: SplitId) -> Result<(), HostError> {
		self.ops.push(format!("close_split {}", split.0));
		Ok(())
	}

	fn focus_split(&mut self, split: SplitId) -> Result<(), HostError> {
		self.ops.push(format!("focus_split {}", split.0));
		self.focused = Some(split);
		Ok(())
	}

	fn active_split(&self) -> SplitId {
		SplitId(1)
	}

	fn set_suggestions(&mut self, _suggestions: Vec<Suggestion>) -> Result<(), HostError> {
		self.ops.push("set_suggestions".to_string());
		Ok(())
	}

	fn open_location(&mut self, path: &Path, line: usize, column: usize) -> Result<(), HostError> {
		self.ops.push(format!("open_location {}:{line}:{column}", path.display()));
		Ok(())
	}
}

fn preview_over(sink: Arc<CollectingSink>) -> SearchPreview {
	SearchPreview::new(&SearchConfig::default(), Arc::new(TokioFileStore), sink)
}

fn fixture_file(lines: usize) -> (tempfile::TempDir, PathBuf) {
	let dir = tempfile::tempdir().expect("create tempdir");
	let path = dir.path().join("fixture.rs");
	let body: String = (1..=lines).map(|n| format!("line {n}\n")).collect();
	std::fs::write(&path, body).expect("write fixture");
	(dir, path)
}

fn match_at(path: &Path, line: usize) -> SearchMatch {
	SearchMatch {
		file: path.to_path_buf(),
		line,
		column: 3,
		content: format!("line {line}"),
	}
}

#[tokio::test]
async fn first_update_creates_panel_and_restores_focus() {
	let sink = Arc::new(CollectingSink::default());
	let mut preview = preview_over(sink.clone());
	let mut host = FakeHost::default();
	let (_dir, path) = fixture_file(20);

	preview.set_original_split(SplitId(7));
	preview.update(&mut host, &match_at(&path, 10)).await;

	assert!(preview.is_open());
	assert_eq!(
		host.ops,
		vec![
			"define_mode search-preview".to_string(),
			"create_split search-preview".to_string(),
			"focus_split 7".to_string(),
		],
	);
	assert_eq!(host.focused, Some(SplitId(7)));
	assert!(sink.messages().is_empty());

	let content = host.content.expect("rendered content");
	assert!(content.starts_with(&format!("{}:10:3\n", path.display())));
	assert!(content.contains("  10 > line 10"));
	assert!(content.contains("   9   line 9"));
	assert!(content.contains("   5   line 5"));
	assert!(content.contains("  15   line 15"));
	assert!(!content.contains("line 16"), "window stops five lines after the match");
}

#[tokio::test]
async fn second_update_replaces_content_in_place() {
	let sink = Arc::new(CollectingSink::default());
	let mut preview = preview_over(sink.clone());
	let mut host = FakeHost::default();
	let (_dir, path) = fixture_file(20);

	preview.update(&mut host, &match_at(&path, 4)).await;
	preview.update(&mut host, &match_at(&path, 12)).await;

	assert_eq!(host.count("create_split"), 1);
	assert_eq!(host.count("define_mode"), 1);
	assert_eq!(host.count("set_content"), 1);
	assert!(host.content.expect("rendered content").contains("  12 > line 12"));
}

#[tokio::test]
async fn context_window_clamps_to_file_bounds() {
	let sink = Arc::new(CollectingSink::default());
	let mut preview = preview_over(sink.clone());
	let mut host = FakeHost::default();
	let (_dir, path) = fixture_file(6);

	preview.update(&mut host, &match_at(&path, 2)).await;
	let content = host.content.clone().expect("rendered content");
	assert!(content.contains("   1   line 1"));
	assert!(content.contains("   6   line 6"));

	preview.update(&mut host, &match_at(&path, 6)).await;
	let content = host.content.expect("rendered content");
	assert!(content.contains("   6 > line 6"));
	assert!(!content.contains("line 7"));
}

#[tokio::test]
async fn unreadable_file_reports_and_keeps_prior_state() {
	let sink = Arc::new(CollectingSink::default());
	let mut preview = preview_over(sink.clone());
	let mut host = FakeHost::default();

	preview.update(&mut host, &match_at(Path::new("/nonexistent/void.rs"), 1)).await;

	assert!(!preview.is_open());
	assert!(host.ops.is_empty(), "no host mutation on a failed read");
	assert_eq!(sink.messages().len(), 1);
}

#[tokio::test]
async fn create_failure_leaves_panel_closed() {
	let sink = Arc::new(CollectingSink::default());
	let mut preview = preview_over(sink.clone());
	let mut host = FakeHost {
		fail_create: true,
		..FakeHost::default()
	};
	let (_dir, path) = fixture_file(6);

	preview.update(&mut host, &match_at(&path, 2)).await;

	assert!(!preview.is_open());
	assert_eq!(sink.messages().len(), 1);
}

#[tokio::test]
async fn content_update_failure_keeps_prior_render() {
	let sink = Arc::new(CollectingSink::default());
	let mut preview = preview_over(sink.clone());
	let mut host = FakeHost::default();
	let (_dir, path) = fixture_file(9);

	preview.update(&mut host, &match_at(&path, 3)).await;
	let before = host.content.clone().expect("rendered content");

	host.fail_set_content = true;
	preview.update(&mut host, &match_at(&path, 7)).await;

	assert!(preview.is_open());
	assert_eq!(host.content.as_deref(), Some(before.as_str()), "failed update leaves the panel as it was");
	assert_eq!(sink.messages().len(), 1);
}

#[tokio::test]
async fn close_is_idempotent_even_when_never_opened() {
	let sink = Arc::new(CollectingSink::default());
	let mut preview = preview_over(sink.clone());
	let mut host = FakeHost::default();

	preview.close(&mut host);
	preview.close(&mut host);
	assert!(host.ops.is_empty());
	assert!(!preview.is_open());

	let (_dir, path) = fixture_file(6);
	preview.update(&mut host, &match_at(&path, 2)).await;
	assert!(preview.is_open());

	preview.close(&mut host);
	preview.close(&mut host);
	assert!(!preview.is_open());
	assert_eq!(host.count("close_buffer"), 1);
	assert_eq!(host.count("close_split"), 1);
	assert!(sink.messages().is_empty());
}

#[test]
fn render_marks_only_the_match_line() {
	let m = SearchMatch {
		file: PathBuf::from("src/main.rs"),
		line: 2,
		column: 5,
		content: "beta".to_string(),
	};
	let rendered = render_preview(&m, "alpha\nbeta\ngamma\n", 1);
	let lines: Vec<&str> = rendered.lines().collect();
	assert_eq!(lines[0], "src/main.rs:2:5");
	assert_eq!(lines[1], "─".repeat("src/main.rs:2:5".len()));
	assert_eq!(lines[2], "   1   alpha");
	assert_eq!(lines[3], "   2 > beta");
	assert_eq!(lines[4], "   3   gamma");
}

#[test]
fn render_handles_match_past_end_of_file() {
	let m = SearchMatch {
		file: PathBuf::from("gone.rs"),
		line: 40,
		column: 1,
		content: String::new(),
	};
	let rendered = render_preview(&m, "only line\n", 5);
	let lines: Vec<&str> = rendered.lines().collect();
	assert_eq!(lines.len(), 2, "header and rule only, no context lines");
}
