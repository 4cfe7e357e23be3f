//! Session wiring for the live content search prompt.

use std::path::PathBuf;
use std::sync::Arc;

use sift_host::diag::DiagnosticsSink;
use sift_host::fs::FileStore;
use sift_host::process::{CommandSpec, ProcessOutput, ProcessSpawner};
use sift_host::ui::EditorHost;
use sift_search::config::SearchConfig;
use sift_search::coordinator::DebouncedSearchCoordinator;
use sift_search::grep::{SearchMatch, matches_to_suggestions, parse_grep_output};
use sift_search::preview::SearchPreview;
use tokio::sync::mpsc;

/// Events produced off the main loop and drained by [`ContentSearchPlugin::pump`].
enum SearchEvent {
	Results(Vec<SearchMatch>),
}

/// Live content search over an external grep process.
///
/// One instance serves one prompt activation at a time: `open` arms a
/// session, `close` tears it down so a reopened prompt starts with
/// clean staleness bookkeeping.
pub struct ContentSearchPlugin {
	config: SearchConfig,
	coordinator: DebouncedSearchCoordinator,
	preview: SearchPreview,
	spawner: Arc<dyn ProcessSpawner>,
	diagnostics: Arc<dyn DiagnosticsSink>,
	matches: Vec<SearchMatch>,
	events_tx: mpsc::UnboundedSender<SearchEvent>,
	events_rx: mpsc::UnboundedReceiver<SearchEvent>,
	root: Option<PathBuf>,
}

impl ContentSearchPlugin {
	pub fn new(
		config: SearchConfig,
		files: Arc<dyn FileStore>,
		spawner: Arc<dyn ProcessSpawner>,
		diagnostics: Arc<dyn DiagnosticsSink>,
	) -> Self {
		let (events_tx, events_rx) = mpsc::unbounded_channel();
		Self {
			coordinator: DebouncedSearchCoordinator::new(&config, diagnostics.clone()),
			preview: SearchPreview::new(&config, files, diagnostics.clone()),
			config,
			spawner,
			diagnostics,
			matches: Vec::new(),
			events_tx,
			events_rx,
			root: None,
		}
	}

	/// Directory the search command runs in.
	pub fn set_root(&mut self, root: PathBuf) {
		self.root = Some(root);
	}

	/// Called when the search prompt opens: records the prompt's split
	/// so the preview can hand focus back after its first creation.
	pub fn open(&mut self, host: &mut dyn EditorHost) {
		self.preview.set_original_split(host.active_split());
	}

	/// Called on every prompt input change. Issues a debounced search;
	/// any previously running process is superseded immediately.
	pub fn on_input_changed(&mut self, query: &str) {
		let spec = CommandSpec {
			program: self.config.program.clone(),
			args: self.config.args.iter().cloned().chain([query.to_string()]).collect(),
			cwd: self.root.clone(),
		};
		let spawner = Arc::clone(&self.spawner);
		let executor = move || spawner.spawn(&spec);

		let events_tx = self.events_tx.clone();
		let diagnostics = Arc::clone(&self.diagnostics);
		let on_results = move |output: ProcessOutput| {
			// Exit code 1 is the grep convention for "no matches"; only
			// higher codes indicate a command failure worth surfacing.
			if output.exit_code > 1 && !output.stderr.is_empty() {
				diagnostics.report(&format!("search command failed: {}", output.stderr.trim_end()));
			}
			let _ = events_tx.send(SearchEvent::Results(parse_grep_output(&output.stdout)));
		};

		tokio::spawn(self.coordinator.search(query.to_string(), executor, on_results));
	}

	/// Drains pending results on the main loop and pushes them into the
	/// prompt's suggestion list. Returns whether anything changed.
	pub fn pump(&mut self, host: &mut dyn EditorHost) -> bool {
		let mut changed = false;
		while let Ok(event) = self.events_rx.try_recv() {
			match event {
				SearchEvent::Results(matches) => {
					tracing::debug!(count = matches.len(), "search results received");
					self.matches = matches;
					changed = true;
				}
			}
		}
		if changed {
			let suggestions = matches_to_suggestions(&self.matches, self.config.max_results);
			if let Err(err) = host.set_suggestions(suggestions) {
				self.diagnostics.report(&format!("suggestion update failed: {err}"));
			}
		}
		changed
	}

	/// Called when the highlighted suggestion changes; renders the match
	/// into the preview panel.
	pub async fn on_selection_changed(&mut self, host: &mut dyn EditorHost, index: usize) {
		let Some(selected) = self.matches.get(index).cloned() else {
			return;
		};
		self.preview.update(host, &selected).await;
	}

	/// Accepts a suggestion: opens the match location and ends the session.
	pub fn accept(&mut self, host: &mut dyn EditorHost, index: usize) {
		if let Some(selected) = self.matches.get(index).cloned() {
			if let Err(err) = host.open_location(&selected.file, selected.line, selected.column) {
				self.diagnostics.report(&format!("open location failed: {err}"));
			}
		}
		self.close(host);
	}

	/// Ends the session: cancels outstanding work, resets staleness
	/// bookkeeping, tears down the preview, and clears the suggestion
	/// list. Safe to call repeatedly.
	pub fn close(&mut self, host: &mut dyn EditorHost) {
		self.coordinator.reset();
		self.preview.close(host);
		self.matches.clear();
		// Results still queued from the closed session must not leak
		// into a reopened prompt.
		while self.events_rx.try_recv().is_ok() {}
		if let Err(err) = host.set_suggestions(Vec::new()) {
			self.diagnostics.report(&format!("suggestion clear failed: {err}"));
		}
	}

	pub fn preview_open(&self) -> bool {
		self.preview.is_open()
	}

	pub fn match_count(&self) -> usize {
		self.matches.len()
	}
}
