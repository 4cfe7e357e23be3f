//! Debounced, cancellable, versioned search execution.
//!
//! [`DebouncedSearchCoordinator`] owns the per-activation
//! [`SearchSession`] and guarantees that at most one logical search is
//! in flight: a newer query immediately initiates termination of the
//! previous external process, and a monotonic version counter is the
//! sole arbiter of staleness. Every suspension point re-checks the
//! captured version before producing any observable effect, so a slow
//! superseded search can neither deliver results nor leak its process.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use sift_host::diag::DiagnosticsSink;
use sift_host::process::{ProcessControl, ProcessError, ProcessOutput, SearchProcess};

use crate::config::SearchConfig;

/// Mutable search bookkeeping for one UI activation.
///
/// `version` strictly increases on every issued search; `last_query`
/// records the last query whose execution was committed, suppressing
/// re-execution of an unchanged query. At most one process control is
/// owned at any instant; starting a new search moves the previous one
/// into `pending_termination` before anything else happens.
#[derive(Default)]
struct SearchSession {
	version: u64,
	last_query: Option<String>,
	active: Option<ProcessControl>,
	pending_termination: Option<ProcessControl>,
}

/// Coordinates debounced execution of external search processes.
pub struct DebouncedSearchCoordinator {
	session: Arc<Mutex<SearchSession>>,
	debounce: Duration,
	min_query_len: usize,
	diagnostics: Arc<dyn DiagnosticsSink>,
}

impl DebouncedSearchCoordinator {
	pub fn new(config: &SearchConfig, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
		Self {
			session: Arc::new(Mutex::new(SearchSession::default())),
			debounce: config.debounce(),
			min_query_len: config.min_query_len,
			diagnostics,
		}
	}

	/// Issues a search for `query`.
	///
	/// The version bump and the kill of any previously active process
	/// happen synchronously, before this returns; the returned future
	/// carries the debounce wait, the execution, and the at-most-once
	/// delivery to `on_results`. Dropping the future without polling it
	/// to completion only forfeits this call's own delivery — the
	/// supersession side effects have already taken place.
	pub fn search<E, F>(&self, query: String, executor: E, on_results: F) -> impl Future<Output = ()> + Send + 'static
	where
		E: FnOnce() -> Result<SearchProcess, ProcessError> + Send + 'static,
		F: FnOnce(ProcessOutput) + Send + 'static,
	{
		let session = Arc::clone(&self.session);
		let diagnostics = Arc::clone(&self.diagnostics);
		let debounce = self.debounce;
		let min_query_len = self.min_query_len;

		let this_version = {
			let mut s = session.lock();
			s.version += 1;
			if let Some(active) = s.active.take() {
				active.request_termination();
				s.pending_termination = Some(active);
			}
			s.version
		};
		tracing::trace!(version = this_version, query_len = query.len(), "search issued");

		async move {
			if query.trim().chars().count() < min_query_len {
				// No search for short input, but the previous process's
				// cleanup must still be observed.
				reap_pending(&session).await;
				return;
			}

			tokio::time::sleep(debounce).await;
			reap_pending(&session).await;

			let completion = {
				let mut s = session.lock();
				if s.version != this_version {
					return;
				}
				if s.last_query.as_deref() == Some(query.as_str()) {
					tracing::trace!(version = this_version, "unchanged query suppressed");
					return;
				}
				s.last_query = Some(query.clone());
				let process = match executor() {
					Ok(process) => process,
					Err(err) => {
						drop(s);
						diagnostics.report(&format!("search spawn failed: {err}"));
						return;
					}
				};
				let (control, completion) = process.split();
				s.active = Some(control);
				completion
			};
			tracing::debug!(version = this_version, "search process started");

			match completion.wait().await {
				Ok(output) => {
					if clear_active_if_current(&session, this_version) {
						on_results(output);
					}
					// Stale success: a later call superseded this one and
					// owns the session now; discard silently.
				}
				Err(ProcessError::Terminated) => {
					// Deliberate kill; never a diagnostic.
				}
				Err(err) => {
					if clear_active_if_current(&session, this_version) {
						diagnostics.report(&format!("search process failed: {err}"));
					}
				}
			}
		}
	}

	/// Terminates any active process and releases ownership. Leaves
	/// `version` and `last_query` untouched. Idempotent.
	pub fn cancel(&self) {
		let mut s = self.session.lock();
		if let Some(active) = s.active.take() {
			active.request_termination();
			s.pending_termination = Some(active);
		}
	}

	/// Cancels, then clears the staleness bookkeeping so a freshly
	/// reopened search session starts from version zero.
	pub fn reset(&self) {
		self.cancel();
		let mut s = self.session.lock();
		s.last_query = None;
		s.version = 0;
	}

	#[cfg(test)]
	pub(crate) fn version(&self) -> u64 {
		self.session.lock().version
	}

	#[cfg(test)]
	pub(crate) fn last_query(&self) -> Option<String> {
		self.session.lock().last_query.clone()
	}

	#[cfg(test)]
	pub(crate) fn has_active_process(&self) -> bool {
		self.session.lock().active.is_some()
	}
}

/// Awaits the pending termination, if one has not been observed yet.
async fn reap_pending(session: &Mutex<SearchSession>) {
	let pending = session.lock().pending_termination.take();
	if let Some(pending) = pending {
		pending.terminated().await;
	}
}

/// Clears process ownership when `version` is still current; a stale
/// caller must not touch the session, it belongs to its successor.
fn clear_active_if_current(session: &Mutex<SearchSession>, version: u64) -> bool {
	let mut s = session.lock();
	if s.version == version {
		s.active = None;
		true
	} else {
		false
	}
}
