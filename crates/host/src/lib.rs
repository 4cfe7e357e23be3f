#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Capability seams between the search feature and its editor host.
//!
//! The search core never talks to the editor, the filesystem, or the
//! process table directly; it consumes the narrow capabilities defined
//! here. Production implementations are tokio-backed, tests substitute
//! fakes.
//!
//! # Main Types
//!
//! - [`SearchProcess`] - A cancellable, awaitable external process handle
//! - [`ProcessSpawner`] - Factory capability for launching search commands
//! - [`FileStore`] - Whole-file read capability
//! - [`EditorHost`] - Buffer/split/mode/focus operations on the host editor
//! - [`DiagnosticsSink`] - One-way sink for non-fatal internal errors

pub mod diag;
pub mod fs;
pub mod process;
pub mod ui;


pub use diag::{DiagnosticsSink, TracingDiagnostics};
pub use fs::{FileError, FileStore, TokioFileStore};
pub use process::{
	CommandSpec, FnSpawner, ProcessCompletion, ProcessControl, ProcessError, ProcessOutput, ProcessSpawner,
	SearchProcess, TokioProcessSpawner,
};
pub use ui::{BufferId, EditorHost, HostError, ModeSpec, SplitDirection, SplitId, SplitSpec, Suggestion};
