//! Editor UI host surface consumed by the search feature.
//!
//! The host editor owns all buffer/split resources; the search side holds
//! back-reference ids and routes every mutation through [`EditorHost`].
//! The call convention is deliberately unspecified by the capability: an
//! implementation may apply operations in-process or forward them across
//! a plugin boundary.

use std::path::Path;

/// Host buffer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u64);

/// Host split identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplitId(pub u64);

/// Orientation of a newly created split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitDirection {
	Horizontal,
	Vertical,
}

/// A named buffer mode with key bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSpec {
	pub name: String,
	/// `(key, command)` pairs active while the mode is current.
	pub bindings: Vec<(String, String)>,
	pub read_only: bool,
}

/// Placement of a virtual buffer inside a new split.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSpec {
	/// Display name, e.g. `*Search Preview*`.
	pub name: String,
	/// Mode governing the buffer's key bindings.
	pub mode: String,
	/// Split size ratio in `0.0..=1.0`.
	pub ratio: f32,
	pub direction: SplitDirection,
	/// Stable identifier making repeated creation idempotent at the host.
	pub panel_id: String,
}

/// One prompt suggestion entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
	/// Text shown in the suggestion list.
	pub text: String,
	/// Optional secondary line, e.g. a source location.
	pub description: Option<String>,
	/// Value reported back when the entry is selected.
	pub value: String,
}

/// Failure modes of host UI operations.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
	#[error("unknown buffer {0:?}")]
	UnknownBuffer(BufferId),
	#[error("unknown split {0:?}")]
	UnknownSplit(SplitId),
	#[error("host backend error: {0}")]
	Backend(String),
}

/// Editor operations the search feature depends on.
pub trait EditorHost {
	/// Defines (or redefines) a named input mode.
	fn define_mode(&mut self, spec: &ModeSpec) -> Result<(), HostError>;

	/// Creates a virtual read-only buffer inside a new split and returns
	/// both handles. Repeated calls with the same `panel_id` are
	/// idempotent on the host side.
	fn create_preview_split(&mut self, spec: &SplitSpec, content: String) -> Result<(BufferId, SplitId), HostError>;

	/// Replaces a virtual buffer's content in place.
	fn set_buffer_content(&mut self, buffer: BufferId, content: String) -> Result<(), HostError>;

	fn close_buffer(&mut self, buffer: BufferId) -> Result<(), HostError>;

	fn close_split(&mut self, split: SplitId) -> Result<(), HostError>;

	/// Moves input focus to a split.
	fn focus_split(&mut self, split: SplitId) -> Result<(), HostError>;

	/// The split currently holding input focus.
	fn active_split(&self) -> SplitId;

	/// Replaces the prompt suggestion list.
	fn set_suggestions(&mut self, suggestions: Vec<Suggestion>) -> Result<(), HostError>;

	/// Opens a file at a 1-based line/column location.
	fn open_location(&mut self, path: &Path, line: usize, column: usize) -> Result<(), HostError>;
}
