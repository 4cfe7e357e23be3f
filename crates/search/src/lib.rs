#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Live content search for an editor prompt.
//!
//! Every keystroke in the search prompt issues a query; each query may
//! spawn a long-running external grep process. This crate guarantees
//! that only the most recent query's result ever reaches the UI, that
//! superseded processes are killed and reaped, that unchanged queries
//! are not re-executed, and that the preview panel tracking the
//! highlighted match creates its UI resources lazily and tears them
//! down deterministically.
//!
//! # Main Types
//!
//! - [`DebouncedSearchCoordinator`] - At most one logical in-flight search
//! - [`SearchPreview`] - Preview split lifecycle and rendering
//! - [`SearchMatch`] - One parsed `file:line:column:content` match
//! - [`SearchConfig`] - Feature tunables and the external search command

pub mod config;
pub mod coordinator;
pub mod grep;
pub mod preview;

pub use config::SearchConfig;
pub use coordinator::DebouncedSearchCoordinator;
pub use grep::{SearchMatch, matches_to_suggestions, parse_grep_line, parse_grep_output};
pub use preview::SearchPreview;
