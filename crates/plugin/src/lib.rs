#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Content-search plugin: the wiring between a search prompt and the
//! debounced search core.
//!
//! The host editor forwards prompt lifecycle events (open, input
//! change, selection change, accept, close) to [`ContentSearchPlugin`];
//! results come back to the main loop through [`ContentSearchPlugin::pump`].

pub mod config;
pub mod content_search;

pub use config::{load_config, parse_config};
pub use content_search::ContentSearchPlugin;
