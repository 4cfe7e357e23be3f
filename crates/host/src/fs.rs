//! Whole-file read capability.

use std::io;
use std::path::{Path, PathBuf};

/// Failure modes of host file access.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
	#[error("file not found: {0}")]
	NotFound(PathBuf),
	#[error("file read failure: {0}")]
	Io(#[from] io::Error),
}

/// Read-only file access as the host exposes it to the search feature.
#[async_trait::async_trait]
pub trait FileStore: Send + Sync {
	async fn read_to_string(&self, path: &Path) -> Result<String, FileError>;
}

/// Production file store backed by `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioFileStore;

#[async_trait::async_trait]
impl FileStore for TokioFileStore {
	async fn read_to_string(&self, path: &Path) -> Result<String, FileError> {
		tokio::fs::read_to_string(path).await.map_err(|err| {
			if err.kind() == io::ErrorKind::NotFound {
				FileError::NotFound(path.to_path_buf())
			} else {
				FileError::Io(err)
			}
		})
	}
}
