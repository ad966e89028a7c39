use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures_util::future::join_all;
use snapshot_logging::{snap_debug, snap_error};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::SnapshotEntry;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("could not create directory {path:?}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("could not write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("write task for {path:?} did not complete: {message}")]
    Task { path: PathBuf, message: String },
}

#[derive(Debug)]
pub struct WriteFailure {
    pub output_path: String,
    pub error: WriteError,
}

/// Persists snapshots below a working directory.
///
/// Each file is written to a temp file next to its destination and renamed
/// into place, replacing any previous snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    base_dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn resolve(&self, output_path: &str) -> PathBuf {
        self.base_dir.join(output_path)
    }

    pub fn write_blocking(&self, output_path: &str, markup: &[u8]) -> Result<PathBuf, WriteError> {
        let target = self.resolve(output_path);
        let parent = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base_dir.clone());
        fs::create_dir_all(&parent).map_err(|source| WriteError::CreateDir {
            path: parent.clone(),
            source,
        })?;

        let write_err = |source: io::Error| WriteError::Write {
            path: target.clone(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(&parent).map_err(write_err)?;
        tmp.write_all(markup).map_err(write_err)?;
        tmp.flush().map_err(write_err)?;
        tmp.persist(&target).map_err(|err| write_err(err.error))?;
        Ok(target)
    }

    pub async fn write(&self, output_path: &str, markup: Bytes) -> Result<PathBuf, WriteError> {
        let writer = self.clone();
        let owned_path = output_path.to_string();
        tokio::task::spawn_blocking(move || writer.write_blocking(&owned_path, &markup))
            .await
            .map_err(|err| WriteError::Task {
                path: self.resolve(output_path),
                message: err.to_string(),
            })?
    }

    /// Writes every entry concurrently and waits for all of them.
    ///
    /// A failing write does not stop the others; failures are logged and returned.
    pub async fn write_all(&self, entries: &[SnapshotEntry]) -> Vec<WriteFailure> {
        let writes = entries.iter().map(|entry| async move {
            let result = self.write(&entry.output_path, entry.page.markup.clone()).await;
            (entry.output_path.as_str(), result)
        });

        join_all(writes)
            .await
            .into_iter()
            .filter_map(|(output_path, result)| match result {
                Ok(path) => {
                    snap_debug!("Wrote {:?}", path);
                    None
                }
                Err(error) => {
                    snap_error!("Failed to write snapshot {}: {}", output_path, error);
                    Some(WriteFailure {
                        output_path: output_path.to_string(),
                        error,
                    })
                }
            })
            .collect()
    }
}
