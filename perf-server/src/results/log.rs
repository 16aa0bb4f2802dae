//! Append-only results log (one JSON object per line)
//!
//! The log exclusively owns its write handle. All appends go through a
//! single lock and each line is written and flushed as one unit before the
//! lock is released. There is no delete, truncate or rewrite operation.

use std::path::{Path, PathBuf};

use shared::error::AppError;
use shared::models::{LogRecordRef, Metadata, PerformanceResult};
use thiserror::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum ResultsLogError {
    #[error("results log I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode log record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("results log is closed")]
    Closed,
}

impl From<ResultsLogError> for AppError {
    fn from(err: ResultsLogError) -> Self {
        tracing::error!(error = %err, "Results log write failed");
        AppError::storage()
    }
}

pub type ResultsLogResult<T> = Result<T, ResultsLogError>;

/// Results log backed by a file opened in append mode
#[derive(Debug)]
pub struct ResultsLog {
    path: PathBuf,
    /// `None` once closed
    file: Mutex<Option<File>>,
}

impl ResultsLog {
    /// Open (or create) the log at `path`, creating the parent directory if needed
    pub async fn open(path: impl AsRef<Path>) -> ResultsLogResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        Ok(Self {
            path,
            file: Mutex::new(Some(file)),
        })
    }

    /// Path of the backing file, for readers that open their own handle
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record. Returns only after the whole line is written and flushed.
    pub async fn append(
        &self,
        metadata: &Metadata,
        result: &PerformanceResult,
    ) -> ResultsLogResult<()> {
        let mut line = serde_json::to_vec(&LogRecordRef { metadata, result })?;
        line.push(b'\n');

        let mut guard = self.file.lock().await;
        let file = guard.as_mut().ok_or(ResultsLogError::Closed)?;
        file.write_all(&line).await?;
        file.flush().await?;

        tracing::debug!(
            session_id = %result.session_id,
            events = result.events.len(),
            bytes = line.len(),
            "Appended results record"
        );
        Ok(())
    }

    /// Flush and release the write handle. Later appends fail with `Closed`.
    pub async fn close(&self) -> ResultsLogResult<()> {
        let Some(mut file) = self.file.lock().await.take() else {
            return Ok(());
        };
        file.flush().await?;
        file.sync_all().await?;
        tracing::info!(path = %self.path.display(), "Results log closed");
        Ok(())
    }
}
