//! Tabular (CSV) export of the results log
//!
//! Two passes over the file:
//! 1. collect every distinct `eventName.attributeName` key
//! 2. emit the header, then one row per record in log order
//!
//! The header must be complete before the first row is sent, so pass 1
//! always finishes before streaming starts. Pass 2 stops at the byte offset
//! pass 1 reached, so rows always match the header even while appends continue.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use futures::{Stream, StreamExt, TryStreamExt, stream};
use shared::error::{AppError, ErrorCode};
use shared::models::PerformanceResult;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

/// Fixed leading columns of every export
pub const LEADING_COLUMNS: [&str; 2] = ["sessionId", "buildInfo"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("results log read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt record at line {line}: {source}")]
    Corrupted {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        tracing::error!(error = %err, "Results export failed");
        match err {
            ExportError::Io(_) => AppError::storage(),
            ExportError::Corrupted { .. } => AppError::new(ErrorCode::StorageCorrupted),
        }
    }
}

/// Sequential reader over complete log lines
///
/// A trailing line without its newline is an append still in progress and
/// is treated as end of file.
struct RecordReader<R> {
    reader: BufReader<R>,
    line: usize,
    /// Bytes of complete lines consumed so far
    consumed: u64,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> RecordReader<R> {
    fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            line: 0,
            consumed: 0,
            buf: Vec::new(),
        }
    }

    async fn next_record(&mut self) -> Result<Option<PerformanceResult>, ExportError> {
        loop {
            self.buf.clear();
            let n = self.reader.read_until(b'\n', &mut self.buf).await?;
            if n == 0 || !self.buf.ends_with(b"\n") {
                return Ok(None);
            }
            self.line += 1;
            self.consumed += n as u64;

            if self.buf.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let result = serde_json::from_slice(&self.buf).map_err(|source| {
                ExportError::Corrupted {
                    line: self.line,
                    source,
                }
            })?;
            return Ok(Some(result));
        }
    }
}

/// Column set discovered by pass 1
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportColumns {
    /// Sorted, deduplicated attribute column keys
    keys: Vec<String>,
    /// Byte length of the log prefix the keys were collected from
    snapshot_len: u64,
}

impl ExportColumns {
    /// Pass 1: scan the whole log and collect column keys
    pub async fn scan(path: &Path) -> Result<Self, ExportError> {
        let mut reader = RecordReader::new(File::open(path).await?);
        let mut keys = BTreeSet::new();
        while let Some(result) = reader.next_record().await? {
            keys.extend(result.column_values().map(|(key, _)| key));
        }
        Ok(Self {
            keys: keys.into_iter().collect(),
            snapshot_len: reader.consumed,
        })
    }

    /// Collect column keys from in-memory results
    #[cfg(test)]
    fn from_results<'a>(results: impl IntoIterator<Item = &'a PerformanceResult>) -> Self {
        let keys: BTreeSet<String> = results
            .into_iter()
            .flat_map(|result| result.column_values().map(|(key, _)| key))
            .collect();
        Self {
            keys: keys.into_iter().collect(),
            snapshot_len: 0,
        }
    }

    /// Attribute-derived column keys, lexicographically sorted
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn header_row(&self) -> Vec<&str> {
        LEADING_COLUMNS
            .iter()
            .copied()
            .chain(self.keys.iter().map(String::as_str))
            .collect()
    }

    /// One row aligned with [`header_row`](Self::header_row).
    ///
    /// If a key repeats within the record, the last occurrence wins.
    pub fn render_row<'a>(&self, result: &'a PerformanceResult) -> Vec<&'a str> {
        let values: HashMap<String, &str> = result.column_values().collect();

        let mut row = Vec::with_capacity(LEADING_COLUMNS.len() + self.keys.len());
        row.push(result.session_id.as_str());
        row.push(result.build_info.as_str());
        row.extend(
            self.keys
                .iter()
                .map(|key| values.get(key).copied().unwrap_or("")),
        );
        row
    }
}

fn field_needs_quotes(field: &str) -> bool {
    if field.is_empty() {
        return false;
    }
    field.contains([',', '"', '\r', '\n']) || field.starts_with(char::is_whitespace)
}

/// Encode one CSV record terminated by `\n`
pub fn csv_line<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        let field = field.as_ref();
        if field_needs_quotes(field) {
            line.push('"');
            line.push_str(&field.replace('"', "\"\""));
            line.push('"');
        } else {
            line.push_str(field);
        }
    }
    line.push('\n');
    line
}

/// Run pass 1, then return a stream of the header followed by every row.
///
/// Errors before the header is produced are returned directly. An error
/// during pass 2 ends the stream; output already sent stays sent.
pub async fn csv_stream(
    path: PathBuf,
) -> Result<impl Stream<Item = Result<Bytes, ExportError>> + Send + 'static, ExportError> {
    let columns = ExportColumns::scan(&path).await?;
    let header = Bytes::from(csv_line(&columns.header_row()));

    let file = File::open(&path).await?;
    let reader = RecordReader::new(file.take(columns.snapshot_len));

    let rows = stream::try_unfold((reader, columns), |(mut reader, columns)| async move {
        let next = reader.next_record().await?;
        Ok::<_, ExportError>(next.map(|result| {
            let line = Bytes::from(csv_line(&columns.render_row(&result)));
            (line, (reader, columns))
        }))
    })
    .inspect_err(|err| tracing::error!(error = %err, "Export aborted mid-stream"));

    Ok(stream::once(async move { Ok::<_, ExportError>(header) }).chain(rows))
}
