//! Append-only JSON lines store.

use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

use super::{MetadataStore, Result};
use crate::models::record::FileRecord;

/// Where the next record lands in the file.
#[derive(Debug, Clone, Copy)]
struct Tail {
    /// Lines already in the file, a torn last line included.
    lines: usize,
    /// The file does not end with a newline.
    torn: bool,
}

/// Appends one JSON document per line to a file.
///
/// The id returned for a record is its 1-based line number. The file is
/// scanned once, on the first insert; later ids are counted in memory.
pub struct JsonlStore {
    path: PathBuf,
    tail: Mutex<Option<Tail>>,
}

impl JsonlStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            tail: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every record written so far, skipping lines that do not parse.
    pub async fn records(&self) -> Result<Vec<FileRecord>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping line {} of {}: {}", index + 1, self.path.display(), e),
            }
        }
        Ok(records)
    }

    async fn scan(&self) -> Result<Tail> {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let newlines = content.iter().filter(|b| **b == b'\n').count();
        let torn = content.last().is_some_and(|b| *b != b'\n');
        Ok(Tail {
            lines: newlines + usize::from(torn),
            torn,
        })
    }
}

impl MetadataStore for JsonlStore {
    async fn insert(&self, record: &FileRecord) -> Result<String> {
        let json = serde_json::to_string(record)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut guard = self.tail.lock().await;
        let tail = match *guard {
            Some(tail) => tail,
            None => self.scan().await?,
        };

        // Never glue a record onto a half-written line
        let mut line = String::with_capacity(json.len() + 2);
        if tail.torn {
            line.push('\n');
        }
        line.push_str(&json);
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        let id = tail.lines + 1;
        *guard = Some(Tail {
            lines: id,
            torn: false,
        });
        Ok(id.to_string())
    }
}
