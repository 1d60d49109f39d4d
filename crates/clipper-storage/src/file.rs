use crate::error::map_io_error;
use crate::memory::InMemoryRepository;
use async_trait::async_trait;
use clipper_core::repository::Result;
use clipper_core::{
    BatchEntry, BatchItem, PutOutcome, Repository, Slug, Stats, StorageError, UrlRecord,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

#[cfg(unix)]
const LOG_FILE_MODE: u32 = 0o600;

/// One line of the append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Synthetic sequence id, increasing by one per appended line.
    pub uuid: String,
    pub user_id: String,
    pub short_url: String,
    pub original_url: String,
}

#[derive(Debug)]
struct LogWriter {
    file: File,
    last_seq: u64,
}

impl LogWriter {
    async fn append(&mut self, slug: &Slug, original_url: &str, owner: &str) -> Result<()> {
        let record = LogRecord {
            uuid: (self.last_seq + 1).to_string(),
            user_id: owner.to_owned(),
            short_url: slug.as_str().to_owned(),
            original_url: original_url.to_owned(),
        };

        let mut line = serde_json::to_vec(&record)
            .map_err(|e| StorageError::InvalidData(format!("encode log record: {e}")))?;
        line.push(b'\n');

        self.file
            .write_all(&line)
            .await
            .map_err(|e| map_io_error("append log record", e))?;
        self.last_seq += 1;
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.file
            .flush()
            .await
            .map_err(|e| map_io_error("flush log", e))
    }
}

/// File-backed implementation of [`Repository`].
///
/// Reads are served from an [`InMemoryRepository`]. Every stored record is
/// first applied to memory and then appended as one JSON line to the log,
/// so a crash between the two steps loses the line. On open the whole log
/// is replayed in order; a slug that appears more than once keeps its last
/// line.
///
/// Deletions only touch the in-memory map and are not written to the log:
/// deleted records come back after a restart.
#[derive(Debug)]
pub struct FileRepository {
    path: PathBuf,
    memory: InMemoryRepository,
    writer: Mutex<Option<LogWriter>>,
}

impl FileRepository {
    /// Opens (creating if needed) the log at `path` and replays it.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        options.mode(LOG_FILE_MODE);
        let file = options
            .open(&path)
            .await
            .map_err(|e| map_io_error(&format!("open log {}", path.display()), e))?;

        let memory = InMemoryRepository::new();
        let replayed = replay(&path, &memory).await?;
        info!(
            path = %path.display(),
            lines = replayed,
            records = memory.len(),
            "replayed url log"
        );

        Ok(Self {
            path,
            memory,
            writer: Mutex::new(Some(LogWriter {
                file,
                last_seq: replayed,
            })),
        })
    }

    /// Location of the log on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Folds every log line into `memory`, returning the number of records read.
async fn replay(path: &Path, memory: &InMemoryRepository) -> Result<u64> {
    let file = File::open(path)
        .await
        .map_err(|e| map_io_error("open log for replay", e))?;
    let mut lines = BufReader::new(file).lines();
    let mut line_number = 0_u64;
    let mut records = 0_u64;

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| map_io_error("read log", e))?
    {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }

        let record: LogRecord = serde_json::from_str(&line).map_err(|e| {
            StorageError::InvalidData(format!(
                "{} line {}: {}",
                path.display(),
                line_number,
                e
            ))
        })?;
        memory.insert(
            &Slug::new_unchecked(record.short_url),
            &record.original_url,
            &record.user_id,
        );
        records += 1;
    }

    Ok(records)
}

#[async_trait]
impl Repository for FileRepository {
    async fn get(&self, slug: &Slug) -> Result<Option<UrlRecord>> {
        self.memory.get(slug).await
    }

    async fn put(&self, slug: &Slug, original_url: &str, owner: &str) -> Result<PutOutcome> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(StorageError::Closed)?;

        self.memory.insert(slug, original_url, owner);
        writer.append(slug, original_url, owner).await?;
        writer.flush().await?;

        Ok(PutOutcome::Created(slug.clone()))
    }

    async fn put_batch(&self, items: &[BatchItem], owner: &str) -> Result<Vec<BatchEntry>> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(StorageError::Closed)?;

        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            self.memory.insert(&item.slug, &item.original_url, owner);
            writer.append(&item.slug, &item.original_url, owner).await?;
            entries.push(BatchEntry {
                correlation_id: item.correlation_id.clone(),
                slug: item.slug.clone(),
            });
        }
        writer.flush().await?;

        Ok(entries)
    }

    async fn get_all_by_owner(&self, owner: &str) -> Result<Vec<UrlRecord>> {
        self.memory.get_all_by_owner(owner).await
    }

    async fn delete_many(&self, slugs: &[Slug], owner: &str) -> Result<()> {
        // In-memory only; the log has no deletion records.
        debug!(count = slugs.len(), owner = %owner, "deleting from memory, not persisted");
        self.memory.delete_many(slugs, owner).await
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn stats(&self) -> Result<Stats> {
        self.memory.stats().await
    }

    async fn close(&self) {
        let Some(mut writer) = self.writer.lock().await.take() else {
            return;
        };
        if let Err(err) = writer.flush().await {
            error!(path = %self.path.display(), error = %err, "failed to flush url log on close");
        }
        info!(path = %self.path.display(), "closed url log");
    }
}
