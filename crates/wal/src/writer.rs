//! Append-only WAL segment writer.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use entry::{Result, StorageError};

use crate::record::WalRecord;
use crate::segment::next_segment_path;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs()
}

/// Owns the currently-open WAL segment and appends framed records to it.
///
/// Every [`write`](WalWriter::write) flushes user-space buffers and issues
/// an `fsync` before returning, so a successful return means the record is
/// durable. The coordinator must call `write` and observe success before
/// mutating the memtable for the same operation.
pub struct WalWriter {
    dir: PathBuf,
    path: PathBuf,
    file: File,
}

impl WalWriter {
    /// Opens a brand-new segment in `dir`, creating the directory if
    /// necessary.
    pub fn create(dir: &Path) -> Result<Self> {
        let path = next_segment_path(dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(&path)
            .map_err(|e| StorageError::io(&path, e))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            path,
            file,
        })
    }

    /// The path of the segment currently being written to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validates, serializes, and durably appends `record`, returning the
    /// byte offset within the segment at which it was written.
    pub fn write(&mut self, record: &WalRecord) -> Result<u64> {
        record.validate()?;

        let offset = self
            .file
            .metadata()
            .map_err(|e| StorageError::io(&self.path, e))?
            .len();

        let bytes = record.encode();
        self.file
            .write_all(&bytes)
            .map_err(|e| StorageError::io(&self.path, e))?;
        self.file
            .flush()
            .map_err(|e| StorageError::io(&self.path, e))?;
        self.file
            .sync_all()
            .map_err(|e| StorageError::io(&self.path, e))?;

        Ok(offset)
    }

    /// Writes a terminal FLUSH marker referencing `sstable_id` at
    /// sequence `seq`, then closes this segment and opens a fresh one in
    /// the same directory. Returns the path of the segment that was just
    /// rotated out.
    ///
    /// Callers must only rotate after the named SSTable has been durably
    /// finalized; a FLUSH marker asserts that everything before it in the
    /// segment has already been persisted elsewhere.
    pub fn rotate(&mut self, sstable_id: &str, seq: u64) -> Result<PathBuf> {
        let marker = WalRecord::Flush {
            sequence: seq,
            timestamp: now_secs(),
            sstable_id: sstable_id.to_string(),
        };
        self.write(&marker)?;

        let old_path = self.path.clone();
        let fresh = WalWriter::create(&self.dir)?;
        *self = fresh;
        Ok(old_path)
    }
}

/// Returns the current wall-clock time in seconds since the Unix epoch,
/// used to stamp every record's `timestamp` field at write time.
pub fn current_timestamp() -> u64 {
    now_secs()
}
