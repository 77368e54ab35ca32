//! SSTable writer: a scoped builder that finalizes on success and
//! discards the partial file on any error or early drop.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use byteorder::{BigEndian, WriteBytesExt};
use chrono::Utc;
use entry::{Entry, Result, StorageError};

use crate::format::{Footer, Header, HEADER_LEN};

/// Default spacing between sparse index entries.
pub const DEFAULT_INDEX_INTERVAL: usize = 1_000;

const SSTABLE_PREFIX: &str = "sstable";

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs()
}

/// Composes a fresh SSTable path under `dir`, named
/// `sstable.<UTC_timestamp_YYYYMMDDHHMMSS>`, disambiguated with a numeric
/// suffix in the rare case that two flushes land in the same wall-clock
/// second. Mirrors the WAL segment writer's filename scheme.
fn next_sstable_path(dir: &Path, timestamp: &str) -> PathBuf {
    let base = format!("{SSTABLE_PREFIX}.{timestamp}");
    let candidate = dir.join(&base);
    if !candidate.exists() {
        return candidate;
    }
    let mut n = 1u64;
    loop {
        let candidate = dir.join(format!("{base}.{n}"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Builds a single immutable SSTable file.
///
/// Construction opens the file and writes a placeholder header. Each
/// [`add_entry`](SSTableWriter::add_entry) call enforces strict ascending
/// key order and appends one data record, periodically sampling into the
/// in-memory sparse index. [`finalize`](SSTableWriter::finalize) writes
/// the index and footer, then rewrites the header with the real counts,
/// consuming `self` on success. If the writer is dropped without being
/// finalized — including via an early return through `?` — the partially
/// written file is unlinked.
pub struct SSTableWriter {
    path: PathBuf,
    file: BufWriter<File>,
    index_interval: usize,
    feature_flags: u32,
    timestamp: u64,
    entry_count: u32,
    data_size: u64,
    last_key: Option<String>,
    sparse_index: Vec<(String, u64)>,
    data_crc: crc32fast::Hasher,
    finalized: bool,
}

impl SSTableWriter {
    /// Opens a new SSTable file under `dir` and writes its placeholder
    /// header. `index_interval` controls how often a (key, offset) pair
    /// is sampled into the sparse index; pass `0` to fall back to
    /// [`DEFAULT_INDEX_INTERVAL`].
    pub fn create(dir: &Path, feature_flags: u32, index_interval: usize) -> Result<Self> {
        std::fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;

        let timestamp = now_secs();
        let filename_timestamp = Utc::now().format("%Y%m%d%H%M%S").to_string();
        let path = next_sstable_path(dir, &filename_timestamp);
        let raw = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| StorageError::io(&path, e))?;
        let mut file = BufWriter::new(raw);

        let header = Header::placeholder(feature_flags, timestamp);
        header.write(&mut file)?;

        Ok(Self {
            path,
            file,
            index_interval: if index_interval == 0 {
                DEFAULT_INDEX_INTERVAL
            } else {
                index_interval
            },
            feature_flags,
            timestamp,
            entry_count: 0,
            data_size: 0,
            last_key: None,
            sparse_index: Vec::new(),
            data_crc: crc32fast::Hasher::new(),
            finalized: false,
        })
    }

    /// The path this writer is (or was) writing to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record to the data region. Rejects a key that is not
    /// strictly greater than the previous key (this also rejects
    /// duplicates outright).
    pub fn add_entry(&mut self, entry: &Entry) -> Result<()> {
        if let Some(last) = &self.last_key {
            if entry.key() <= last.as_str() {
                return Err(StorageError::validation(format!(
                    "SSTable writer requires strictly ascending keys: {:?} is not greater than {:?}",
                    entry.key(),
                    last
                )));
            }
        }

        let offset = HEADER_LEN + self.data_size;

        let key_bytes = entry.key().as_bytes();
        let value_bytes = entry.value().unwrap_or(&[]);

        let mut record = Vec::with_capacity(8 + 4 + key_bytes.len() + 4 + value_bytes.len());
        record.write_u64::<BigEndian>(entry.sequence())?;
        record.write_u32::<BigEndian>(key_bytes.len() as u32)?;
        record.extend_from_slice(key_bytes);
        record.write_u32::<BigEndian>(value_bytes.len() as u32)?;
        record.extend_from_slice(value_bytes);

        self.file
            .write_all(&record)
            .map_err(|e| StorageError::io(&self.path, e))?;
        self.data_crc.update(&record);
        self.data_size += record.len() as u64;

        let index_n = self.entry_count as usize;
        if index_n % self.index_interval == 0 {
            self.sparse_index.push((entry.key().to_string(), offset));
        }

        self.entry_count += 1;
        self.last_key = Some(entry.key().to_string());

        Ok(())
    }

    /// Writes the sparse index and footer, rewrites the header with the
    /// real entry count and data size, and fsyncs the file. Consumes the
    /// writer and returns the final path on success.
    pub fn finalize(mut self) -> Result<PathBuf> {
        let index_offset = HEADER_LEN + self.data_size;

        self.file
            .write_u32::<BigEndian>(self.sparse_index.len() as u32)
            .map_err(|e| StorageError::io(&self.path, e))?;
        for (key, offset) in &self.sparse_index {
            let key_bytes = key.as_bytes();
            self.file
                .write_u32::<BigEndian>(key_bytes.len() as u32)
                .map_err(|e| StorageError::io(&self.path, e))?;
            self.file
                .write_all(key_bytes)
                .map_err(|e| StorageError::io(&self.path, e))?;
            self.file
                .write_u64::<BigEndian>(*offset)
                .map_err(|e| StorageError::io(&self.path, e))?;
        }

        let footer = Footer {
            data_crc: self.data_crc.clone().finalize(),
            index_offset,
        };
        footer.write(&mut self.file)?;

        self.file.flush().map_err(|e| StorageError::io(&self.path, e))?;

        let mut raw = self
            .file
            .into_inner()
            .map_err(|e| StorageError::io(&self.path, e.into_error()))?;

        let header = Header {
            feature_flags: self.feature_flags,
            timestamp: self.timestamp,
            entry_count: self.entry_count,
            data_size: self.data_size,
        };
        raw.seek(SeekFrom::Start(0))
            .map_err(|e| StorageError::io(&self.path, e))?;
        header.write(&mut raw)?;
        raw.flush().map_err(|e| StorageError::io(&self.path, e))?;
        raw.sync_all().map_err(|e| StorageError::io(&self.path, e))?;

        self.finalized = true;
        let path = self.path.clone();
        Ok(path)
    }

    /// Explicitly discards this writer, unlinking the partially written
    /// file. Dropping the writer without calling `finalize` does this
    /// automatically.
    pub fn discard(mut self) {
        self.finalized = true; // suppress the Drop impl's own unlink attempt
        let _ = std::fs::remove_file(&self.path);
    }
}

impl Drop for SSTableWriter {
    fn drop(&mut self) {
        if !self.finalized {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
