//! # Database — LSM coordinator
//!
//! Ties the [`memtable`], [`wal`], and [`sstable`] crates into a single
//! embedded, single-writer key-value store.
//!
//! ## Write path
//!
//! 1. Allocate the next sequence number.
//! 2. Append the record to the WAL (fsynced before returning).
//! 3. Apply the mutation to the in-memory memtable.
//! 4. If the memtable's entry count reaches the flush threshold, flush it.
//!
//! ## Read path
//!
//! 1. Check the memtable first — a hit, PUT or DELETE, short-circuits.
//! 2. Otherwise check SSTables newest to oldest; first match wins.
//!
//! ## Crash safety
//!
//! Every WAL append is fsynced before the corresponding memtable mutation,
//! so a crash can only lose writes the caller was never told succeeded. A
//! flush finalizes (fsyncs) its SSTable *before* the WAL is rotated behind a
//! FLUSH marker — recovery trusts that marker as proof the segment's data
//! already reached disk elsewhere and skips replaying it.
//!
//! ## Filesystem layout
//!
//! ```text
//! base_path/
//!   sstables/   one immutable file per flush, named sstable.<timestamp>
//!   wal/        one or more segments, named current.wal.<timestamp>.<n>
//!   manifest/   reserved, created empty
//! ```

mod read;
mod recovery;
mod write;

use std::path::PathBuf;

use entry::{Result, StorageError};
use memtable::Memtable;
use wal::WalWriter;

/// Default memtable entry-count threshold that triggers a flush.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 1_000;

/// Open-time configuration: where the database lives and how large its
/// memtable is allowed to grow before an automatic flush.
#[derive(Debug, Clone)]
pub struct Options {
    pub base_path: PathBuf,
    pub flush_threshold: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            base_path: PathBuf::from(config::DEFAULT_BASE_PATH),
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
        }
    }
}

/// A single-writer, embedded LSM key-value store.
///
/// Not `Sync`/shareable across threads by design — see `SPEC_FULL.md` §5:
/// the engine assumes one writer and performs no internal locking.
pub struct Database {
    pub(crate) base_path: PathBuf,
    pub(crate) sstables_dir: PathBuf,
    pub(crate) mem: Memtable,
    pub(crate) wal_writer: WalWriter,
    pub(crate) seq: u64,
    pub(crate) flush_threshold: usize,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("base_path", &self.base_path)
            .field("seq", &self.seq)
            .field("flush_threshold", &self.flush_threshold)
            .field("memtable_entries", &self.mem.len())
            .finish()
    }
}

impl Database {
    /// Opens (or creates) a database at `options.base_path`.
    ///
    /// Ensures the `sstables/`, `wal/`, and `manifest/` subdirectories
    /// exist, opens a fresh WAL segment, then replays every prior segment
    /// that doesn't end with a FLUSH marker into a new memtable. The
    /// sequence counter resumes from the highest value observed across all
    /// segments, including ones skipped for replay.
    pub fn open(options: Options) -> Result<Self> {
        let base_path = options.base_path;
        let sstables_dir = base_path.join("sstables");
        let wal_dir = base_path.join("wal");
        let manifest_dir = base_path.join("manifest");

        for dir in [&base_path, &sstables_dir, &wal_dir, &manifest_dir] {
            std::fs::create_dir_all(dir).map_err(|e| StorageError::io(dir.as_path(), e))?;
        }

        let wal_writer = WalWriter::create(&wal_dir)?;

        let mut mem = Memtable::new();
        let seq = recovery::replay(&wal_dir, &mut mem)?;

        tracing::info!(base_path = %base_path.display(), seq, "database opened");

        Ok(Database {
            base_path,
            sstables_dir,
            mem,
            wal_writer,
            seq,
            flush_threshold: options.flush_threshold,
        })
    }

    /// The current monotonic sequence number.
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The configured flush threshold, in memtable entry count.
    #[must_use]
    pub fn flush_threshold(&self) -> usize {
        self.flush_threshold
    }

    /// Number of entries currently buffered in the memtable (including
    /// tombstones not yet flushed).
    #[must_use]
    pub fn memtable_len(&self) -> usize {
        self.mem.len()
    }

    /// Closes the database.
    ///
    /// Every mutation was already fsynced to the WAL as it happened, so
    /// there is nothing left to flush here; this simply drops the open WAL
    /// handle. No attempt is made to flush the memtable to an SSTable —
    /// recovery on the next `open` replays the WAL instead.
    pub fn close(self) {
        tracing::debug!(seq = self.seq, "database closed");
    }
}
