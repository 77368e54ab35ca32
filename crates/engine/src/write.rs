//! Write path: `put()`, `delete()`, and the internal `flush()`.
//!
//! Every mutation is appended to the WAL before it touches the memtable. If
//! the WAL append fails — including validation failures such as an
//! oversized key — the sequence number allocated for the attempt is still
//! consumed and the memtable is left untouched.

use entry::{Entry, Result};
use sstable::SSTableWriter;
use wal::WalRecord;

use crate::Database;

impl Database {
    /// Inserts a key-value pair.
    ///
    /// Allocates the next sequence number, appends a PUT record to the WAL,
    /// then inserts the entry into the memtable. Triggers a flush if the
    /// memtable's entry count has reached the configured threshold.
    pub fn put(&mut self, key: String, value: Vec<u8>) -> Result<()> {
        self.seq += 1;
        let seq = self.seq;
        let timestamp = wal::current_timestamp();

        self.wal_writer.write(&WalRecord::Put {
            sequence: seq,
            timestamp,
            key: key.clone(),
            value: value.clone(),
        })?;

        self.mem.insert(Entry::new_put(key, seq, value, Some(timestamp))?);

        if self.mem.len() >= self.flush_threshold {
            self.flush()?;
        }
        Ok(())
    }

    /// Deletes a key by writing a tombstone.
    ///
    /// Same durability ordering as [`put`](Database::put): the WAL record is
    /// appended before the memtable is mutated.
    pub fn delete(&mut self, key: String) -> Result<()> {
        self.seq += 1;
        let seq = self.seq;
        let timestamp = wal::current_timestamp();

        self.wal_writer.write(&WalRecord::Delete {
            sequence: seq,
            timestamp,
            key: key.clone(),
        })?;

        self.mem.insert(Entry::new_delete(key, seq, Some(timestamp))?);

        if self.mem.len() >= self.flush_threshold {
            self.flush()?;
        }
        Ok(())
    }

    /// Flushes the memtable to a new SSTable, then rotates the WAL behind a
    /// FLUSH marker referencing it.
    ///
    /// If writing the SSTable fails partway through, the partially written
    /// file is unlinked by `SSTableWriter`'s own drop-on-unwind behavior and
    /// the WAL is not rotated — the entries remain in the (unflushed)
    /// segment for the next recovery to replay.
    pub(crate) fn flush(&mut self) -> Result<()> {
        let mut writer = SSTableWriter::create(&self.sstables_dir, 0, sstable::DEFAULT_INDEX_INTERVAL)?;
        for entry in self.mem.iter() {
            writer.add_entry(entry)?;
        }
        let sstable_path = writer.finalize()?;
        let sstable_id = sstable_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        self.seq += 1;
        self.wal_writer.rotate(&sstable_id, self.seq)?;

        self.mem = memtable::Memtable::new();
        tracing::info!(sstable = %sstable_id, "flushed memtable to SSTable");
        Ok(())
    }
}
