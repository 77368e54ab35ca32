//! # WAL — Write-Ahead Log
//!
//! Provides crash-safe durability for the storage engine.
//!
//! Every mutation (PUT or DELETE) is serialized into a binary record and
//! appended to the current segment **before** the corresponding in-memory
//! update happens. On restart, the segments are replayed in order to
//! reconstruct the memtable, so no write the caller was told succeeded can
//! be lost.
//!
//! ## Binary record format
//!
//! ```text
//! [4B CRC32][8B sequence][8B timestamp][1B kind][4B key_len][4B value_len][key][value]
//! ```
//!
//! All integers are big-endian. `kind` is 1 = PUT, 2 = DELETE, 3 = FLUSH.
//! The CRC32 covers the 25-byte header-sans-CRC plus the key and value
//! bytes. A FLUSH record carries the string `FLUSH:<sstable_id>` in the key
//! field and an empty value; it marks the point at which a segment's data
//! was durably absorbed into an SSTable.
//!
//! ## Segments
//!
//! The WAL directory holds zero or more segment files named
//! `current.wal.<UTC timestamp>.<counter>`. Exactly one is open for writes
//! at a time; [`rotate`](WalWriter::rotate) closes it behind a FLUSH marker
//! and opens a fresh one. [`discover_segments`] returns every segment in
//! the directory in replay order.

mod reader;
mod record;
mod segment;
mod writer;

pub use reader::{ends_with_flush, read_all};
pub use record::{WalRecord, FLUSH_KEY_PREFIX};
pub use segment::discover_segments;
pub use writer::{current_timestamp, WalWriter};

pub use entry::{ErrorKind, Result, StorageError};

#[cfg(test)]
mod tests;
