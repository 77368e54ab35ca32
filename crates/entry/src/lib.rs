//! # Entry
//!
//! The canonical database entry format shared by the memtable, the WAL, and
//! SSTables. Unifying the three around one type means a record read back
//! from the WAL and one read back from an SSTable are the same Rust value.
//!
//! ## Example
//!
//! ```rust
//! use entry::{Entry, EntryKind};
//!
//! let e = Entry::new_put("user:1".to_string(), 1, b"alice".to_vec(), None).unwrap();
//! assert_eq!(e.kind(), EntryKind::Put);
//! assert!(!e.is_tombstone());
//!
//! let d = Entry::new_delete("user:1".to_string(), 2, None).unwrap();
//! assert!(d.is_tombstone());
//! assert!(d < e || e < d); // total order by (key, sequence)
//! ```

pub mod error;

pub use error::{ErrorKind, Result, StorageError};

use std::cmp::Ordering;

/// Maximum encoded key length, in bytes. Shared by the WAL and SSTable layers.
pub const MAX_KEY_BYTES: usize = 65_536;

/// Maximum value length, in bytes. Shared by the WAL and SSTable layers.
pub const MAX_VALUE_BYTES: usize = 1_048_576;

/// The operation an [`Entry`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Put,
    Delete,
}

/// A single database record: a key, the sequence number that produced it,
/// whether it is a PUT or a tombstone DELETE, and (for PUT) its value.
///
/// `timestamp` is set by the WAL layer when a record is written and is not
/// preserved across an SSTable round-trip (SSTables do not carry a
/// per-entry timestamp field; see `SPEC_FULL.md` §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    key: String,
    sequence: u64,
    kind: EntryKind,
    value: Option<Vec<u8>>,
    timestamp: Option<u64>,
}

impl Entry {
    /// Constructs a PUT entry. Fails if `key` is empty or exceeds
    /// [`MAX_KEY_BYTES`], or if `value` exceeds [`MAX_VALUE_BYTES`].
    pub fn new_put(
        key: String,
        sequence: u64,
        value: Vec<u8>,
        timestamp: Option<u64>,
    ) -> Result<Self> {
        validate_key(&key)?;
        validate_value(&value)?;
        Ok(Entry {
            key,
            sequence,
            kind: EntryKind::Put,
            value: Some(value),
            timestamp,
        })
    }

    /// Constructs a DELETE (tombstone) entry. Fails if `key` is empty or
    /// exceeds [`MAX_KEY_BYTES`].
    pub fn new_delete(key: String, sequence: u64, timestamp: Option<u64>) -> Result<Self> {
        validate_key(&key)?;
        Ok(Entry {
            key,
            sequence,
            kind: EntryKind::Delete,
            value: None,
            timestamp,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    pub fn into_value(self) -> Option<Vec<u8>> {
        self.value
    }

    pub fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self.kind, EntryKind::Delete)
    }
}

/// Total order by key ascending, then by sequence ascending: for equal keys
/// the entry with the higher sequence is "newer" and sorts greater.
impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StorageError::validation("key must not be empty"));
    }
    if key.len() > MAX_KEY_BYTES {
        return Err(StorageError::validation(format!(
            "key length {} exceeds maximum of {} bytes",
            key.len(),
            MAX_KEY_BYTES
        )));
    }
    Ok(())
}

pub fn validate_value(value: &[u8]) -> Result<()> {
    if value.len() > MAX_VALUE_BYTES {
        return Err(StorageError::validation(format!(
            "value length {} exceeds maximum of {} bytes",
            value.len(),
            MAX_VALUE_BYTES
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
