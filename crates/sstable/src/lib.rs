//! # SSTable — Sorted String Table
//!
//! Immutable, on-disk storage files for the storage engine.
//!
//! When the in-memory memtable reaches its flush threshold, the engine
//! writes it out as an SSTable: a sorted, write-once file with a fixed
//! header, a data region, a sparse index, and a fixed footer. SSTables are
//! never modified after they are finalized.
//!
//! ## File layout
//!
//! ```text
//! [HEADER  fixed, 50 bytes]
//! [DATA    sorted records: seq | key_len | key | value_len | value]
//! [INDEX   index_count | (key_len, key, offset) × index_count]
//! [FOOTER  fixed, 16 bytes: data_crc | index_offset | footer_crc]
//! ```
//!
//! All integers are big-endian. See [`format`] for the exact byte layout.
//!
//! A DELETE entry serializes with `value_len = 0`; on read, a zero value
//! length decodes back to DELETE. This means an SSTable cannot distinguish
//! a tombstone from a PUT of an empty value — by design, per the on-disk
//! contract (see `DESIGN.md`).

mod discovery;
pub mod format;
mod reader;
mod writer;

pub use discovery::{list_sstables_newest_first, list_sstables_oldest_first};
pub use reader::SSTableReader;
pub use writer::{SSTableWriter, DEFAULT_INDEX_INTERVAL};

pub use entry::{ErrorKind, Result, StorageError};

#[cfg(test)]
mod tests;
