//! # Memtable
//!
//! An in-memory, sorted, mutable write buffer for the storage engine.
//!
//! The memtable is the first point of contact for every write operation. It
//! buffers recent PUT and DELETE [`Entry`] values in a sorted structure
//! (`BTreeMap`) before they are flushed to immutable on-disk SSTables.
//!
//! ## Key properties
//! - **Sorted order**: entries are always in ascending key order (required for SSTable flush).
//! - **Replace-on-equal-key**: inserting an entry for a key that's already present
//!   replaces the stored entry outright; sequence-number monotonicity in the
//!   coordinator guarantees the replacement is always the newer write.
//! - **Tombstone support**: deletes are recorded as entries with `value == None`.
//! - **Entry-count size tracking**: the spec's flush threshold is expressed in
//!   entry count, which is sufficient per `SPEC_FULL.md` §4.2.
//!
//! ## Example
//! ```rust
//! use entry::Entry;
//! use memtable::Memtable;
//!
//! let mut m = Memtable::new();
//! m.insert(Entry::new_put("hello".into(), 1, b"world".to_vec(), None).unwrap());
//! assert_eq!(m.search("hello").unwrap().value(), Some(b"world".as_slice()));
//!
//! m.insert(Entry::new_delete("hello".into(), 2, None).unwrap());
//! assert!(m.search("hello").unwrap().is_tombstone());
//! ```

use entry::Entry;
use std::collections::BTreeMap;

/// An ordered, in-memory write buffer backed by a `BTreeMap`.
///
/// Insert-with-equal-key replaces the stored entry; the coordinator's
/// strictly monotonic sequence numbers guarantee that "replace" always means
/// "replace with newer". The memtable itself does not gate on sequence
/// number — it trusts the caller's ordering, matching `SPEC_FULL.md` §4.2.
#[derive(Debug, Default)]
pub struct Memtable {
    map: BTreeMap<String, Entry>,
}

impl Memtable {
    /// Creates a new, empty memtable.
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Inserts `entry`, replacing any existing entry for the same key.
    pub fn insert(&mut self, entry: Entry) {
        self.map.insert(entry.key().to_string(), entry);
    }

    /// Looks up the latest entry for `key`, whether it is a PUT or a
    /// tombstone DELETE. Callers distinguish the two via [`Entry::is_tombstone`].
    pub fn search(&self, key: &str) -> Option<&Entry> {
        self.map.get(key)
    }

    /// Returns an iterator over all entries in ascending key order.
    ///
    /// This includes tombstones. The ordering guarantee is provided by the
    /// underlying `BTreeMap` and is what the flush path relies on to satisfy
    /// the SSTable writer's strict-ordering requirement.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.map.values()
    }

    /// Returns the number of entries (including tombstones). This is the
    /// quantity the coordinator compares against the flush threshold.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the memtable contains zero entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
