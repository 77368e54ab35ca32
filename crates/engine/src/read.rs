//! Read path: `get()`.
//!
//! Checks the memtable first (freshest data, including tombstones), then
//! SSTables from newest to oldest. The first entry found for the key wins,
//! whether it resolves to a value or to "not found" via a tombstone.

use entry::Result;
use sstable::SSTableReader;

use crate::Database;

impl Database {
    /// Looks up `key`, returning its value if a live PUT is found.
    ///
    /// A tombstone — in the memtable or in any SSTable — immediately
    /// resolves the lookup to "not found", even if an older SSTable holds a
    /// value for the same key: only the newest entry for a key matters.
    ///
    /// SSTables that fail to open or fail mid-read are logged and skipped;
    /// the lookup continues with the next-oldest file rather than failing
    /// outright.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(entry) = self.mem.search(key) {
            return Ok(entry.value().map(|v| v.to_vec()));
        }

        for path in sstable::list_sstables_newest_first(&self.sstables_dir)? {
            let reader = match SSTableReader::open(&path) {
                Ok(reader) => reader,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to open SSTable, skipping");
                    continue;
                }
            };

            match reader.get(key) {
                Ok(Some(entry)) => return Ok(entry.into_value()),
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to read SSTable, skipping");
                    continue;
                }
            }
        }

        Ok(None)
    }
}
