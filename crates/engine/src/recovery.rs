//! WAL replay: the cold-start path that rebuilds the memtable and the
//! sequence counter from disk.

use std::path::Path;

use entry::{Entry, Result};
use memtable::Memtable;
use wal::WalRecord;

/// Replays every segment in `wal_dir`, in chronological order, into `mem`.
///
/// A segment ending with a FLUSH marker is not replayed — its data already
/// reached an SSTable — but its records are still walked to fold their
/// sequence numbers into the returned maximum. Returns `0` if there are no
/// segments at all (a fresh database).
pub(crate) fn replay(wal_dir: &Path, mem: &mut Memtable) -> Result<u64> {
    let mut max_seq = 0u64;

    for segment in wal::discover_segments(wal_dir)? {
        let records = wal::read_all(&segment)?;
        let ends_with_flush = matches!(records.last(), Some(r) if r.is_flush());

        for record in &records {
            max_seq = max_seq.max(record.sequence());
        }

        if ends_with_flush {
            tracing::debug!(
                segment = %segment.display(),
                "segment ends with FLUSH marker, skipping replay"
            );
            continue;
        }

        let mut applied = 0usize;
        for record in records {
            match record {
                WalRecord::Put {
                    sequence,
                    timestamp,
                    key,
                    value,
                } => {
                    mem.insert(Entry::new_put(key, sequence, value, Some(timestamp))?);
                    applied += 1;
                }
                WalRecord::Delete {
                    sequence,
                    timestamp,
                    key,
                } => {
                    mem.insert(Entry::new_delete(key, sequence, Some(timestamp))?);
                    applied += 1;
                }
                WalRecord::Flush { .. } => {}
            }
        }
        tracing::info!(segment = %segment.display(), applied, "replayed WAL segment");
    }

    Ok(max_seq)
}
