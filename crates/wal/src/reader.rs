//! Resilient, whole-segment WAL scanning.

use std::fs;
use std::path::Path;

use entry::{Result, StorageError};

use crate::record::WalRecord;

/// Reads every recognizable record out of the segment at `path`.
///
/// The parser tolerates truncation (a partial record left by a crash
/// mid-write) and intra-record corruption (a flipped bit anywhere in a
/// record). Whenever the bytes at the current offset don't decode into a
/// valid record — failed CRC, a length field past the configured maxima,
/// or invalid UTF-8 in the key — it logs the offset, advances one byte,
/// and tries again from there. Scanning stops at end of file. It is not
/// an error for a segment to contain zero valid records.
pub fn read_all(path: &Path) -> Result<Vec<WalRecord>> {
    let data = fs::read(path).map_err(|e| StorageError::io(path, e))?;

    let mut records = Vec::new();
    let mut offset = 0usize;
    let mut skipped = 0usize;

    while offset < data.len() {
        match WalRecord::try_decode(&data[offset..]) {
            Some((record, consumed)) => {
                records.push(record);
                offset += consumed;
            }
            None => {
                tracing::warn!(
                    path = %path.display(),
                    offset,
                    "WAL record failed to decode, skipping one byte and resynchronizing"
                );
                skipped += 1;
                offset += 1;
            }
        }
    }

    tracing::info!(
        path = %path.display(),
        valid = records.len(),
        skipped,
        "WAL segment scan complete"
    );

    Ok(records)
}

/// Reports whether the last valid record in the segment at `path` is a
/// FLUSH marker. A segment ending in FLUSH is replay-only for recovering
/// the sequence counter; its data has already reached an SSTable.
pub fn ends_with_flush(path: &Path) -> Result<bool> {
    let records = read_all(path)?;
    Ok(matches!(records.last(), Some(r) if r.is_flush()))
}
