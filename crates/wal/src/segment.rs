//! Segment file naming and discovery.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use entry::{Result, StorageError};

const SEGMENT_PREFIX: &str = "current.wal.";

/// Parsed identity of a segment file: its embedded timestamp string and
/// its counter, the two fields replay order sorts by.
struct SegmentName {
    path: PathBuf,
    timestamp: String,
    counter: u64,
}

fn parse_segment_name(path: &Path) -> Option<SegmentName> {
    let file_name = path.file_name()?.to_str()?;
    let rest = file_name.strip_prefix(SEGMENT_PREFIX)?;
    let (timestamp, counter_str) = rest.split_once('.')?;
    let counter: u64 = counter_str.parse().ok()?;
    Some(SegmentName {
        path: path.to_path_buf(),
        timestamp: timestamp.to_string(),
        counter,
    })
}

/// Returns every WAL segment file in `dir`, sorted into replay order:
/// ascending by embedded timestamp, ties broken by ascending counter.
pub fn discover_segments(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut segments: Vec<SegmentName> = fs::read_dir(dir)
        .map_err(|e| StorageError::io(dir, e))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| parse_segment_name(&entry.path()))
        .collect();

    segments.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.counter.cmp(&b.counter)));

    Ok(segments.into_iter().map(|s| s.path).collect())
}

/// Allocates the path for a fresh segment in `dir`: a new UTC timestamp
/// and a counter one greater than the highest counter currently present
/// (0 if the directory has no segments yet). Scanning the directory
/// rather than keeping in-process state means counters stay unique even
/// across restarts within the same wall-clock second.
pub fn next_segment_path(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;

    let next_counter = fs::read_dir(dir)
        .map_err(|e| StorageError::io(dir, e))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| parse_segment_name(&entry.path()))
        .map(|s| s.counter + 1)
        .max()
        .unwrap_or(0);

    let timestamp = Utc::now().format("%Y%m%d%H%M%S").to_string();
    Ok(dir.join(format!("{SEGMENT_PREFIX}{timestamp}.{next_counter}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discover_orders_by_timestamp_then_counter() {
        let dir = tempdir().unwrap();
        for name in [
            "current.wal.20260101120000.1",
            "current.wal.20260101120000.0",
            "current.wal.20260101110000.0",
            "not-a-segment.txt",
        ] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let segments = discover_segments(dir.path()).unwrap();
        let names: Vec<&str> = segments
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "current.wal.20260101110000.0",
                "current.wal.20260101120000.0",
                "current.wal.20260101120000.1",
            ]
        );
    }

    #[test]
    fn next_segment_path_increments_counter() {
        let dir = tempdir().unwrap();
        let first = next_segment_path(dir.path()).unwrap();
        fs::write(&first, b"").unwrap();
        let second = next_segment_path(dir.path()).unwrap();
        assert_ne!(first, second);
        let second_name = parse_segment_name(&second).unwrap();
        let first_name = parse_segment_name(&first).unwrap();
        assert_eq!(second_name.counter, first_name.counter + 1);
    }

    #[test]
    fn discover_on_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(discover_segments(&missing).unwrap().is_empty());
    }
}
