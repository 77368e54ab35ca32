//! Directory-scan discovery of SSTable files, ordered by the embedded
//! timestamp in their filename.

use std::fs;
use std::path::{Path, PathBuf};

use entry::{Result, StorageError};

const SSTABLE_PREFIX: &str = "sstable.";

struct SstableName {
    path: PathBuf,
    timestamp: u64,
    disambiguator: u64,
}

fn parse_sstable_name(path: &Path) -> Option<SstableName> {
    let file_name = path.file_name()?.to_str()?;
    let rest = file_name.strip_prefix(SSTABLE_PREFIX)?;
    let mut parts = rest.splitn(2, '.');
    let timestamp: u64 = parts.next()?.parse().ok()?;
    let disambiguator: u64 = match parts.next() {
        Some(s) => s.parse().ok()?,
        None => 0,
    };
    Some(SstableName {
        path: path.to_path_buf(),
        timestamp,
        disambiguator,
    })
}

/// Returns every SSTable file in `dir`, oldest first (ascending by
/// embedded timestamp, ties broken by the disambiguating suffix).
pub fn list_sstables_oldest_first(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files: Vec<SstableName> = fs::read_dir(dir)
        .map_err(|e| StorageError::io(dir, e))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| parse_sstable_name(&entry.path()))
        .collect();

    files.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then(a.disambiguator.cmp(&b.disambiguator))
    });

    Ok(files.into_iter().map(|f| f.path).collect())
}

/// Returns every SSTable file in `dir`, newest first. This is the order
/// the coordinator's read path scans SSTables in: the most recently
/// flushed file shadows older ones for the same key.
pub fn list_sstables_newest_first(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = list_sstables_oldest_first(dir)?;
    files.reverse();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn orders_newest_first() {
        let dir = tempdir().unwrap();
        for name in ["sstable.100", "sstable.300", "sstable.200"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let files = list_sstables_newest_first(dir.path()).unwrap();
        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["sstable.300", "sstable.200", "sstable.100"]);
    }

    #[test]
    fn disambiguator_breaks_ties_within_same_timestamp() {
        let dir = tempdir().unwrap();
        for name in ["sstable.100", "sstable.100.1", "sstable.100.2"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let files = list_sstables_oldest_first(dir.path()).unwrap();
        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["sstable.100", "sstable.100.1", "sstable.100.2"]);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(list_sstables_oldest_first(&missing).unwrap().is_empty());
    }
}
