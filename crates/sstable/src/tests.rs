use super::*;
use entry::Entry;
use tempfile::tempdir;

fn put(key: &str, seq: u64, value: &str) -> Entry {
    Entry::new_put(key.to_string(), seq, value.as_bytes().to_vec(), None).unwrap()
}

fn delete(key: &str, seq: u64) -> Entry {
    Entry::new_delete(key.to_string(), seq, None).unwrap()
}

#[test]
fn write_then_read_back_single_entry() {
    let dir = tempdir().unwrap();
    let mut w = SSTableWriter::create(dir.path(), 0, DEFAULT_INDEX_INTERVAL).unwrap();
    w.add_entry(&put("k1", 1, "v1")).unwrap();
    let path = w.finalize().unwrap();

    let r = SSTableReader::open(&path).unwrap();
    let found = r.get("k1").unwrap().unwrap();
    assert_eq!(found.value(), Some(b"v1".as_slice()));
    assert_eq!(found.sequence(), 1);
}

#[test]
fn missing_key_returns_not_found() {
    let dir = tempdir().unwrap();
    let mut w = SSTableWriter::create(dir.path(), 0, DEFAULT_INDEX_INTERVAL).unwrap();
    w.add_entry(&put("k1", 1, "v1")).unwrap();
    let path = w.finalize().unwrap();

    let r = SSTableReader::open(&path).unwrap();
    assert!(r.get("nope").unwrap().is_none());
}

#[test]
fn tombstone_round_trips_as_delete() {
    let dir = tempdir().unwrap();
    let mut w = SSTableWriter::create(dir.path(), 0, DEFAULT_INDEX_INTERVAL).unwrap();
    w.add_entry(&put("a", 1, "1")).unwrap();
    w.add_entry(&delete("b", 2)).unwrap();
    w.add_entry(&put("c", 3, "3")).unwrap();
    let path = w.finalize().unwrap();

    let r = SSTableReader::open(&path).unwrap();
    let tombstone = r.get("b").unwrap().unwrap();
    assert!(tombstone.is_tombstone());
}

#[test]
fn out_of_order_key_is_rejected() {
    let dir = tempdir().unwrap();
    let mut w = SSTableWriter::create(dir.path(), 0, DEFAULT_INDEX_INTERVAL).unwrap();
    w.add_entry(&put("b", 1, "1")).unwrap();
    let err = w.add_entry(&put("a", 2, "2")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn duplicate_key_is_rejected() {
    let dir = tempdir().unwrap();
    let mut w = SSTableWriter::create(dir.path(), 0, DEFAULT_INDEX_INTERVAL).unwrap();
    w.add_entry(&put("a", 1, "1")).unwrap();
    let err = w.add_entry(&put("a", 2, "2")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn discard_removes_partial_file() {
    let dir = tempdir().unwrap();
    let mut w = SSTableWriter::create(dir.path(), 0, DEFAULT_INDEX_INTERVAL).unwrap();
    w.add_entry(&put("a", 1, "1")).unwrap();
    let path = w.path().to_path_buf();
    assert!(path.exists());
    w.discard();
    assert!(!path.exists());
}

#[test]
fn drop_without_finalize_removes_partial_file() {
    let dir = tempdir().unwrap();
    let path = {
        let mut w = SSTableWriter::create(dir.path(), 0, DEFAULT_INDEX_INTERVAL).unwrap();
        w.add_entry(&put("a", 1, "1")).unwrap();
        w.path().to_path_buf()
    };
    assert!(!path.exists());
}

#[test]
fn sparse_index_bounds_the_linear_scan() {
    let dir = tempdir().unwrap();
    let mut w = SSTableWriter::create(dir.path(), 0, 100).unwrap();
    for i in 0..100_000u32 {
        w.add_entry(&put(&format!("key{:08}", i), i as u64, "v")).unwrap();
    }
    let path = w.finalize().unwrap();

    let r = SSTableReader::open(&path).unwrap();
    assert_eq!(r.index_len(), 1_000);
    assert_eq!(r.entry_count(), 100_000);

    let found = r.get("key00054321").unwrap().unwrap();
    assert_eq!(found.sequence(), 54_321);

    assert!(r.get("key99999999").unwrap().is_none());
}

#[test]
fn header_crc_mismatch_is_rejected_on_open() {
    let dir = tempdir().unwrap();
    let mut w = SSTableWriter::create(dir.path(), 0, DEFAULT_INDEX_INTERVAL).unwrap();
    w.add_entry(&put("a", 1, "1")).unwrap();
    let path = w.finalize().unwrap();

    let mut bytes = std::fs::read(&path).unwrap();
    bytes[5] ^= 0xFF; // corrupt a byte inside the header's CRC-covered region
    std::fs::write(&path, &bytes).unwrap();

    let err = SSTableReader::open(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

#[test]
fn empty_sstable_round_trips_with_zero_entries() {
    let dir = tempdir().unwrap();
    let w = SSTableWriter::create(dir.path(), 0, DEFAULT_INDEX_INTERVAL).unwrap();
    let path = w.finalize().unwrap();

    let r = SSTableReader::open(&path).unwrap();
    assert_eq!(r.entry_count(), 0);
    assert!(r.get("anything").unwrap().is_none());
}
