use super::*;
use tempfile::tempdir;

fn put(seq: u64, key: &str, value: &str) -> WalRecord {
    WalRecord::Put {
        sequence: seq,
        timestamp: current_timestamp(),
        key: key.to_string(),
        value: value.as_bytes().to_vec(),
    }
}

fn delete(seq: u64, key: &str) -> WalRecord {
    WalRecord::Delete {
        sequence: seq,
        timestamp: current_timestamp(),
        key: key.to_string(),
    }
}

#[test]
fn write_then_read_round_trips_put_and_delete() {
    let dir = tempdir().unwrap();
    let mut w = WalWriter::create(dir.path()).unwrap();
    w.write(&put(1, "k1", "v1")).unwrap();
    w.write(&delete(2, "k1")).unwrap();

    let records = read_all(w.path()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].sequence(), 1);
    assert_eq!(records[1].sequence(), 2);
}

#[test]
fn oversized_key_is_rejected_before_write() {
    let dir = tempdir().unwrap();
    let mut w = WalWriter::create(dir.path()).unwrap();
    let huge_key = "a".repeat(entry::MAX_KEY_BYTES + 1);
    let err = w.write(&put(1, &huge_key, "v")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn oversized_value_is_rejected_before_write() {
    let dir = tempdir().unwrap();
    let mut w = WalWriter::create(dir.path()).unwrap();
    let huge_value = vec![0u8; entry::MAX_VALUE_BYTES + 1];
    let record = WalRecord::Put {
        sequence: 1,
        timestamp: current_timestamp(),
        key: "k".to_string(),
        value: huge_value,
    };
    let err = w.write(&record).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn rotate_writes_flush_marker_and_opens_new_segment() {
    let dir = tempdir().unwrap();
    let mut w = WalWriter::create(dir.path()).unwrap();
    let first_path = w.path().to_path_buf();
    w.write(&put(1, "k1", "v1")).unwrap();

    let rotated_out = w.rotate("sstable-0001", 2).unwrap();
    assert_eq!(rotated_out, first_path);
    assert_ne!(w.path(), first_path);

    assert!(ends_with_flush(&first_path).unwrap());
    let records = read_all(&first_path).unwrap();
    assert!(records.last().unwrap().is_flush());
    assert_eq!(records.last().unwrap().sequence(), 2);
}

#[test]
fn discover_segments_returns_rotated_and_current_in_order() {
    let dir = tempdir().unwrap();
    let mut w = WalWriter::create(dir.path()).unwrap();
    let first_path = w.path().to_path_buf();
    w.write(&put(1, "k1", "v1")).unwrap();
    w.rotate("sstable-0001", 2).unwrap();
    let second_path = w.path().to_path_buf();

    let segments = discover_segments(dir.path()).unwrap();
    assert_eq!(segments, vec![first_path, second_path]);
}

#[test]
fn flush_record_round_trips_sstable_id() {
    let dir = tempdir().unwrap();
    let mut w = WalWriter::create(dir.path()).unwrap();
    w.rotate("my-sstable-007", 1).unwrap();

    let segments = discover_segments(dir.path()).unwrap();
    let records = read_all(&segments[0]).unwrap();
    match &records[0] {
        WalRecord::Flush { sstable_id, .. } => assert_eq!(sstable_id, "my-sstable-007"),
        other => panic!("expected a Flush record, got {other:?}"),
    }
}

#[test]
fn new_segment_with_no_records_does_not_end_with_flush() {
    let dir = tempdir().unwrap();
    let w = WalWriter::create(dir.path()).unwrap();
    assert!(!ends_with_flush(w.path()).unwrap());
}
