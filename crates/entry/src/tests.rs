use super::*;

#[test]
fn put_requires_value_but_delete_forbids_it_by_construction() {
    let put = Entry::new_put("k".into(), 1, b"v".to_vec(), None).unwrap();
    assert_eq!(put.kind(), EntryKind::Put);
    assert_eq!(put.value(), Some(b"v".as_slice()));
    assert!(!put.is_tombstone());

    let del = Entry::new_delete("k".into(), 2, None).unwrap();
    assert_eq!(del.kind(), EntryKind::Delete);
    assert_eq!(del.value(), None);
    assert!(del.is_tombstone());
}

#[test]
fn empty_key_is_rejected() {
    let err = Entry::new_put("".into(), 1, b"v".to_vec(), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = Entry::new_delete("".into(), 1, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn key_at_boundary_is_accepted_one_byte_over_is_rejected() {
    let at_limit = "a".repeat(MAX_KEY_BYTES);
    assert!(Entry::new_put(at_limit, 1, b"v".to_vec(), None).is_ok());

    let over_limit = "a".repeat(MAX_KEY_BYTES + 1);
    let err = Entry::new_put(over_limit, 1, b"v".to_vec(), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn value_at_boundary_is_accepted_one_byte_over_is_rejected() {
    let at_limit = vec![0u8; MAX_VALUE_BYTES];
    assert!(Entry::new_put("k".into(), 1, at_limit, None).is_ok());

    let over_limit = vec![0u8; MAX_VALUE_BYTES + 1];
    let err = Entry::new_put("k".into(), 1, over_limit, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn multi_byte_utf8_keys_are_bounded_by_byte_length_not_codepoints() {
    // each '字' is 3 bytes in UTF-8
    let key = "字".repeat(10);
    assert_eq!(key.len(), 30);
    assert!(Entry::new_put(key, 1, b"v".to_vec(), None).is_ok());
}

#[test]
fn ordering_is_key_then_sequence() {
    let a1 = Entry::new_put("a".into(), 1, b"1".to_vec(), None).unwrap();
    let a2 = Entry::new_put("a".into(), 2, b"2".to_vec(), None).unwrap();
    let b1 = Entry::new_put("b".into(), 1, b"1".to_vec(), None).unwrap();

    assert!(a1 < a2, "equal keys order by ascending sequence");
    assert!(a2 < b1, "different keys order lexicographically");
    assert!(a1 < b1);
}

#[test]
fn tombstone_round_trip_flag() {
    let d = Entry::new_delete("k".into(), 5, None).unwrap();
    assert!(d.is_tombstone());
}
