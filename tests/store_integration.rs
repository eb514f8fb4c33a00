mod common;

use common::TestDir;
use mini_kvstore_v2::{Store, StoreError};
use std::sync::Arc;
use std::thread;

#[test]
fn s1_basic_put_and_get() {
    let dir = TestDir::new();
    let store = Store::open(dir.path(), 16 * 1024 * 1024).unwrap();

    store.put("key1", "value1").unwrap();
    store.put("key2", "value2").unwrap();
    store.put("key3", "value3").unwrap();

    assert_eq!(store.get("key2").unwrap(), b"value2");
}

#[test]
fn s2_data_survives_close_and_reopen() {
    let dir = TestDir::new();
    {
        let store = Store::open(dir.path(), 16 * 1024 * 1024).unwrap();
        store.put("key1", "value1").unwrap();
        store.put("key2", "value2").unwrap();
        store.put("key3", "value3").unwrap();
        store.close().unwrap();
    }

    let store = Store::open(dir.path(), 16 * 1024 * 1024).unwrap();
    assert_eq!(store.get("key1").unwrap(), b"value1");
    assert_eq!(store.get("key3").unwrap(), b"value3");
}

#[test]
fn s3_segments_stay_under_the_size_threshold() {
    let dir = TestDir::new();
    let store = Store::open(dir.path(), 1024).unwrap();

    // Each encoded entry is 12 + 10 + 10 = 32 bytes with these key/value
    // widths, so 64 entries fill exactly two 1024-byte segments.
    for i in 0..64 {
        let key = format!("{:010}", i);
        store.put(key.as_bytes(), "0123456789").unwrap();
    }

    for entry in std::fs::read_dir(dir.path()).unwrap() {
        let entry = entry.unwrap();
        if entry.file_type().unwrap().is_file() {
            let len = entry.metadata().unwrap().len();
            assert!(len <= 1024, "{} is {} bytes", entry.path().display(), len);
        }
    }

    for i in 0..64 {
        let key = format!("{:010}", i);
        assert_eq!(store.get(key.as_bytes()).unwrap(), b"0123456789");
    }
}

#[test]
fn s4_compaction_shrinks_segment_count_without_losing_data() {
    let dir = TestDir::new();
    let store = Store::open(dir.path(), 512).unwrap();

    for i in 0..100 {
        let key = format!("key-{i}");
        let value = format!("value-{i}");
        store.put(key.as_bytes(), value.as_bytes()).unwrap();
    }

    let segments_before = store.stats().num_segments;
    assert!(segments_before >= 3);

    for _ in 0..200 {
        if store.stats().num_segments < segments_before {
            break;
        }
        thread::sleep(std::time::Duration::from_millis(10));
    }

    let segments_after = store.stats().num_segments;
    assert!(
        segments_after < segments_before,
        "compaction did not reduce segment count: before={segments_before} after={segments_after}"
    );

    for i in 0..100 {
        let key = format!("key-{i}");
        let expected = format!("value-{i}");
        assert_eq!(store.get(key.as_bytes()).unwrap(), expected.as_bytes().to_vec());
    }
}

#[test]
fn s5_overwritten_key_survives_compaction() {
    let dir = TestDir::new();
    let store = Store::open(dir.path(), 256).unwrap();

    store.put("k", "v1").unwrap();
    store.put("k", "v2").unwrap();
    assert_eq!(store.get("k").unwrap(), b"v2");

    // Push enough additional segments to trigger the background combiner.
    for i in 0..50 {
        let key = format!("filler-{i}");
        store.put(key.as_bytes(), "x").unwrap();
    }

    let segments_before = store.stats().num_segments;

    for _ in 0..200 {
        if store.stats().num_segments < segments_before {
            break;
        }
        thread::sleep(std::time::Duration::from_millis(10));
    }

    let segments_after = store.stats().num_segments;
    assert!(
        segments_after < segments_before,
        "compaction did not reduce segment count: before={segments_before} after={segments_after}"
    );

    assert_eq!(store.get("k").unwrap(), b"v2");
}

#[test]
fn s6_missing_key_on_fresh_store_is_not_found() {
    let dir = TestDir::new();
    let store = Store::open(dir.path(), 16 * 1024 * 1024).unwrap();

    match store.get("missing") {
        Err(StoreError::NotFound) => {},
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn concurrent_puts_are_all_durably_applied() {
    let dir = TestDir::new();
    let store = Arc::new(Store::open(dir.path(), 16 * 1024 * 1024).unwrap());

    let mut handles = Vec::new();
    for t in 0..8 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..50 {
                let key = format!("t{t}-k{i}");
                let value = format!("t{t}-v{i}");
                store.put(key.as_bytes(), value.as_bytes()).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    for t in 0..8 {
        for i in 0..50 {
            let key = format!("t{t}-k{i}");
            let expected = format!("t{t}-v{i}");
            assert_eq!(store.get(key.as_bytes()).unwrap(), expected.as_bytes().to_vec());
        }
    }
}

#[test]
fn reads_stay_consistent_while_compaction_runs_concurrently() {
    let dir = TestDir::new();
    let store = Arc::new(Store::open(dir.path(), 512).unwrap());

    for i in 0..200 {
        let key = format!("key-{i}");
        let value = format!("value-{i}");
        store.put(key.as_bytes(), value.as_bytes()).unwrap();
    }

    // Compaction is likely already running in the background by now; hammer
    // reads concurrently with whatever compaction passes are in flight.
    let mut handles = Vec::new();
    for _ in 0..4 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..200 {
                let key = format!("key-{i}");
                let expected = format!("value-{i}");
                assert_eq!(
                    store.get(key.as_bytes()).unwrap(),
                    expected.as_bytes().to_vec()
                );
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}
