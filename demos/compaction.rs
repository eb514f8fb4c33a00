//! Compaction example for the Store.
//!
//! Compaction is not a manual operation on the public contract: it kicks in
//! automatically once the segment count crosses the store's threshold. This
//! demo writes enough versions of the same keys to trigger it and polls
//! `stats()` until the background combiner has caught up.

use mini_kvstore_v2::Store;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Compaction Example ===\n");

    let store = Store::open("compaction_example", 4096)?;

    println!("Writing 100 keys, 10 versions each...");
    for round in 0..10 {
        for i in 0..100 {
            let key = format!("key_{}", i);
            let value = format!("value_{}_{}", i, round);
            store.put(&key, value.as_bytes())?;
        }
        println!("  Round {} completed", round + 1);
    }

    let sample = store.get("key_0")?;
    assert_eq!(sample, b"value_0_9", "key should carry the last round's value");

    let stats_before = store.stats();
    println!("\nBefore compaction settles:");
    println!("  Keys: {}", stats_before.num_keys);
    println!("  Segments: {}", stats_before.num_segments);
    println!("  Bytes: {:.2} MB", stats_before.total_mb());

    println!("\nWaiting for the background combiner...");
    for _ in 0..500 {
        if store.stats().num_segments <= 3 {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    let stats_after = store.stats();
    println!("\nAfter compaction:");
    println!("  Keys: {}", stats_after.num_keys);
    println!("  Segments: {}", stats_after.num_segments);
    println!("  Bytes: {:.2} MB", stats_after.total_mb());

    for i in 0..100 {
        let key = format!("key_{}", i);
        let expected = format!("value_{}_9", i);
        let value = store.get(&key)?;
        assert_eq!(value, expected.as_bytes(), "key {key} should survive compaction");
    }
    println!("\n✓ All 100 keys verified - data integrity preserved");

    let saved_bytes = stats_before.total_bytes.saturating_sub(stats_after.total_bytes);
    let saved_pct = if stats_before.total_bytes > 0 {
        (saved_bytes as f64 / stats_before.total_bytes as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "Compaction saved {:.2} MB ({:.1}%)",
        saved_bytes as f64 / (1024.0 * 1024.0),
        saved_pct
    );

    store.close()?;
    Ok(())
}
