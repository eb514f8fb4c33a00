//! The combiner: merges a contiguous prefix of sealed segments into one
//! replacement, with last-write-wins semantics, then substitutes it
//! atomically under the segment-list lock.

use crate::store::engine::SYSTEM_SEGMENT_NAME;
use crate::store::error::{Result, StoreError};
use crate::store::record::Entry;
use crate::store::segment::{Role, Segment};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Runs one compaction pass over `segments[0..n]`. Intended to run on its
/// own thread; `Store::request_compaction` is the only caller.
///
/// Snapshots the prefix to merge, releases the store lock for the long I/O
/// phase, then reacquires it only for the substitution. An error here is
/// caught by the caller and logged — it never corrupts or removes the
/// segments being merged, since removal only happens after the commit
/// rename in step 7 below succeeds.
pub(crate) fn combine(
    dir: &Path,
    max_size: u64,
    segments: &Arc<Mutex<Vec<Arc<Segment>>>>,
    n: usize,
) -> Result<()> {
    let for_merge: Vec<Arc<Segment>> = {
        let guard = segments.lock();
        guard[..n.min(guard.len())].to_vec()
    };
    if for_merge.is_empty() {
        return Ok(());
    }

    // Oldest first, so each newer segment's value for a key overwrites the
    // older one's — matching the newest-first read path.
    let mut merged: HashMap<Vec<u8>, Vec<u8>> = HashMap::new();
    for segment in &for_merge {
        for (key, value) in segment.scan()? {
            merged.insert(key, value);
        }
    }

    // Not `max_size`: the merged set usually holds more than one segment's
    // worth of data, and the write loop below must not seal mid-batch the
    // way a normal active segment would once it crosses its threshold
    // (§4.2 — that threshold is advisory, not a hard cap). Sealing happens
    // explicitly afterward instead.
    let system_segment_path = dir.join(SYSTEM_SEGMENT_NAME);
    let new_segment = Segment::open(&system_segment_path, u64::MAX, Role::Active)?;
    for (key, value) in merged {
        new_segment.put(Entry::new(key, value))?.wait()?;
    }
    // Commit point is the rename below; up to here `system-segment` is
    // unreferenced junk a crash would leave for the next `open` to clean up.
    new_segment.seal()?;

    {
        let mut guard = segments.lock();
        let newest_merged_path = for_merge.last().expect("for_merge is non-empty").path();
        new_segment.relocate(&newest_merged_path)?;
        let mut replaced = Vec::with_capacity(guard.len() - n + 1);
        replaced.push(Arc::new(new_segment));
        replaced.extend(guard[n..].iter().cloned());
        *guard = replaced;
    }

    // The newest-merged original's file was just overwritten by the
    // rename above; only the rest are still on disk to remove.
    for segment in &for_merge[..for_merge.len() - 1] {
        segment.remove().map_err(|e| {
            StoreError::Io(std::io::Error::other(format!(
                "failed to remove merged segment {}: {}",
                segment.path().display(),
                e
            )))
        })?;
    }

    log::info!("compaction merged {} segments into 1", for_merge.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::engine::Store;
    use tempfile::tempdir;

    #[test]
    fn compaction_preserves_latest_values_and_shrinks_segment_count() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path(), 512).unwrap();

        for round in 0..5 {
            for i in 0..20 {
                let key = format!("key-{i}");
                let value = format!("value-{i}-{round}");
                store.put(key.as_bytes(), value.as_bytes()).unwrap();
            }
        }

        let segments_before = store.stats().num_segments;

        // Give the background combiner a chance to run; it's triggered
        // automatically once enough segments pile up from the writes above.
        for _ in 0..200 {
            if store.stats().num_segments < segments_before {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        let segments_after = store.stats().num_segments;
        assert!(
            segments_after < segments_before,
            "compaction did not reduce segment count: before={segments_before} after={segments_after}"
        );

        for i in 0..20 {
            let key = format!("key-{i}");
            let expected = format!("value-{i}-4");
            assert_eq!(store.get(key.as_bytes()).unwrap(), expected.as_bytes().to_vec());
        }
    }
}
