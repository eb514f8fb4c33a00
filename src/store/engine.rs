//! The top-level store: an ordered list of segments (oldest to newest, last
//! is the active writer), recovered from a data directory and kept bounded
//! by background compaction.

use crate::store::compaction;
use crate::store::config::StoreConfig;
use crate::store::error::{Result, StoreError};
use crate::store::record::Entry;
use crate::store::segment::{Role, Segment};
use crate::store::stats::StoreStats;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{SystemTime, UNIX_EPOCH};

/// Filename the combiner writes its merge output to before the commit
/// rename. Deliberately non-numeric so it can never collide with a
/// timestamped segment.
pub(crate) const SYSTEM_SEGMENT_NAME: &str = "system-segment";

pub struct Store {
    dir: PathBuf,
    config: StoreConfig,
    segments: Arc<Mutex<Vec<Arc<Segment>>>>,
    combining: Arc<Mutex<bool>>,
    combiner_thread: Mutex<Option<JoinHandle<()>>>,
    // Guards against two segments created in the same nanosecond picking
    // the same filename.
    last_segment_name: AtomicI64,
}

impl Store {
    /// Opens (or creates) the store at `dir` with the given segment size
    /// threshold in bytes. This is the library surface's entry point.
    pub fn open(dir: impl AsRef<Path>, segment_size_bytes: u64) -> Result<Store> {
        Self::open_with_config(
            dir,
            StoreConfig {
                max_segment_size: segment_size_bytes,
                ..StoreConfig::default()
            },
        )
    }

    /// Opens the store with a full [`StoreConfig`] instead of just a
    /// segment size.
    pub fn open_with_config(dir: impl AsRef<Path>, config: StoreConfig) -> Result<Store> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let system_segment_path = dir.join(SYSTEM_SEGMENT_NAME);
        if system_segment_path.exists() {
            // Leftover from a compaction that crashed before its commit
            // rename; the originals it was merging are still intact.
            log::debug!(
                "removing aborted compaction artifact {}",
                system_segment_path.display()
            );
            fs::remove_file(&system_segment_path)?;
        }

        let mut numbered: Vec<(i64, PathBuf)> = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Ok(timestamp) = name.parse::<i64>() {
                numbered.push((timestamp, path));
            }
            // Names that don't parse (other than system-segment, handled
            // above) are left alone: undefined handling, per spec.
        }
        numbered.sort_by_key(|(timestamp, _)| *timestamp);

        let mut segments = Vec::with_capacity(numbered.len() + 1);
        for (_, path) in &numbered {
            let segment = Segment::open(path, config.max_segment_size, Role::Sealed)?;
            segment
                .recover()
                .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))?;
            segments.push(Arc::new(segment));
        }

        let last_segment_name = AtomicI64::new(numbered.last().map(|(t, _)| *t).unwrap_or(0));

        let store = Store {
            dir,
            config,
            segments: Arc::new(Mutex::new(segments)),
            combining: Arc::new(Mutex::new(false)),
            combiner_thread: Mutex::new(None),
            last_segment_name,
        };

        store.open_new_active_segment()?;
        Ok(store)
    }

    /// Routes `get` to segments newest-first; the first hit wins.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        let key = key.as_ref();
        let snapshot: Vec<Arc<Segment>> = self.segments.lock().clone();
        for segment in snapshot.iter().rev() {
            match segment.get(key) {
                Ok(value) => return Ok(value),
                Err(crate::store::error::SegmentError::NotFound) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(StoreError::NotFound)
    }

    /// Routes `put` to the active segment, rotating to a new one first if
    /// the current active segment has sealed itself.
    pub fn put(&self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<()> {
        let entry = Entry::new(key.as_ref().to_vec(), value.as_ref().to_vec());
        loop {
            let active = {
                let segments = self.segments.lock();
                segments
                    .last()
                    .cloned()
                    .expect("store always has at least one segment after open")
            };
            if !active.is_active() {
                self.open_new_active_segment()?;
                continue;
            }
            match active.put(entry.clone()) {
                Ok(completion) => {
                    completion.wait()?;
                    return Ok(());
                },
                // Raced with the writer sealing this segment between our
                // is_active() check and the enqueue; retry against the
                // segment that replaces it.
                Err(crate::store::error::SegmentError::Sealed) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Seals the active segment, joins any running combiner, and returns.
    /// Every segment's file is closed implicitly: sealed segments never
    /// hold a persistent handle, and the active segment's writer thread
    /// (the one handle that matters) is joined by `seal`.
    pub fn close(&self) -> Result<()> {
        let segments: Vec<Arc<Segment>> = self.segments.lock().clone();
        for segment in &segments {
            segment.seal()?;
        }
        if let Some(handle) = self.combiner_thread.lock().take() {
            let _ = handle.join();
        }
        Ok(())
    }

    /// Statistics snapshot. Not part of the core contract; used by the
    /// CLI/demo layer and by tests asserting on segment counts.
    pub fn stats(&self) -> StoreStats {
        let segments: Vec<Arc<Segment>> = self.segments.lock().clone();

        let mut seen = std::collections::HashSet::new();
        for segment in segments.iter().rev() {
            for key in segment.indexed_keys() {
                seen.insert(key);
            }
        }

        let total_bytes = segments
            .iter()
            .map(|s| fs::metadata(s.path()).map(|m| m.len()).unwrap_or(0))
            .sum();

        StoreStats {
            num_keys: seen.len(),
            num_segments: segments.len(),
            total_bytes,
            active_segment_path: segments.last().map(|s| s.path()),
            compacting: *self.combining.lock(),
        }
    }

    /// Convenience for the CLI/demo layer: an unordered snapshot of every
    /// live key. Not part of the core `put`/`get`/`close` contract and not
    /// covered by its durability/compaction guarantees.
    pub fn debug_keys(&self) -> Vec<Vec<u8>> {
        let segments: Vec<Arc<Segment>> = self.segments.lock().clone();
        let mut seen = std::collections::HashSet::new();
        for segment in segments.iter().rev() {
            for key in segment.indexed_keys() {
                seen.insert(key);
            }
        }
        seen.into_iter().collect()
    }

    fn open_new_active_segment(&self) -> Result<()> {
        let mut segments = self.segments.lock();
        // Another caller may have already rotated while we waited for the
        // lock; nothing to do in that case.
        if segments.last().is_some_and(|s| s.is_active()) {
            return Ok(());
        }

        let path = self.allocate_segment_path();
        let segment = Segment::open(&path, self.config.max_segment_size, Role::Active)?;
        segments.push(Arc::new(segment));
        log::debug!("opened new active segment {}", path.display());

        let segment_count = segments.len();
        drop(segments);

        if segment_count >= self.config.compaction_threshold {
            // Everything except the just-created active segment, per the
            // off-by-one the spec calls out explicitly.
            self.request_compaction(segment_count - 1);
        }
        Ok(())
    }

    fn allocate_segment_path(&self) -> PathBuf {
        loop {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("system clock is before the Unix epoch")
                .as_nanos() as i64;
            let previous = self.last_segment_name.load(Ordering::SeqCst);
            let candidate = now.max(previous + 1);
            if self
                .last_segment_name
                .compare_exchange(previous, candidate, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return self.dir.join(candidate.to_string());
            }
        }
    }

    /// Sets `combining` if it was clear, reporting [`StoreError::Busy`]
    /// when a compaction is already running so the trigger site can drop
    /// the request silently, per the spec's idempotent-trigger rule.
    fn try_begin_combine(&self) -> Result<()> {
        let mut combining = self.combining.lock();
        if *combining {
            return Err(StoreError::Busy);
        }
        *combining = true;
        Ok(())
    }

    fn request_compaction(&self, n: usize) {
        if let Err(StoreError::Busy) = self.try_begin_combine() {
            log::debug!("compaction already running; dropping trigger for {} segments", n);
            return;
        }

        let dir = self.dir.clone();
        let max_size = self.config.max_segment_size;
        let segments = Arc::clone(&self.segments);
        let combining_flag = Arc::clone(&self.combining);

        let handle = std::thread::spawn(move || {
            if let Err(e) = compaction::combine(&dir, max_size, &segments, n) {
                log::warn!("compaction failed, leaving existing segments in place: {e}");
            }
            *combining_flag.lock() = false;
        });

        let mut slot = self.combiner_thread.lock();
        if let Some(previous) = slot.take() {
            let _ = previous.join();
        }
        *slot = Some(handle);
    }
}
