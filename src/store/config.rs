//! Store configuration options.

/// Policy for how fsync is handled. Controls data durability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FsyncPolicy {
    /// Flush after every write for maximum safety. The only policy the
    /// engine currently implements; the others are a config surface for
    /// future writer strategies.
    #[default]
    Always,
    /// Flush periodically at intervals.
    Interval,
    /// Never flush explicitly (fast, not durable).
    Never,
}

impl FsyncPolicy {
    /// Returns a human-readable description.
    pub fn as_str(&self) -> &'static str {
        match self {
            FsyncPolicy::Always => "fsync after every write",
            FsyncPolicy::Interval => "fsync at intervals",
            FsyncPolicy::Never => "never fsync",
        }
    }
}

/// Complete store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Threshold, not hard cap: the size at which a segment seals itself on
    /// its next write.
    pub max_segment_size: u64,
    /// Number of segments (including the just-created active one) that must
    /// exist before a compaction is requested.
    pub compaction_threshold: usize,
    pub fsync_policy: FsyncPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_segment_size: 16 * 1024 * 1024, // 16 MB
            compaction_threshold: 3,
            fsync_policy: FsyncPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Returns a config suitable for tests: a small segment size so
    /// rotation and compaction are exercised quickly.
    pub fn test_config() -> Self {
        Self {
            max_segment_size: 1024,
            compaction_threshold: 3,
            fsync_policy: FsyncPolicy::Never,
        }
    }

    /// Display summary for debugging/logging.
    pub fn summary(&self) -> String {
        format!(
            "StoreConfig: max_segment_size={} bytes, compaction_threshold={}, fsync_policy={}",
            self.max_segment_size,
            self.compaction_threshold,
            self.fsync_policy.as_str(),
        )
    }
}
