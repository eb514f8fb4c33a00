//! Store statistics and metrics. Not part of the core `put`/`get`/`close`
//! contract; exposed for the CLI/demo layer and for tests that assert on
//! segment counts and on-disk size (spec scenarios S3/S4).

use std::fmt;
use std::path::PathBuf;

/// Statistics about the key-value store at a point in time.
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    /// Number of distinct live keys, deduped across segments newest-first.
    pub num_keys: usize,
    /// Number of segment files, including the active one.
    pub num_segments: usize,
    /// Total bytes occupied by all segment files on disk.
    pub total_bytes: u64,
    /// Path of the currently active segment.
    pub active_segment_path: Option<PathBuf>,
    /// Whether a compaction is running right now.
    pub compacting: bool,
}

impl StoreStats {
    pub fn total_mb(&self) -> f64 {
        self.total_bytes as f64 / (1024.0 * 1024.0)
    }

    pub fn total_kb(&self) -> f64 {
        self.total_bytes as f64 / 1024.0
    }
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Store Statistics:")?;
        writeln!(f, "  Keys: {}", self.num_keys)?;
        writeln!(f, "  Segments: {}", self.num_segments)?;
        writeln!(f, "  Total size: {:.2} MB", self.total_mb())?;
        writeln!(
            f,
            "  Active segment: {}",
            self.active_segment_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".to_string())
        )?;
        write!(f, "  Compacting: {}", self.compacting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_key_figures() {
        let stats = StoreStats {
            num_keys: 100,
            num_segments: 3,
            total_bytes: 1024 * 1024 * 2,
            active_segment_path: Some(PathBuf::from("1700000000000000000")),
            compacting: false,
        };
        let display = format!("{}", stats);
        assert!(display.contains("Keys: 100"));
        assert!(display.contains("Segments: 3"));
        assert!(display.contains("2.00 MB"));
    }

    #[test]
    fn conversions_are_consistent() {
        let stats = StoreStats {
            total_bytes: 1024 * 1024,
            ..Default::default()
        };
        assert!((stats.total_mb() - 1.0).abs() < 0.001);
        assert!((stats.total_kb() - 1024.0).abs() < 0.001);
    }
}
