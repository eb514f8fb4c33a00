use std::path::PathBuf;
use tempfile::TempDir;

/// A scratch data directory for a single test. Dropping this removes the
/// directory; keep it alive for as long as the `Store` under test is open.
pub struct TestDir {
    _dir: TempDir,
    path: PathBuf,
}

impl TestDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().to_path_buf();
        TestDir { _dir: dir, path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}
