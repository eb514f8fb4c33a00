//! Blob storage wrapper around Store with metadata tracking

use crate::store::error::Result as StoreResult;
use crate::store::Store;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata for a stored blob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobMeta {
    /// Unique key identifier
    pub key: String,
    /// Content hash (etag) for integrity checks
    pub etag: String,
    /// Size in bytes
    pub size: u64,
    /// Volume ID where this blob is stored
    pub volume_id: String,
}

/// Blob storage engine wrapping [`Store`]
pub struct BlobStorage {
    store: Store,
    volume_id: String,
}

impl BlobStorage {
    /// Creates a new BlobStorage instance
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Directory for storing blob data
    /// * `volume_id` - Unique identifier for this volume
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mini_kvstore_v2::volume::BlobStorage;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let storage = BlobStorage::new("volume_data", "vol-1".to_string())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(data_dir: impl AsRef<Path>, volume_id: String) -> StoreResult<Self> {
        let store = Store::open(data_dir, 16 * 1024 * 1024)?;
        Ok(BlobStorage { store, volume_id })
    }

    /// Stores a blob and returns its metadata
    ///
    /// # Arguments
    ///
    /// * `key` - Unique key for the blob
    /// * `data` - Blob data to store
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use mini_kvstore_v2::volume::BlobStorage;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let mut storage = BlobStorage::new("volume_data", "vol-1".to_string())?;
    /// let meta = storage.put("my-key", b"my data")?;
    /// println!("Stored blob with etag: {}", meta.etag);
    /// # Ok(())
    /// # }
    /// ```
    pub fn put(&mut self, key: &str, data: &[u8]) -> StoreResult<BlobMeta> {
        let etag = format!("{:08x}", crc32fast::hash(data));

        self.store.put(key, data)?;

        Ok(BlobMeta {
            key: key.to_string(),
            etag,
            size: data.len() as u64,
            volume_id: self.volume_id.clone(),
        })
    }

    /// Retrieves a blob by key
    ///
    /// Returns `Ok(Some(data))` if found, `Ok(None)` if not found
    pub fn get(&mut self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        match self.store.get(key) {
            Ok(data) => Ok(Some(data)),
            Err(crate::store::StoreError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Lists all blob keys in storage
    pub fn list_keys(&self) -> Vec<String> {
        self.store
            .debug_keys()
            .into_iter()
            .map(|k| String::from_utf8_lossy(&k).into_owned())
            .collect()
    }

    /// Returns the volume ID
    pub fn volume_id(&self) -> &str {
        &self.volume_id
    }

    /// Returns storage statistics
    pub fn stats(&self) -> crate::store::stats::StoreStats {
        self.store.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_blob_put_and_get() {
        let dir = tempdir().unwrap();
        let mut storage = BlobStorage::new(dir.path(), "test-vol".to_string()).unwrap();

        let meta = storage.put("blob1", b"hello world").unwrap();
        assert_eq!(meta.key, "blob1");
        assert_eq!(meta.size, 11);
        assert_eq!(meta.volume_id, "test-vol");
        assert!(!meta.etag.is_empty());

        let data = storage.get("blob1").unwrap();
        assert_eq!(data, Some(b"hello world".to_vec()));
    }

    #[test]
    fn test_get_missing_key_returns_none() {
        let dir = tempdir().unwrap();
        let mut storage = BlobStorage::new(dir.path(), "test-vol".to_string()).unwrap();

        assert!(storage.get("absent").unwrap().is_none());
    }

    #[test]
    fn test_etag_consistency() {
        let dir = tempdir().unwrap();
        let mut storage = BlobStorage::new(dir.path(), "test-vol".to_string()).unwrap();

        let meta1 = storage.put("blob1", b"same data").unwrap();
        let meta2 = storage.put("blob2", b"same data").unwrap();

        assert_eq!(meta1.etag, meta2.etag);
    }
}
