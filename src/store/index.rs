//! In-memory index owned by a single segment: key -> byte offset of that
//! key's most recent record within the segment's file.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Index {
    map: HashMap<Vec<u8>, u64>,
}

impl Index {
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Records (or overwrites) the offset of `key`'s latest entry.
    pub fn insert(&mut self, key: Vec<u8>, offset: u64) {
        self.map.insert(key, offset);
    }

    /// Gets the offset of the key's latest entry.
    pub fn get(&self, key: &[u8]) -> Option<u64> {
        self.map.get(key).copied()
    }

    /// Snapshot of the keys currently indexed, in arbitrary order.
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.map.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_insert_overwrites_offset() {
        let mut index = Index::new();
        index.insert(b"k".to_vec(), 0);
        index.insert(b"k".to_vec(), 42);
        assert_eq!(index.get(b"k"), Some(42));
        assert_eq!(index.keys(), vec![b"k".to_vec()]);
    }

    #[test]
    fn missing_key_is_none() {
        let index = Index::new();
        assert_eq!(index.get(b"missing"), None);
    }
}
