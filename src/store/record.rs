//! Self-delimiting on-disk encoding for a single `(key, value)` record.
//!
//! Layout: `[total_len u32][key_len u32][key bytes][value_len u32][value bytes]`,
//! all integers little-endian. `total_len` covers the whole record, including
//! itself, so a reader positioned at the start of a record can recover its
//! length without a separate manifest.

use crate::store::error::SegmentError;
use std::io::Read;

/// Number of header bytes before the key: total_len + key_len + value_len.
const HEADER_LEN: usize = 12;

/// A logical `(key, value)` record, independent of where it lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl Entry {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Entry {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Size in bytes this entry would occupy once encoded.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.key.len() + self.value.len()
    }

    /// Encodes this entry to its on-disk byte layout.
    pub fn encode(&self) -> Vec<u8> {
        let total_len = self.encoded_len();
        let mut buf = Vec::with_capacity(total_len);
        buf.extend_from_slice(&(total_len as u32).to_le_bytes());
        buf.extend_from_slice(&(self.key.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.key);
        buf.extend_from_slice(&(self.value.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.value);
        buf
    }

    /// Decodes a full record (including its `total_len` prefix) from `buf`.
    ///
    /// Fails with [`SegmentError::Corrupt`] if any length field would run
    /// past the end of `buf`, or if the declared `total_len` disagrees with
    /// `buf.len()`.
    pub fn decode(buf: &[u8]) -> Result<Entry, SegmentError> {
        if buf.len() < HEADER_LEN {
            return Err(SegmentError::Corrupt);
        }
        let total_len = u32::from_le_bytes(buf[0..4].try_into().unwrap()) as usize;
        if total_len != buf.len() {
            return Err(SegmentError::Corrupt);
        }
        let key_len = u32::from_le_bytes(buf[4..8].try_into().unwrap()) as usize;
        let key_start = 8;
        let key_end = key_start
            .checked_add(key_len)
            .ok_or(SegmentError::Corrupt)?;
        if key_end + 4 > buf.len() {
            return Err(SegmentError::Corrupt);
        }
        let value_len =
            u32::from_le_bytes(buf[key_end..key_end + 4].try_into().unwrap()) as usize;
        let value_start = key_end + 4;
        let value_end = value_start
            .checked_add(value_len)
            .ok_or(SegmentError::Corrupt)?;
        if value_end != buf.len() {
            return Err(SegmentError::Corrupt);
        }
        Ok(Entry {
            key: buf[key_start..key_end].to_vec(),
            value: buf[value_start..value_end].to_vec(),
        })
    }
}

/// Reads one record from a stream positioned at its first byte and returns
/// only the value, without materializing the key. Used by point reads,
/// which already know the key from the index.
pub fn read_value<R: Read>(reader: &mut R) -> Result<Vec<u8>, SegmentError> {
    let (_key_len, value) = read_record(reader, false)?;
    Ok(value.expect("value always populated when requested"))
}

/// Reads one record from a stream positioned at its first byte, returning
/// both key and value. Used by recovery and by the combiner's segment scan.
pub fn read_key_value<R: Read>(reader: &mut R) -> Result<(Vec<u8>, Vec<u8>), SegmentError> {
    let (key, value) = read_record(reader, true)?;
    Ok((key.expect("key always populated when requested"), value.expect("value always populated when requested")))
}

/// Shared implementation: reads the header and key unconditionally (the key
/// length must be known to locate the value), optionally returning the key.
fn read_record<R: Read>(
    reader: &mut R,
    want_key: bool,
) -> Result<(Option<Vec<u8>>, Option<Vec<u8>>), SegmentError> {
    let mut total_len_buf = [0u8; 4];
    reader
        .read_exact(&mut total_len_buf)
        .map_err(|_| SegmentError::Corrupt)?;
    let total_len = u32::from_le_bytes(total_len_buf) as usize;
    if total_len < HEADER_LEN {
        return Err(SegmentError::Corrupt);
    }

    let mut key_len_buf = [0u8; 4];
    reader
        .read_exact(&mut key_len_buf)
        .map_err(|_| SegmentError::Corrupt)?;
    let key_len = u32::from_le_bytes(key_len_buf) as usize;
    let mut key_buf = vec![0u8; key_len];
    reader
        .read_exact(&mut key_buf)
        .map_err(|_| SegmentError::Corrupt)?;

    let mut value_len_buf = [0u8; 4];
    reader
        .read_exact(&mut value_len_buf)
        .map_err(|_| SegmentError::Corrupt)?;
    let value_len = u32::from_le_bytes(value_len_buf) as usize;
    if HEADER_LEN + key_len + value_len != total_len {
        return Err(SegmentError::Corrupt);
    }
    let mut value_buf = vec![0u8; value_len];
    reader
        .read_exact(&mut value_buf)
        .map_err(|_| SegmentError::Corrupt)?;

    Ok((want_key.then_some(key_buf), Some(value_buf)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_arbitrary_bytes() {
        let entry = Entry::new(vec![0u8, 1, 2, 0xff], vec![0xffu8, 0, 5]);
        let encoded = entry.encode();
        assert_eq!(encoded.len(), entry.encoded_len());
        let decoded = Entry::decode(&encoded).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn round_trips_empty_key_and_value() {
        let entry = Entry::new(Vec::new(), Vec::new());
        let decoded = Entry::decode(&entry.encode()).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn decode_rejects_truncated_buffer() {
        let entry = Entry::new(b"key".to_vec(), b"value".to_vec());
        let mut encoded = entry.encode();
        encoded.truncate(encoded.len() - 1);
        assert!(matches!(Entry::decode(&encoded), Err(SegmentError::Corrupt)));
    }

    #[test]
    fn decode_rejects_total_len_mismatch() {
        let entry = Entry::new(b"key".to_vec(), b"value".to_vec());
        let mut encoded = entry.encode();
        encoded[0] = 0xff; // corrupt total_len's low byte
        assert!(matches!(Entry::decode(&encoded), Err(SegmentError::Corrupt)));
    }

    #[test]
    fn read_value_reads_from_stream_position() {
        let entry = Entry::new(b"k".to_vec(), b"v".to_vec());
        let encoded = entry.encode();
        let mut cursor = std::io::Cursor::new(encoded);
        let value = read_value(&mut cursor).unwrap();
        assert_eq!(value, b"v".to_vec());
    }

    #[test]
    fn read_key_value_recovers_both_fields() {
        let entry = Entry::new(b"k".to_vec(), b"v".to_vec());
        let encoded = entry.encode();
        let mut cursor = std::io::Cursor::new(encoded);
        let (key, value) = read_key_value(&mut cursor).unwrap();
        assert_eq!(key, b"k".to_vec());
        assert_eq!(value, b"v".to_vec());
    }
}
