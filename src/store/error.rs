//! Error types for the segment log and the store that sits on top of it.

use std::io;
use thiserror::Error;

/// Errors surfaced by a single [`Segment`](crate::store::segment::Segment).
#[derive(Error, Debug)]
pub enum SegmentError {
    /// The key is absent from this segment's index.
    #[error("key not found in segment")]
    NotFound,

    /// A length prefix disagreed with the bytes available, or a record was
    /// cut short mid-write. Fatal for recovery of the segment it occurred in.
    #[error("segment data is corrupt")]
    Corrupt,

    /// The segment no longer accepts writes.
    #[error("segment is sealed")]
    Sealed,

    /// Underlying filesystem error.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type alias for segment-level operations.
pub type SegmentResult<T> = std::result::Result<T, SegmentError>;

/// Errors surfaced by [`Store`](crate::store::engine::Store).
#[derive(Error, Debug)]
pub enum StoreError {
    /// No segment's index contains the key.
    #[error("key not found")]
    NotFound,

    /// Recovery hit a record that doesn't parse. Fatal for `open`.
    #[error("segment data is corrupt: {0}")]
    Corrupt(String),

    /// A compaction trigger observed one already running. Never returned
    /// from `put`/`get`; only used internally to drop a redundant trigger.
    #[error("a compaction is already running")]
    Busy,

    /// Underlying filesystem error.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type alias for store-level operations.
pub type Result<T> = std::result::Result<T, StoreError>;

impl From<SegmentError> for StoreError {
    fn from(err: SegmentError) -> Self {
        match err {
            SegmentError::NotFound => StoreError::NotFound,
            SegmentError::Corrupt => StoreError::Corrupt("segment record failed to decode".into()),
            // The store retries around a sealed segment internally; if one
            // ever escapes here a caller bypassed that retry loop.
            SegmentError::Sealed => {
                StoreError::Io(io::Error::other("write raced with segment seal"))
            },
            SegmentError::Io(e) => StoreError::Io(e),
        }
    }
}
