//! A single append-only segment file plus its in-memory index.
//!
//! An active segment owns a background writer thread that is the sole
//! appender to the file. Every segment, active or sealed, also opens a
//! read handle once at construction time and keeps it for the rest of its
//! life: `get`/`scan` read through that handle with positioned (`pread`)
//! reads rather than reopening the current path, so a segment a reader is
//! still holding stays readable even after the combiner renames or removes
//! the path it was opened from (see DESIGN.md).

use crate::store::error::SegmentError;
use crate::store::index::Index;
use crate::store::record::{self, Entry};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Read, Write};
use std::os::unix::fs::FileExt;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Role a segment is opened with. Only the active role spawns a writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Active,
    Sealed,
}

struct Inner {
    index: Index,
    write_offset: u64,
    sealed: bool,
}

struct WriteJob {
    entry: Entry,
    ack: mpsc::SyncSender<Result<(), SegmentError>>,
}

struct Writer {
    sender: mpsc::Sender<WriteJob>,
    handle: JoinHandle<()>,
}

/// A handle the caller of [`Segment::put`] awaits for durability
/// acknowledgment. Resolves once the writer thread has applied (or failed
/// to apply) the write, in submission order.
pub struct Completion(mpsc::Receiver<Result<(), SegmentError>>);

impl Completion {
    pub fn wait(self) -> Result<(), SegmentError> {
        self.0
            .recv()
            .unwrap_or_else(|_| Err(SegmentError::Io(std::io::Error::other("writer thread gone"))))
    }
}

pub struct Segment {
    path: Mutex<PathBuf>,
    max_size: u64,
    inner: Arc<Mutex<Inner>>,
    read_handle: File,
    writer: Mutex<Option<Writer>>,
}

/// Adapts a `&File` for positioned reads so it can be used as an
/// `io::Read` stream without sharing a seek cursor with any other
/// concurrent reader of the same handle. Each instance tracks its own
/// position locally and reads via `pread`, which never touches the file's
/// kernel-level offset.
struct PositionedReader<'a> {
    file: &'a File,
    pos: u64,
}

impl Read for PositionedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.file.read_at(buf, self.pos)?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl Segment {
    /// Opens (creating if absent) the file at `path`. If `role` is
    /// [`Role::Active`], starts the background writer thread. Also opens a
    /// read handle on `path` that is kept for the segment's lifetime,
    /// independent of whatever later happens to the path itself.
    pub fn open(path: impl Into<PathBuf>, max_size: u64, role: Role) -> Result<Segment, SegmentError> {
        let path = path.into();
        // Ensure the file exists. The active-role writer thread opens its
        // own handle for appends; this call just guarantees presence.
        OpenOptions::new().create(true).append(true).open(&path)?;
        let read_handle = File::open(&path)?;

        let inner = Arc::new(Mutex::new(Inner {
            index: Index::new(),
            write_offset: 0,
            sealed: role == Role::Sealed,
        }));

        let writer = match role {
            Role::Active => {
                let (sender, receiver) = mpsc::channel();
                let handle = spawn_writer(path.clone(), Arc::clone(&inner), max_size, receiver);
                Some(Writer { sender, handle })
            },
            Role::Sealed => None,
        };

        Ok(Segment {
            path: Mutex::new(path),
            max_size,
            inner,
            read_handle,
            writer: Mutex::new(writer),
        })
    }

    /// Scans the file from offset 0, rebuilding the index. Duplicate keys
    /// overwrite: later (higher-offset) entries win. Meant for segments
    /// opened with [`Role::Sealed`] right after [`Segment::open`]; runs
    /// before any concurrent reader can be using the handle, so reading
    /// through it sequentially here is safe.
    pub fn recover(&self) -> Result<(), SegmentError> {
        let mut reader = BufReader::new(&self.read_handle);
        let mut offset: u64 = 0;
        let mut index = Index::new();

        loop {
            let mut total_len_buf = [0u8; 4];
            let mut read_so_far = 0usize;
            loop {
                let n = reader.read(&mut total_len_buf[read_so_far..])?;
                if n == 0 {
                    break;
                }
                read_so_far += n;
                if read_so_far == total_len_buf.len() {
                    break;
                }
            }
            if read_so_far == 0 {
                break; // clean EOF at a record boundary
            }
            if read_so_far < total_len_buf.len() {
                return Err(SegmentError::Corrupt); // partial header
            }

            let total_len = u32::from_le_bytes(total_len_buf) as usize;
            if total_len < 4 {
                return Err(SegmentError::Corrupt);
            }
            let mut rest = vec![0u8; total_len - 4];
            reader.read_exact(&mut rest).map_err(|_| SegmentError::Corrupt)?;

            let mut full = Vec::with_capacity(total_len);
            full.extend_from_slice(&total_len_buf);
            full.extend_from_slice(&rest);
            let entry = Entry::decode(&full)?;

            index.insert(entry.key, offset);
            offset += total_len as u64;
        }

        let mut guard = self.inner.lock();
        guard.index = index;
        guard.write_offset = offset;
        Ok(())
    }

    /// Enqueues a write on this (active) segment and returns a handle the
    /// caller awaits for durability acknowledgment. Returns
    /// [`SegmentError::Sealed`] if the segment no longer accepts writes.
    pub fn put(&self, entry: Entry) -> Result<Completion, SegmentError> {
        if self.inner.lock().sealed {
            return Err(SegmentError::Sealed);
        }
        let writer_guard = self.writer.lock();
        let writer = writer_guard.as_ref().ok_or(SegmentError::Sealed)?;
        let (ack_tx, ack_rx) = mpsc::sync_channel(1);
        writer
            .sender
            .send(WriteJob { entry, ack: ack_tx })
            .map_err(|_| SegmentError::Sealed)?;
        Ok(Completion(ack_rx))
    }

    /// Looks up `key` in the index; on hit, reads the record at the
    /// recorded offset through the segment's cached read handle and
    /// decodes the value. Uses positioned reads rather than the path, so a
    /// concurrent rename or removal of the path (by the combiner) never
    /// affects a lookup already in flight.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>, SegmentError> {
        let offset = {
            let guard = self.inner.lock();
            guard.index.get(key).ok_or(SegmentError::NotFound)?
        };
        let mut reader = PositionedReader {
            file: &self.read_handle,
            pos: offset,
        };
        record::read_value(&mut reader)
    }

    /// Resolves every indexed key to its current value. Since the index
    /// already points at each key's latest offset, this yields only the
    /// latest value per key.
    pub fn scan(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>, SegmentError> {
        let keys = self.inner.lock().index.keys();
        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            let value = self.get(&key)?;
            out.push((key, value));
        }
        Ok(out)
    }

    /// Snapshot of indexed keys, without resolving their values. Used by
    /// `Store::stats` to count live keys without the I/O of a full scan.
    pub fn indexed_keys(&self) -> Vec<Vec<u8>> {
        self.inner.lock().index.keys()
    }

    /// Renames the backing file. Used by the combiner to place the merged
    /// segment at the position of the newest-merged original.
    pub fn relocate(&self, new_path: impl Into<PathBuf>) -> Result<(), SegmentError> {
        let new_path = new_path.into();
        let mut path_guard = self.path.lock();
        fs::rename(&*path_guard, &new_path)?;
        *path_guard = new_path;
        Ok(())
    }

    /// Deletes the backing file. Only valid once no successor references it.
    pub fn remove(&self) -> Result<(), SegmentError> {
        let path = self.path.lock().clone();
        fs::remove_file(path)?;
        Ok(())
    }

    /// Stops accepting new writes and, if a writer thread is running, closes
    /// its queue and waits for it to drain before returning.
    pub fn seal(&self) -> Result<(), SegmentError> {
        self.inner.lock().sealed = true;
        self.stop_writer()
    }

    fn stop_writer(&self) -> Result<(), SegmentError> {
        let writer = self.writer.lock().take();
        if let Some(writer) = writer {
            drop(writer.sender); // closes the queue; iterator in the writer thread ends
            writer
                .handle
                .join()
                .map_err(|_| SegmentError::Io(std::io::Error::other("writer thread panicked")))?;
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        !self.inner.lock().sealed
    }

    pub fn path(&self) -> PathBuf {
        self.path.lock().clone()
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }
}

/// The single writer task for an active segment: consumes the job queue in
/// order, appending each entry, updating the index, and checking whether
/// the size threshold has been crossed. Only one such thread exists per
/// segment for its entire active lifetime.
fn spawn_writer(
    path: PathBuf,
    inner: Arc<Mutex<Inner>>,
    max_size: u64,
    receiver: mpsc::Receiver<WriteJob>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut file = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => file,
            Err(e) => {
                let message = e.to_string();
                for job in receiver.iter() {
                    let _ = job
                        .ack
                        .send(Err(SegmentError::Io(std::io::Error::other(message.clone()))));
                }
                return;
            },
        };

        for job in receiver.iter() {
            let encoded = job.entry.encode();
            let key = job.entry.key;
            let result = file.write_all(&encoded).and_then(|_| file.flush());

            match result {
                Ok(()) => {
                    let sealed_now = {
                        let mut guard = inner.lock();
                        let offset = guard.write_offset;
                        guard.index.insert(key, offset);
                        guard.write_offset = offset + encoded.len() as u64;
                        let crossed = guard.write_offset >= max_size;
                        if crossed {
                            guard.sealed = true;
                        }
                        crossed
                    };
                    let _ = job.ack.send(Ok(()));
                    if sealed_now {
                        log::debug!("segment {} crossed its size threshold, sealing", path.display());
                        // The size threshold has been crossed: this thread
                        // stops draining, and whatever is still queued is
                        // rejected rather than applied.
                        for pending in receiver.try_iter() {
                            let _ = pending.ack.send(Err(SegmentError::Sealed));
                        }
                        break;
                    }
                },
                Err(e) => {
                    let _ = job.ack.send(Err(SegmentError::Io(e)));
                },
            }
        }
    })
}
