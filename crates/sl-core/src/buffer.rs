//! Record buffers.
//!
//! Every record is assembled in exactly one buffer owned by the encoding
//! call:
//! - [`StackBuf`]: fixed 1 KiB array in the caller's frame, for short records
//! - [`HeapBuf`]: a bounded heap region, checked out of a [`BufferPool`] or
//!   allocated once for an overflow retry
//! - `Vec<u8>`: unbounded, used only by the fallback path
//!
//! Writes are bounds-checked and fail with [`Overflow`] instead of growing.

use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Capacity of the stack buffer.
pub const STACK_CAPACITY: usize = 1024;

/// Records with more fields than this never use the stack buffer.
pub const STACK_FIELD_LIMIT: usize = 4;

/// Minimum size of the single overflow retry.
pub const RETRY_FLOOR: usize = 2048;

/// Buffers that grew past this are dropped instead of being pooled.
const MAX_POOLED_CAPACITY: usize = 64 * 1024;

/// Maximum number of idle buffers kept by a pool.
const MAX_POOLED_BUFFERS: usize = 32;

/// A write did not fit in the buffer. Internal; never escapes a log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("record exceeds buffer capacity of {capacity} bytes")]
pub struct Overflow {
    pub capacity: usize,
}

/// A bounds-checked byte sink for one record.
pub trait RecordBuf {
    /// Append bytes, or fail without writing anything.
    fn extend(&mut self, bytes: &[u8]) -> Result<(), Overflow>;

    fn push(&mut self, byte: u8) -> Result<(), Overflow> {
        self.extend(&[byte])
    }

    fn as_bytes(&self) -> &[u8];

    /// Maximum number of bytes this buffer accepts.
    fn capacity(&self) -> usize;

    fn len(&self) -> usize {
        self.as_bytes().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}

/// Fixed-capacity buffer living on the encoding call's stack.
pub struct StackBuf {
    data: [u8; STACK_CAPACITY],
    len: usize,
}

impl StackBuf {
    pub fn new() -> Self {
        StackBuf {
            data: [0; STACK_CAPACITY],
            len: 0,
        }
    }
}

impl Default for StackBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBuf for StackBuf {
    #[inline]
    fn extend(&mut self, bytes: &[u8]) -> Result<(), Overflow> {
        let end = self.len + bytes.len();
        if end > STACK_CAPACITY {
            return Err(Overflow {
                capacity: STACK_CAPACITY,
            });
        }
        self.data[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }

    fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    fn capacity(&self) -> usize {
        STACK_CAPACITY
    }

    fn clear(&mut self) {
        self.len = 0;
    }
}

/// Heap buffer with a hard size limit.
#[derive(Debug)]
pub struct HeapBuf {
    data: Vec<u8>,
    limit: usize,
}

impl HeapBuf {
    /// One-off buffer accepting at most `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        HeapBuf {
            data: Vec::with_capacity(limit),
            limit,
        }
    }

    fn from_vec(mut data: Vec<u8>, limit: usize) -> Self {
        data.clear();
        data.reserve(limit);
        HeapBuf { data, limit }
    }

    fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl RecordBuf for HeapBuf {
    #[inline]
    fn extend(&mut self, bytes: &[u8]) -> Result<(), Overflow> {
        if self.data.len() + bytes.len() > self.limit {
            return Err(Overflow {
                capacity: self.limit,
            });
        }
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn capacity(&self) -> usize {
        self.limit
    }

    fn clear(&mut self) {
        self.data.clear();
    }
}

/// Unbounded; only the fallback path writes here.
impl RecordBuf for Vec<u8> {
    fn extend(&mut self, bytes: &[u8]) -> Result<(), Overflow> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn as_bytes(&self) -> &[u8] {
        self
    }

    fn capacity(&self) -> usize {
        usize::MAX
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

/// Check-out/check-in pool of heap buffers.
///
/// Buffers are cleared on both check-out and check-in; one buffer is owned
/// by exactly one encoding call at a time.
#[derive(Debug, Default)]
pub struct BufferPool {
    idle: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check out a buffer accepting at most `limit` bytes.
    pub fn acquire(&self, limit: usize) -> HeapBuf {
        let reused = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        match reused {
            Some(data) => HeapBuf::from_vec(data, limit),
            None => HeapBuf::with_limit(limit),
        }
    }

    /// Return a buffer to the pool.
    pub fn release(&self, buf: HeapBuf) {
        let mut data = buf.into_vec();
        if data.capacity() > MAX_POOLED_CAPACITY {
            return;
        }
        data.clear();
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < MAX_POOLED_BUFFERS {
            idle.push(data);
        }
    }

    /// Number of idle buffers.
    pub fn idle(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Estimated encoded size: raw content plus framing, with a 30% margin.
pub fn estimate_size(content_len: usize) -> usize {
    content_len + content_len * 3 / 10
}

/// Size of the one overflow retry after a buffer of `capacity` overflowed.
pub fn retry_size(capacity: usize) -> usize {
    capacity.saturating_mul(2).max(RETRY_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_buf_bounds() {
        let mut buf = StackBuf::new();
        buf.extend(&[b'a'; STACK_CAPACITY - 1]).unwrap();
        buf.push(b'b').unwrap();
        assert_eq!(buf.len(), STACK_CAPACITY);
        assert_eq!(
            buf.push(b'c'),
            Err(Overflow {
                capacity: STACK_CAPACITY
            })
        );
        assert_eq!(buf.len(), STACK_CAPACITY);
        buf.clear();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_failed_write_leaves_buffer_intact() {
        let mut buf = HeapBuf::with_limit(4);
        buf.extend(b"ab").unwrap();
        assert!(buf.extend(b"cde").is_err());
        assert_eq!(buf.as_bytes(), b"ab");
        buf.extend(b"cd").unwrap();
        assert_eq!(buf.as_bytes(), b"abcd");
    }

    #[test]
    fn test_pool_reuses_and_clears() {
        let pool = BufferPool::new();
        let mut buf = pool.acquire(64);
        buf.extend(b"leftover").unwrap();
        pool.release(buf);
        assert_eq!(pool.idle(), 1);

        let buf = pool.acquire(128);
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 128);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_pool_drops_oversized() {
        let pool = BufferPool::new();
        let buf = pool.acquire(MAX_POOLED_CAPACITY * 2);
        pool.release(buf);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_retry_size_floor() {
        assert_eq!(retry_size(100), RETRY_FLOOR);
        assert_eq!(retry_size(STACK_CAPACITY), RETRY_FLOOR);
        assert_eq!(retry_size(4096), 8192);
        assert_eq!(retry_size(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_estimate_margin() {
        assert_eq!(estimate_size(1000), 1300);
        assert_eq!(estimate_size(0), 0);
    }
}
