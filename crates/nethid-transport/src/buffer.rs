use tracing::debug;

use crate::error::{Result, TransportError};

/// Default capacity of a working buffer, in bytes.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// A reusable byte buffer owned by one side of a session.
///
/// Capacity only ever grows. A failed growth leaves the buffer untouched
/// and reports [`TransportError::OutOfMemory`].
#[derive(Debug)]
pub struct WorkingBuffer {
    buf: Vec<u8>,
}

impl WorkingBuffer {
    /// Allocate a zeroed buffer of `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut buffer = Self { buf: Vec::new() };
        buffer.ensure_capacity(capacity)?;
        Ok(buffer)
    }

    /// Grow the buffer to at least `len` bytes and return the new capacity.
    pub fn ensure_capacity(&mut self, len: usize) -> Result<usize> {
        if len <= self.buf.len() {
            return Ok(self.buf.len());
        }

        let additional = len - self.buf.len();
        self.buf
            .try_reserve_exact(additional)
            .map_err(|_| TransportError::OutOfMemory { requested: len })?;
        debug!(from = self.buf.len(), to = len, "growing working buffer");
        self.buf.resize(len, 0);
        Ok(self.buf.len())
    }

    /// Usable capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The first `len` bytes. Panics if `len` exceeds the capacity.
    pub fn as_slice(&self, len: usize) -> &[u8] {
        &self.buf[..len]
    }

    /// The first `len` bytes, mutably. Panics if `len` exceeds the capacity.
    pub fn as_mut_slice(&mut self, len: usize) -> &mut [u8] {
        &mut self.buf[..len]
    }

    /// The whole buffer, mutably.
    pub fn as_full_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}
