//! Frame buffer for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` so complete frames are handed out without copying.
//! A codec only ever sees whole frames when input flows through here: each
//! push splits off every byte up to and including the last record
//! separator and keeps the rest for the next push.
//!
//! # Example
//!
//! ```
//! use hubwire::protocol::FrameBuffer;
//! use hubwire::{HubProtocol, JsonHubProtocol};
//!
//! let protocol = JsonHubProtocol::new();
//! let mut buffer = FrameBuffer::new();
//!
//! assert!(buffer.push(b"{\"type\"").unwrap().is_none());
//!
//! let batch = buffer.push(b":6}\x1e").unwrap().unwrap();
//! let messages = protocol.parse_messages(batch).unwrap();
//! assert_eq!(messages.len(), 1);
//! assert!(buffer.is_empty());
//! ```

use bytes::{Bytes, BytesMut};

use super::wire_format::complete_prefix_len;
use crate::error::{HubError, Result};

/// Default initial capacity (64 KB).
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Default limit on bytes held without a terminator (32 MB).
pub const DEFAULT_MAX_BUFFERED: usize = 32 * 1024 * 1024;

/// Buffer for accumulating incoming bytes and extracting complete frames.
pub struct FrameBuffer {
    /// Accumulated bytes not yet handed out.
    buffer: BytesMut,
    /// Maximum bytes held while waiting for a terminator.
    max_buffered: usize,
    /// Overflow found while a batch was handed out, reported on the next push.
    pending_overflow: Option<usize>,
}

impl FrameBuffer {
    /// Create a new frame buffer with default settings.
    ///
    /// Default capacity: 64KB, max buffered: 32MB.
    pub fn new() -> Self {
        Self::with_capacity_and_max_buffered(DEFAULT_BUFFER_CAPACITY, DEFAULT_MAX_BUFFERED)
    }

    /// Create a new frame buffer with a custom limit on unterminated bytes.
    pub fn with_max_buffered(max_buffered: usize) -> Self {
        Self::with_capacity_and_max_buffered(DEFAULT_BUFFER_CAPACITY, max_buffered)
    }

    /// Create a new frame buffer with custom capacity and limit.
    pub fn with_capacity_and_max_buffered(capacity: usize, max_buffered: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            max_buffered,
            pending_overflow: None,
        }
    }

    /// Push data into the buffer and split off all complete frames.
    ///
    /// Returns the terminated prefix (one or more frames, terminators
    /// included) ready for `parse_messages`, or `None` if no frame is
    /// complete yet.
    ///
    /// # Errors
    ///
    /// [`HubError::BufferOverflow`] if the unterminated tail grows past the
    /// limit. The tail is discarded. Complete frames that arrived in the same
    /// push are still returned, and the overflow is reported by the next
    /// push instead, whose data is dropped along with it.
    pub fn push(&mut self, data: &[u8]) -> Result<Option<Bytes>> {
        if let Some(buffered) = self.pending_overflow.take() {
            return Err(self.overflow(buffered));
        }

        // Bytes already held contain no terminator, so only `data` is searched.
        let held = self.buffer.len();
        self.buffer.extend_from_slice(data);

        let batch = complete_prefix_len(data).map(|len| self.buffer.split_to(held + len).freeze());

        if self.buffer.len() > self.max_buffered {
            let buffered = self.buffer.len();
            self.buffer.clear();
            tracing::warn!(
                "Discarding {} unterminated bytes (limit {})",
                buffered,
                self.max_buffered
            );
            return match batch {
                Some(batch) => {
                    self.pending_overflow = Some(buffered);
                    Ok(Some(batch))
                }
                None => Err(self.overflow(buffered)),
            };
        }

        Ok(batch)
    }

    fn overflow(&self, buffered: usize) -> HubError {
        HubError::BufferOverflow {
            buffered,
            max: self.max_buffered,
        }
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop any buffered bytes and forget a pending overflow.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.pending_overflow = None;
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
