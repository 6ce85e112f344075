//! Async message reader and writer over any byte stream.
//!
//! These adapters only move frames: no reconnection, handshake, or
//! invocation tracking happens here.
//!
//! # Example
//!
//! ```no_run
//! use hubwire::messages::Completion;
//! use hubwire::transport::{MessageReader, MessageWriter};
//! use hubwire::JsonHubProtocol;
//!
//! # async fn run() -> hubwire::error::Result<()> {
//! let (client, server) = tokio::io::duplex(64 * 1024);
//! let mut writer = MessageWriter::new(client, JsonHubProtocol::new());
//! let mut reader = MessageReader::new(server, JsonHubProtocol::new());
//!
//! writer.send(&Completion::with_result("1", "done").into()).await?;
//! drop(writer);
//!
//! while let Some(batch) = reader.next_batch().await? {
//!     for message in batch {
//!         println!("received {:?}", message.kind());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::codec::HubProtocol;
use crate::error::Result;
use crate::messages::HubMessage;
use crate::protocol::FrameBuffer;

/// Size of a single read from the underlying stream (64 KB).
const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Reads bytes from `R` and decodes them into batches of messages.
pub struct MessageReader<R, P> {
    reader: R,
    protocol: P,
    buffer: FrameBuffer,
    chunk: Vec<u8>,
}

impl<R, P> MessageReader<R, P>
where
    R: AsyncRead + Unpin,
    P: HubProtocol,
{
    /// Create a reader with a default [`FrameBuffer`].
    pub fn new(reader: R, protocol: P) -> Self {
        Self::with_buffer(reader, protocol, FrameBuffer::new())
    }

    /// Create a reader with a configured [`FrameBuffer`].
    pub fn with_buffer(reader: R, protocol: P, buffer: FrameBuffer) -> Self {
        Self {
            reader,
            protocol,
            buffer,
            chunk: vec![0u8; READ_CHUNK_SIZE],
        }
    }

    /// Read until at least one message is decoded.
    ///
    /// Returns `Ok(None)` when the stream ends. Bytes of an unfinished frame
    /// at end of stream are discarded with a warning.
    ///
    /// # Errors
    ///
    /// I/O errors, [`HubError::BufferOverflow`](crate::HubError::BufferOverflow),
    /// and protocol violations from the codec. After a protocol violation the
    /// offending batch is gone; reading may continue with later bytes. Frames
    /// completed in the same read as an overflowing tail are still returned,
    /// and the overflow is reported by the following call.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<HubMessage>>> {
        loop {
            let n = self.reader.read(&mut self.chunk).await?;
            if n == 0 {
                if !self.buffer.is_empty() {
                    tracing::warn!(
                        "Stream closed with {} bytes of an unfinished frame",
                        self.buffer.len()
                    );
                    self.buffer.clear();
                }
                return Ok(None);
            }

            let Some(batch) = self.buffer.push(&self.chunk[..n])? else {
                continue;
            };

            let messages = self.protocol.parse_messages(batch)?;
            if !messages.is_empty() {
                return Ok(Some(messages));
            }
        }
    }

    /// Bytes held for an unfinished frame.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Give back the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Encodes messages and writes them to `W`.
pub struct MessageWriter<W, P> {
    writer: W,
    protocol: P,
}

impl<W, P> MessageWriter<W, P>
where
    W: AsyncWrite + Unpin,
    P: HubProtocol,
{
    /// Create a writer over `writer`.
    pub fn new(writer: W, protocol: P) -> Self {
        Self { writer, protocol }
    }

    /// Encode `message`, write the frame, and flush.
    ///
    /// Nothing is written if encoding fails.
    pub async fn send(&mut self, message: &HubMessage) -> Result<()> {
        let frame = self.protocol.write_message(message)?;
        self.writer.write_all(&frame).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
