//! Error types for hubwire.

use thiserror::Error;

/// Main error type for all hub protocol operations.
#[derive(Debug, Error)]
pub enum HubError {
    /// An inbound frame could not be matched to a known message kind
    /// or did not decode against its matched shape.
    #[error("Protocol violation: {0}")]
    ProtocolViolation(#[source] FrameError),

    /// Misuse of the API (wrong message kind for the operation,
    /// typed access on a message that has nothing to decode).
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A typed accessor or an outbound argument failed to (de)serialize.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error from the underlying reader or writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Buffered bytes grew past the limit without a frame terminator.
    #[error("Buffered {buffered} bytes without a frame terminator (max {max})")]
    BufferOverflow {
        /// Bytes held when the limit was hit.
        buffered: usize,
        /// Configured limit.
        max: usize,
    },
}

/// Underlying cause of a [`HubError::ProtocolViolation`].
#[derive(Debug, Error)]
pub enum FrameError {
    /// The frame is not valid JSON, lacks the `type` field, or does not
    /// match the shape of its message kind.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The discriminator names a kind this endpoint never receives.
    #[error("unexpected message type {0}")]
    UnexpectedKind(u8),
}

impl HubError {
    pub(crate) fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    /// Returns `true` for [`HubError::ProtocolViolation`].
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::ProtocolViolation(_))
    }

    /// Returns `true` for [`HubError::InvalidOperation`].
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation(_))
    }
}

impl From<FrameError> for HubError {
    fn from(err: FrameError) -> Self {
        Self::ProtocolViolation(err)
    }
}

/// Result type alias using HubError.
pub type Result<T> = std::result::Result<T, HubError>;
