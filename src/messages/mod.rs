//! Message model - the closed set of hub protocol messages.
//!
//! Every message on the wire carries an integer `type` tag naming its
//! [`MessageKind`]. [`HubMessage`] is the sum of all variants; codecs
//! dispatch on it exhaustively in both directions.
//!
//! # Example
//!
//! ```
//! use hubwire::messages::{Argument, HubMessage, MessageKind, ServerInvocation};
//!
//! let message = HubMessage::from(
//!     ServerInvocation::new("Send", vec![Argument::new("hi"), Argument::new(42)])
//!         .with_invocation_id("1"),
//! );
//! assert_eq!(message.kind(), MessageKind::Invocation);
//! assert!(message.raw_payload().is_none());
//! ```

mod completion;
mod invocation;
mod payload;
mod stream;

use bytes::Bytes;

pub use completion::{Close, Completion};
pub use invocation::{ArgumentCursor, ClientInvocation, ServerInvocation, StreamInvocation};
pub use payload::{Argument, HubArgument};
pub use stream::{CancelInvocation, StreamItem};

/// Wire discriminator of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageKind {
    /// Call of a hub method, blocking or fire-and-forget.
    Invocation = 1,
    /// One item of a streaming result.
    StreamItem = 2,
    /// Final outcome of an invocation or stream.
    Completion = 3,
    /// Call of a hub method that streams its result.
    StreamInvocation = 4,
    /// Request to stop a running stream.
    CancelInvocation = 5,
    /// Keep-alive.
    Ping = 6,
    /// Connection close notice.
    Close = 7,
}

impl MessageKind {
    /// Integer tag written in the `type` field.
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Look up a kind by its wire tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Invocation),
            2 => Some(Self::StreamItem),
            3 => Some(Self::Completion),
            4 => Some(Self::StreamInvocation),
            5 => Some(Self::CancelInvocation),
            6 => Some(Self::Ping),
            7 => Some(Self::Close),
            _ => None,
        }
    }
}

/// Any hub protocol message.
///
/// `ServerInvocation` and `ClientInvocation` share the
/// [`MessageKind::Invocation`] tag: the former is built for sending,
/// the latter only comes out of a decoder.
#[derive(Debug)]
pub enum HubMessage {
    /// Outbound invocation.
    ServerInvocation(ServerInvocation),
    /// Inbound invocation with lazily decoded arguments.
    ClientInvocation(ClientInvocation),
    StreamItem(StreamItem),
    Completion(Completion),
    /// Outbound streaming invocation.
    StreamInvocation(StreamInvocation),
    CancelInvocation(CancelInvocation),
    /// Keep-alive. Stateless, so every ping is this same value.
    Ping,
    Close(Close),
}

impl HubMessage {
    /// The shared ping message.
    pub const PING: HubMessage = HubMessage::Ping;

    /// Wire kind of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::ServerInvocation(_) | Self::ClientInvocation(_) => MessageKind::Invocation,
            Self::StreamItem(_) => MessageKind::StreamItem,
            Self::Completion(_) => MessageKind::Completion,
            Self::StreamInvocation(_) => MessageKind::StreamInvocation,
            Self::CancelInvocation(_) => MessageKind::CancelInvocation,
            Self::Ping => MessageKind::Ping,
            Self::Close(_) => MessageKind::Close,
        }
    }

    /// Bytes of the frame this message was decoded from, terminator excluded.
    ///
    /// `None` for locally constructed messages. Decoded pings are also `None`:
    /// every ping is the shared [`HubMessage::PING`] value, so pings are the
    /// one decoded kind that does not carry its source frame.
    pub fn raw_payload(&self) -> Option<&Bytes> {
        match self {
            Self::ClientInvocation(m) => Some(m.raw_payload()),
            Self::StreamItem(m) => m.raw_payload(),
            Self::Completion(m) => m.raw_payload(),
            Self::Close(m) => m.raw_payload(),
            Self::ServerInvocation(_)
            | Self::StreamInvocation(_)
            | Self::CancelInvocation(_)
            | Self::Ping => None,
        }
    }
}

impl From<ServerInvocation> for HubMessage {
    fn from(message: ServerInvocation) -> Self {
        Self::ServerInvocation(message)
    }
}

impl From<ClientInvocation> for HubMessage {
    fn from(message: ClientInvocation) -> Self {
        Self::ClientInvocation(message)
    }
}

impl From<StreamItem> for HubMessage {
    fn from(message: StreamItem) -> Self {
        Self::StreamItem(message)
    }
}

impl From<Completion> for HubMessage {
    fn from(message: Completion) -> Self {
        Self::Completion(message)
    }
}

impl From<StreamInvocation> for HubMessage {
    fn from(message: StreamInvocation) -> Self {
        Self::StreamInvocation(message)
    }
}

impl From<CancelInvocation> for HubMessage {
    fn from(message: CancelInvocation) -> Self {
        Self::CancelInvocation(message)
    }
}

impl From<Close> for HubMessage {
    fn from(message: Close) -> Self {
        Self::Close(message)
    }
}
