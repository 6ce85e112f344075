//! Codec module - converting between frames and [`HubMessage`]s.
//!
//! - [`HubProtocol`] - interface the connection layer talks to
//! - [`JsonHubProtocol`] - JSON text encoding (`"json"`, version 1)
//!
//! # Design
//!
//! Codecs hold no per-connection state. The caller owns the receive buffer
//! (see [`FrameBuffer`](crate::protocol::FrameBuffer)) and hands the codec
//! whole frames; anything after the last terminator is dropped by
//! `parse_messages` and must be resubmitted together with later bytes.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use hubwire::codec::{HubProtocol, JsonHubProtocol};
//! use hubwire::messages::{CancelInvocation, HubMessage};
//!
//! let protocol = JsonHubProtocol::new();
//!
//! let bytes = protocol
//!     .write_message(&HubMessage::from(CancelInvocation::new("7")))
//!     .unwrap();
//! assert_eq!(&bytes[..], b"{\"type\":5,\"invocationId\":\"7\"}\x1e");
//!
//! let messages = protocol
//!     .parse_messages(Bytes::from_static(b"{\"type\":6}\x1e"))
//!     .unwrap();
//! assert!(matches!(messages[0], HubMessage::Ping));
//! ```

mod json;

use bytes::Bytes;

pub use json::JsonHubProtocol;

use crate::error::Result;
use crate::messages::HubMessage;

/// How frames are carried by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferFormat {
    /// UTF-8 text frames.
    Text,
    /// Arbitrary binary frames.
    Binary,
}

/// A hub protocol wire encoding.
pub trait HubProtocol: Send + Sync {
    /// Name announced during handshake negotiation.
    fn name(&self) -> &str;

    /// Encoding version announced during handshake negotiation.
    fn version(&self) -> u32;

    /// Transport capability this encoding needs.
    fn transfer_format(&self) -> TransferFormat;

    /// Decode every complete frame in `input`, in order.
    ///
    /// A trailing incomplete frame is dropped with a warning. The call fails
    /// as a whole if any frame is rejected.
    fn parse_messages(&self, input: Bytes) -> Result<Vec<HubMessage>>;

    /// Encode one message as a terminated frame.
    fn write_message(&self, message: &HubMessage) -> Result<Bytes>;
}
