//! # hubwire
//!
//! Message codec for the hub RPC protocol.
//!
//! This crate turns framed text payloads into [`HubMessage`] values and
//! back. It knows nothing about sockets, reconnection, handshakes, or which
//! call an invocation id belongs to; a connection layer supplies bytes and
//! consumes messages.
//!
//! ## Architecture
//!
//! - **Messages**: closed set of message variants ([`messages`])
//! - **Framing**: record-separator terminated frames ([`protocol`])
//! - **Codec**: JSON encoding behind the [`HubProtocol`] trait ([`codec`])
//! - **Transport**: async reader/writer adapters ([`transport`])
//!
//! ## Example
//!
//! ```
//! use bytes::Bytes;
//! use hubwire::messages::{Argument, ServerInvocation};
//! use hubwire::{HubMessage, HubProtocol, JsonHubProtocol};
//!
//! let protocol = JsonHubProtocol::new();
//!
//! let outbound = ServerInvocation::new("Send", vec![Argument::new("hi"), Argument::new(42)]);
//! let bytes = protocol.write_message(&outbound.into()).unwrap();
//!
//! let mut messages = protocol.parse_messages(bytes).unwrap();
//! if let HubMessage::ClientInvocation(invocation) = &mut messages[0] {
//!     assert_eq!(invocation.next_argument::<String>().unwrap(), "hi");
//!     assert_eq!(invocation.next_argument::<i64>().unwrap(), 42);
//!     assert!(!invocation.has_more_arguments());
//! }
//! ```

pub mod codec;
pub mod error;
pub mod messages;
pub mod protocol;
pub mod transport;

pub use codec::{HubProtocol, JsonHubProtocol, TransferFormat};
pub use error::{FrameError, HubError};
pub use messages::{HubMessage, MessageKind};
