//! Streaming messages: items and cancellation.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::value::RawValue;

use super::payload::Payload;
use crate::error::Result;

/// One item of a stream identified by its invocation id.
#[derive(Debug)]
pub struct StreamItem {
    invocation_id: String,
    item: Payload,
    raw_payload: Option<Bytes>,
}

impl StreamItem {
    /// Item of the stream `invocation_id`.
    pub fn new<T>(invocation_id: impl Into<String>, item: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self {
            invocation_id: invocation_id.into(),
            item: Payload::local(item),
            raw_payload: None,
        }
    }

    pub(crate) fn received(invocation_id: String, item: Box<RawValue>, raw_payload: Bytes) -> Self {
        Self {
            invocation_id,
            item: Payload::Received(item),
            raw_payload: Some(raw_payload),
        }
    }

    /// Id of the stream this item belongs to.
    pub fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    /// Decode the received item as `T`.
    ///
    /// # Errors
    ///
    /// - [`HubError::InvalidOperation`](crate::HubError::InvalidOperation)
    ///   on a locally constructed item.
    /// - [`HubError::Serialization`](crate::HubError::Serialization) if the
    ///   item does not decode as `T`.
    pub fn item<T: DeserializeOwned>(&self) -> Result<T> {
        self.item.decode("stream item")
    }

    pub(crate) fn payload(&self) -> &Payload {
        &self.item
    }

    /// Frame bytes, `None` for locally constructed items.
    pub fn raw_payload(&self) -> Option<&Bytes> {
        self.raw_payload.as_ref()
    }
}

/// Ask the remote side to stop a stream it is producing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelInvocation {
    invocation_id: String,
}

impl CancelInvocation {
    /// Cancel the stream `invocation_id`.
    pub fn new(invocation_id: impl Into<String>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
        }
    }

    /// Id of the stream to stop.
    pub fn invocation_id(&self) -> &str {
        &self.invocation_id
    }
}
