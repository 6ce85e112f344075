//! Invocation messages.
//!
//! Outbound calls are [`ServerInvocation`] and [`StreamInvocation`]; calls
//! made by the remote side arrive as [`ClientInvocation`], whose arguments
//! are decoded one at a time through an [`ArgumentCursor`].

use bytes::Bytes;
use serde::de::{DeserializeOwned, Error as _};
use serde_json::value::RawValue;

use super::Argument;
use crate::error::{HubError, Result};

/// Call a hub method on the remote side.
#[derive(Debug)]
pub struct ServerInvocation {
    invocation_id: Option<String>,
    target: String,
    arguments: Vec<Argument>,
    stream_ids: Option<Vec<String>>,
}

impl ServerInvocation {
    /// Fire-and-forget invocation of `target`.
    pub fn new(target: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self {
            invocation_id: None,
            target: target.into(),
            arguments,
            stream_ids: None,
        }
    }

    /// Ask for a completion correlated by `invocation_id`.
    pub fn with_invocation_id(mut self, invocation_id: impl Into<String>) -> Self {
        self.invocation_id = Some(invocation_id.into());
        self
    }

    /// Attach ids of client-to-server streams passed as arguments.
    pub fn with_stream_ids(mut self, stream_ids: Vec<String>) -> Self {
        self.stream_ids = Some(stream_ids);
        self
    }

    /// Correlation id, `None` for fire-and-forget calls.
    pub fn invocation_id(&self) -> Option<&str> {
        self.invocation_id.as_deref()
    }

    /// Hub method name.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Arguments in call order.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Ids of client-to-server streams, if any.
    pub fn stream_ids(&self) -> Option<&[String]> {
        self.stream_ids.as_deref()
    }
}

/// Start a server-to-client stream. Same shape as [`ServerInvocation`]
/// with a mandatory invocation id.
#[derive(Debug)]
pub struct StreamInvocation {
    invocation_id: String,
    target: String,
    arguments: Vec<Argument>,
    stream_ids: Option<Vec<String>>,
}

impl StreamInvocation {
    /// Streaming invocation of `target`, correlated by `invocation_id`.
    pub fn new(
        invocation_id: impl Into<String>,
        target: impl Into<String>,
        arguments: Vec<Argument>,
    ) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            target: target.into(),
            arguments,
            stream_ids: None,
        }
    }

    /// Attach ids of client-to-server streams passed as arguments.
    pub fn with_stream_ids(mut self, stream_ids: Vec<String>) -> Self {
        self.stream_ids = Some(stream_ids);
        self
    }

    /// Id that stream items and the final completion refer to.
    pub fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    /// Hub method name.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Arguments in call order.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Ids of client-to-server streams, if any.
    pub fn stream_ids(&self) -> Option<&[String]> {
        self.stream_ids.as_deref()
    }
}

/// Positional arguments of a received invocation, decoded on demand.
///
/// A failed decode does not advance the cursor, so the same argument can be
/// retried as another type.
#[derive(Debug)]
pub struct ArgumentCursor {
    items: Vec<Box<RawValue>>,
    position: usize,
}

impl ArgumentCursor {
    pub(crate) fn new(items: Vec<Box<RawValue>>) -> Self {
        Self { items, position: 0 }
    }

    /// Whether unread arguments remain.
    pub fn has_more(&self) -> bool {
        self.position < self.items.len()
    }

    /// Number of unread arguments.
    pub fn remaining(&self) -> usize {
        self.items.len() - self.position
    }

    /// Decode the next argument as `T` and advance.
    ///
    /// # Errors
    ///
    /// [`HubError::Serialization`] when the cursor is exhausted or the
    /// token does not decode as `T`.
    pub fn decode_next<T: DeserializeOwned>(&mut self) -> Result<T> {
        let raw = self.items.get(self.position).ok_or_else(|| {
            HubError::Serialization(serde_json::Error::custom(format!(
                "all {} arguments have been read",
                self.items.len()
            )))
        })?;

        let value = serde_json::from_str(raw.get())?;
        self.position += 1;
        Ok(value)
    }
}

/// Invocation received from the remote side.
#[derive(Debug)]
pub struct ClientInvocation {
    invocation_id: Option<String>,
    target: String,
    arguments: Option<ArgumentCursor>,
    raw_payload: Bytes,
}

impl ClientInvocation {
    pub(crate) fn received(
        invocation_id: Option<String>,
        target: String,
        arguments: Option<Vec<Box<RawValue>>>,
        raw_payload: Bytes,
    ) -> Self {
        Self {
            invocation_id,
            target,
            arguments: arguments.map(ArgumentCursor::new),
            raw_payload,
        }
    }

    /// Set when the remote side expects a completion back.
    pub fn invocation_id(&self) -> Option<&str> {
        self.invocation_id.as_deref()
    }

    /// Hub method name.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Decode the next positional argument as `T`.
    ///
    /// # Errors
    ///
    /// - [`HubError::InvalidOperation`] if the frame had no `arguments` field.
    /// - [`HubError::Serialization`] if arguments are exhausted or the next
    ///   one does not decode as `T`.
    pub fn next_argument<T: DeserializeOwned>(&mut self) -> Result<T> {
        match self.arguments.as_mut() {
            Some(cursor) => cursor.decode_next(),
            None => Err(HubError::invalid_operation(format!(
                "invocation of '{}' carried no arguments",
                self.target
            ))),
        }
    }

    /// `false` once every argument is read, or if there were none.
    pub fn has_more_arguments(&self) -> bool {
        self.arguments.as_ref().is_some_and(ArgumentCursor::has_more)
    }

    /// Direct access to the argument cursor, if any.
    pub fn arguments(&mut self) -> Option<&mut ArgumentCursor> {
        self.arguments.as_mut()
    }

    /// Exact bytes of the frame this invocation was decoded from.
    pub fn raw_payload(&self) -> &Bytes {
        &self.raw_payload
    }
}
