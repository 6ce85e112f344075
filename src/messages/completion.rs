//! Completion and close messages.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::value::RawValue;

use super::payload::Payload;
use crate::error::{HubError, Result};

/// Final outcome of an invocation: an error, a result, or neither.
#[derive(Debug)]
pub struct Completion {
    invocation_id: String,
    error: Option<String>,
    result: Option<Payload>,
    has_result: bool,
    raw_payload: Option<Bytes>,
}

impl Completion {
    /// Completion of a call that returns nothing.
    pub fn void(invocation_id: impl Into<String>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            error: None,
            result: None,
            has_result: false,
            raw_payload: None,
        }
    }

    /// Successful completion carrying `result`.
    pub fn with_result<T>(invocation_id: impl Into<String>, result: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self {
            invocation_id: invocation_id.into(),
            error: None,
            result: Some(Payload::local(result)),
            has_result: true,
            raw_payload: None,
        }
    }

    /// Failed completion.
    pub fn with_error(invocation_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            error: Some(error.into()),
            result: None,
            has_result: false,
            raw_payload: None,
        }
    }

    /// `has_result` follows presence of the `result` field, not the error.
    pub(crate) fn received(
        invocation_id: String,
        error: Option<String>,
        result: Option<Box<RawValue>>,
        raw_payload: Bytes,
    ) -> Self {
        Self {
            invocation_id,
            error,
            has_result: result.is_some(),
            result: result.map(Payload::Received),
            raw_payload: Some(raw_payload),
        }
    }

    /// Id of the invocation this completes.
    pub fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    /// Error message of a failed invocation.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a `result` field is present, `null` included.
    pub fn has_result(&self) -> bool {
        self.has_result
    }

    /// Decode the result as `T`.
    ///
    /// Returns `Ok(None)` when the received frame had no `result` field.
    ///
    /// # Errors
    ///
    /// - [`HubError::InvalidOperation`] on a locally constructed completion.
    /// - [`HubError::Serialization`] if the result does not decode as `T`.
    pub fn result<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        if self.raw_payload.is_none() {
            return Err(HubError::invalid_operation(
                "completion was constructed locally and has nothing to decode",
            ));
        }

        self.result
            .as_ref()
            .map(|payload| payload.decode("completion result"))
            .transpose()
    }

    pub(crate) fn payload(&self) -> Option<&Payload> {
        self.result.as_ref()
    }

    /// Frame bytes, `None` for locally constructed completions.
    pub fn raw_payload(&self) -> Option<&Bytes> {
        self.raw_payload.as_ref()
    }
}

/// The remote side is closing the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Close {
    error: Option<String>,
    allow_reconnect: bool,
    raw_payload: Option<Bytes>,
}

impl Close {
    /// Close notice with an optional error.
    pub fn new(error: Option<String>) -> Self {
        Self {
            error,
            allow_reconnect: false,
            raw_payload: None,
        }
    }

    pub(crate) fn received(
        error: Option<String>,
        allow_reconnect: Option<bool>,
        raw_payload: Bytes,
    ) -> Self {
        Self {
            error,
            allow_reconnect: allow_reconnect.unwrap_or(false),
            raw_payload: Some(raw_payload),
        }
    }

    /// Reason given by the remote side, if the close was not clean.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the remote side allows the connection layer to reconnect.
    pub fn allow_reconnect(&self) -> bool {
        self.allow_reconnect
    }

    /// Frame bytes, `None` for locally constructed close messages.
    pub fn raw_payload(&self) -> Option<&Bytes> {
        self.raw_payload.as_ref()
    }
}
