//! Type-erased values carried by messages.
//!
//! Outbound values are held as [`Argument`]s and only serialized when the
//! message is written. Inbound values stay as raw JSON tokens until a caller
//! asks for them with a concrete type.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::value::RawValue;

use crate::error::{HubError, Result};

/// Anything that can be written as a hub argument, result, or stream item.
///
/// Blanket-implemented for every `Serialize + Send + Sync` type. The codec
/// never inspects the value; it asks for its JSON token and forwards it.
pub trait HubArgument: Send + Sync {
    /// Serialize this value into a standalone JSON token.
    fn to_raw_json(&self) -> serde_json::Result<Box<RawValue>>;
}

impl<T: Serialize + Send + Sync> HubArgument for T {
    fn to_raw_json(&self) -> serde_json::Result<Box<RawValue>> {
        serde_json::value::to_raw_value(self)
    }
}

/// A boxed, type-erased outbound value.
pub struct Argument(Box<dyn HubArgument>);

impl Argument {
    /// Box any serializable value.
    pub fn new<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self(Box::new(value))
    }

    /// Serialize to a JSON token.
    pub fn encode(&self) -> Result<Box<RawValue>> {
        Ok(self.0.to_raw_json()?)
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.to_raw_json() {
            Ok(raw) => write!(f, "Argument({})", raw.get()),
            Err(_) => f.write_str("Argument(<unserializable>)"),
        }
    }
}

/// Single-value slot of a stream item or completion result.
#[derive(Debug)]
pub(crate) enum Payload {
    /// Built by the caller for sending.
    Local(Argument),
    /// Raw token taken from a decoded frame.
    Received(Box<RawValue>),
}

impl Payload {
    pub(crate) fn local<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self::Local(Argument::new(value))
    }

    /// JSON token to put on the wire. Received tokens pass through untouched.
    pub(crate) fn encode(&self) -> Result<Box<RawValue>> {
        match self {
            Self::Local(argument) => argument.encode(),
            Self::Received(raw) => Ok(raw.clone()),
        }
    }

    /// Decode a received token as `T`. `what` names the slot in errors.
    pub(crate) fn decode<T: DeserializeOwned>(&self, what: &str) -> Result<T> {
        match self {
            Self::Local(_) => Err(HubError::invalid_operation(format!(
                "{what} was constructed locally and has nothing to decode"
            ))),
            Self::Received(raw) => Ok(serde_json::from_str(raw.get())?),
        }
    }
}
