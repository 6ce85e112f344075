//! JSON hub protocol.
//!
//! Every frame is a JSON object whose integer `type` field selects the
//! message shape, followed by the record separator:
//!
//! ```text
//! {"type":1,"invocationId":"1","target":"Send","arguments":["hi",42]}\x1e
//! {"type":3,"invocationId":"1","result":"ok"}\x1e
//! ```
//!
//! Argument, item, and result values are never converted to an
//! intermediate tree. Outbound values are serialized straight to JSON
//! tokens; inbound values are kept as raw tokens until a typed accessor
//! decodes them.

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

use super::{HubProtocol, TransferFormat};
use crate::error::{FrameError, HubError, Result};
use crate::messages::{
    Argument, ClientInvocation, Close, Completion, HubMessage, MessageKind, StreamItem,
};
use crate::protocol::{split_frames, SplitFrames, RECORD_SEPARATOR};

/// Protocol name used in handshake negotiation.
pub const PROTOCOL_NAME: &str = "json";

/// Protocol version used in handshake negotiation.
pub const PROTOCOL_VERSION: u32 = 1;

/// JSON text encoding of the hub protocol.
///
/// Stateless and cheap to copy; one instance can serve any number of
/// connections and threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonHubProtocol;

impl JsonHubProtocol {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }
}

impl HubProtocol for JsonHubProtocol {
    fn name(&self) -> &str {
        PROTOCOL_NAME
    }

    fn version(&self) -> u32 {
        PROTOCOL_VERSION
    }

    fn transfer_format(&self) -> TransferFormat {
        TransferFormat::Text
    }

    fn parse_messages(&self, input: Bytes) -> Result<Vec<HubMessage>> {
        let SplitFrames { frames, incomplete } = split_frames(&input);

        if let Some(tail) = incomplete {
            tracing::warn!(
                "Dropping incomplete trailing frame ({} bytes), resubmit it with the next read",
                tail.len()
            );
        }

        frames.into_iter().map(parse_frame).collect()
    }

    fn write_message(&self, message: &HubMessage) -> Result<Bytes> {
        let mut buf = match message {
            HubMessage::ServerInvocation(m) => serde_json::to_vec(&InvocationOut {
                kind: MessageKind::Invocation.tag(),
                invocation_id: m.invocation_id(),
                target: m.target(),
                arguments: encode_arguments(m.arguments())?,
                stream_ids: m.stream_ids(),
            })?,
            HubMessage::StreamInvocation(m) => serde_json::to_vec(&InvocationOut {
                kind: MessageKind::StreamInvocation.tag(),
                invocation_id: Some(m.invocation_id()),
                target: m.target(),
                arguments: encode_arguments(m.arguments())?,
                stream_ids: m.stream_ids(),
            })?,
            HubMessage::StreamItem(m) => serde_json::to_vec(&StreamItemOut {
                kind: MessageKind::StreamItem.tag(),
                invocation_id: m.invocation_id(),
                item: m.payload().encode()?,
            })?,
            HubMessage::Completion(m) => serde_json::to_vec(&CompletionOut {
                kind: MessageKind::Completion.tag(),
                invocation_id: m.invocation_id(),
                error: m.error(),
                result: m.payload().map(|payload| payload.encode()).transpose()?,
            })?,
            HubMessage::CancelInvocation(m) => serde_json::to_vec(&CancelInvocationOut {
                kind: MessageKind::CancelInvocation.tag(),
                invocation_id: m.invocation_id(),
            })?,
            HubMessage::ClientInvocation(_) => {
                return Err(HubError::invalid_operation(
                    "received invocations cannot be sent, build a ServerInvocation instead",
                ))
            }
            HubMessage::Ping => {
                return Err(HubError::invalid_operation(
                    "ping frames are not produced by write_message",
                ))
            }
            HubMessage::Close(_) => {
                return Err(HubError::invalid_operation("close messages are receive-only"))
            }
        };

        buf.push(RECORD_SEPARATOR);
        tracing::debug!("Encoded {:?} message ({} bytes)", message.kind(), buf.len());

        Ok(Bytes::from(buf))
    }
}

/// Decode one frame, reporting any failure as a protocol violation.
fn parse_frame(frame: Bytes) -> Result<HubMessage> {
    match decode_frame(frame) {
        Ok(message) => {
            tracing::debug!("Decoded {:?} message", message.kind());
            Ok(message)
        }
        Err(err) => {
            tracing::error!("Rejected inbound frame: {}", err);
            Err(HubError::ProtocolViolation(err))
        }
    }
}

fn decode_frame(frame: Bytes) -> std::result::Result<HubMessage, FrameError> {
    let Discriminator { tag } = serde_json::from_slice(&frame)?;
    let kind = MessageKind::from_tag(tag).ok_or(FrameError::UnexpectedKind(tag))?;

    let message: HubMessage = match kind {
        MessageKind::Invocation => {
            let wire: InvocationIn = serde_json::from_slice(&frame)?;
            ClientInvocation::received(wire.invocation_id, wire.target, wire.arguments, frame).into()
        }
        MessageKind::StreamItem => {
            let wire: StreamItemIn = serde_json::from_slice(&frame)?;
            StreamItem::received(wire.invocation_id, wire.item, frame).into()
        }
        MessageKind::Completion => {
            let wire: CompletionIn = serde_json::from_slice(&frame)?;
            Completion::received(wire.invocation_id, wire.error, wire.result, frame).into()
        }
        MessageKind::Ping => HubMessage::PING,
        MessageKind::Close => {
            let wire: CloseIn = serde_json::from_slice(&frame)?;
            Close::received(wire.error, wire.allow_reconnect, frame).into()
        }
        // Only ever sent by this endpoint.
        MessageKind::StreamInvocation | MessageKind::CancelInvocation => {
            return Err(FrameError::UnexpectedKind(tag))
        }
    };

    Ok(message)
}

fn encode_arguments(arguments: &[Argument]) -> Result<Vec<Box<RawValue>>> {
    arguments.iter().map(Argument::encode).collect()
}

/// Distinguishes `"result": null` (present) from a missing field.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(deserializer).map(Some)
}

// Inbound shapes

#[derive(Deserialize)]
struct Discriminator {
    #[serde(rename = "type")]
    tag: u8,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvocationIn {
    invocation_id: Option<String>,
    target: String,
    arguments: Option<Vec<Box<RawValue>>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamItemIn {
    invocation_id: String,
    item: Box<RawValue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompletionIn {
    invocation_id: String,
    error: Option<String>,
    #[serde(default, deserialize_with = "present")]
    result: Option<Box<RawValue>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CloseIn {
    error: Option<String>,
    allow_reconnect: Option<bool>,
}

// Outbound shapes

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InvocationOut<'a> {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    invocation_id: Option<&'a str>,
    target: &'a str,
    arguments: Vec<Box<RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream_ids: Option<&'a [String]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StreamItemOut<'a> {
    #[serde(rename = "type")]
    kind: u8,
    invocation_id: &'a str,
    item: Box<RawValue>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionOut<'a> {
    #[serde(rename = "type")]
    kind: u8,
    invocation_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Box<RawValue>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelInvocationOut<'a> {
    #[serde(rename = "type")]
    kind: u8,
    invocation_id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;
    use crate::messages::{CancelInvocation, ServerInvocation, StreamInvocation};
    use serde::Deserialize;
    use tracing_test::traced_test;

    fn parse(input: &'static [u8]) -> Result<Vec<HubMessage>> {
        JsonHubProtocol::new().parse_messages(Bytes::from_static(input))
    }

    fn write(message: impl Into<HubMessage>) -> Result<Bytes> {
        JsonHubProtocol::new().write_message(&message.into())
    }

    /// Strip the terminator and parse as a generic JSON value.
    fn written_json(bytes: &Bytes) -> serde_json::Value {
        assert_eq!(bytes.last(), Some(&RECORD_SEPARATOR));
        serde_json::from_slice(&bytes[..bytes.len() - 1]).unwrap()
    }

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Reading {
        sensor: String,
        value: f64,
    }

    #[test]
    fn test_identity() {
        let protocol = JsonHubProtocol::new();
        assert_eq!(protocol.name(), "json");
        assert_eq!(protocol.version(), 1);
        assert_eq!(protocol.transfer_format(), TransferFormat::Text);
    }

    #[test]
    fn test_protocol_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JsonHubProtocol>();
        assert_send_sync::<Box<dyn HubProtocol>>();
    }

    #[test]
    fn test_parse_ping() {
        let messages = parse(b"{\"type\":6}\x1e").unwrap();

        assert_eq!(messages.len(), 1);
        assert!(matches!(messages[0], HubMessage::Ping));
        assert!(messages[0].raw_payload().is_none());
    }

    #[test]
    fn test_parse_invocation_arguments() {
        let mut messages =
            parse(b"{\"type\":1,\"target\":\"Send\",\"arguments\":[\"hi\",42]}\x1e").unwrap();

        let HubMessage::ClientInvocation(invocation) = &mut messages[0] else {
            panic!("expected a client invocation");
        };
        assert_eq!(invocation.target(), "Send");
        assert!(invocation.invocation_id().is_none());
        assert!(invocation.has_more_arguments());

        assert_eq!(invocation.next_argument::<String>().unwrap(), "hi");
        assert_eq!(invocation.next_argument::<i64>().unwrap(), 42);
        assert!(!invocation.has_more_arguments());
    }

    #[test]
    fn test_parse_invocation_without_arguments_field() {
        let mut messages = parse(b"{\"type\":1,\"target\":\"Notify\"}\x1e").unwrap();

        let HubMessage::ClientInvocation(invocation) = &mut messages[0] else {
            panic!("expected a client invocation");
        };
        assert!(!invocation.has_more_arguments());
        assert!(invocation
            .next_argument::<String>()
            .unwrap_err()
            .is_invalid_operation());
    }

    #[test]
    fn test_parse_invocation_argument_type_mismatch() {
        let mut messages =
            parse(b"{\"type\":1,\"target\":\"Send\",\"arguments\":[\"hi\"]}\x1e").unwrap();

        let HubMessage::ClientInvocation(invocation) = &mut messages[0] else {
            panic!("expected a client invocation");
        };
        assert!(matches!(
            invocation.next_argument::<i32>(),
            Err(HubError::Serialization(_))
        ));
        // The message is still usable after a failed accessor call.
        assert_eq!(invocation.next_argument::<String>().unwrap(), "hi");
    }

    #[test]
    fn test_parse_stream_item() {
        let messages = parse(
            b"{\"type\":2,\"invocationId\":\"4\",\"item\":{\"sensor\":\"t1\",\"value\":21.5}}\x1e",
        )
        .unwrap();

        let HubMessage::StreamItem(item) = &messages[0] else {
            panic!("expected a stream item");
        };
        assert_eq!(item.invocation_id(), "4");
        assert_eq!(
            item.item::<Reading>().unwrap(),
            Reading {
                sensor: "t1".to_string(),
                value: 21.5
            }
        );
    }

    #[test]
    fn test_parse_completion_without_result() {
        let messages = parse(b"{\"type\":3,\"invocationId\":\"1\"}\x1e").unwrap();

        let HubMessage::Completion(completion) = &messages[0] else {
            panic!("expected a completion");
        };
        assert!(!completion.has_result());
        assert!(completion.error().is_none());
        assert_eq!(completion.result::<i32>().unwrap(), None);
    }

    #[test]
    fn test_parse_completion_with_result() {
        let messages = parse(b"{\"type\":3,\"invocationId\":\"1\",\"result\":42}\x1e").unwrap();

        let HubMessage::Completion(completion) = &messages[0] else {
            panic!("expected a completion");
        };
        assert!(completion.has_result());
        assert_eq!(completion.result::<i32>().unwrap(), Some(42));
    }

    #[test]
    fn test_parse_completion_with_null_result() {
        let messages = parse(b"{\"type\":3,\"invocationId\":\"1\",\"result\":null}\x1e").unwrap();

        let HubMessage::Completion(completion) = &messages[0] else {
            panic!("expected a completion");
        };
        assert!(completion.has_result());
        assert_eq!(completion.result::<Option<i32>>().unwrap(), Some(None));
    }

    #[test]
    fn test_parse_completion_with_error() {
        let messages =
            parse(b"{\"type\":3,\"invocationId\":\"1\",\"error\":\"Hub method failed\"}\x1e")
                .unwrap();

        let HubMessage::Completion(completion) = &messages[0] else {
            panic!("expected a completion");
        };
        assert_eq!(completion.error(), Some("Hub method failed"));
        assert!(!completion.has_result());
    }

    #[test]
    fn test_parse_close() {
        let messages =
            parse(b"{\"type\":7,\"error\":\"Server shutting down\",\"allowReconnect\":true}\x1e")
                .unwrap();

        let HubMessage::Close(close) = &messages[0] else {
            panic!("expected a close");
        };
        assert_eq!(close.error(), Some("Server shutting down"));
        assert!(close.allow_reconnect());

        let messages = parse(b"{\"type\":7}\x1e").unwrap();
        let HubMessage::Close(close) = &messages[0] else {
            panic!("expected a close");
        };
        assert!(close.error().is_none());
        assert!(!close.allow_reconnect());
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let messages =
            parse(b"{\"type\":3,\"invocationId\":\"1\",\"headers\":{\"a\":\"b\"}}\x1e").unwrap();
        assert_eq!(messages[0].kind(), MessageKind::Completion);
    }

    #[test]
    fn test_parse_multiple_frames_in_order() {
        let input: &'static [u8] = b"{\"type\":6}\x1e{\"type\":3,\"invocationId\":\"1\"}\x1e{\"type\":2,\"invocationId\":\"2\",\"item\":1}\x1e";
        let messages = parse(input).unwrap();

        let kinds: Vec<MessageKind> = messages.iter().map(HubMessage::kind).collect();
        assert_eq!(
            kinds,
            vec![MessageKind::Ping, MessageKind::Completion, MessageKind::StreamItem]
        );
        assert_eq!(
            &messages[1].raw_payload().unwrap()[..],
            b"{\"type\":3,\"invocationId\":\"1\"}"
        );
        assert_eq!(
            &messages[2].raw_payload().unwrap()[..],
            b"{\"type\":2,\"invocationId\":\"2\",\"item\":1}"
        );
    }

    #[test]
    fn test_parse_drops_incomplete_tail() {
        let messages = parse(b"{\"type\":6}\x1e{\"type\":3,\"invoca").unwrap();

        assert_eq!(messages.len(), 1);
        assert!(matches!(messages[0], HubMessage::Ping));
    }

    #[test]
    #[traced_test]
    fn test_parse_warns_on_incomplete_tail() {
        parse(b"{\"type\":6}\x1e{\"type\":3,\"invoca").unwrap();

        assert!(logs_contain("Dropping incomplete trailing frame (17 bytes)"));
    }

    #[test]
    #[traced_test]
    fn test_parse_terminated_input_does_not_warn() {
        parse(b"{\"type\":6}\x1e{\"type\":6}\x1e").unwrap();

        assert!(!logs_contain("Dropping incomplete trailing frame"));
    }

    #[test]
    fn test_parse_partial_only_is_empty() {
        assert!(parse(b"{\"type\":3,\"invoca").unwrap().is_empty());
        assert!(parse(b"").unwrap().is_empty());
    }

    #[test]
    fn test_parse_resubmitted_tail() {
        let first = b"{\"type\":3,\"invocationId\":\"9\",\"res";
        assert!(parse(first).unwrap().is_empty());

        let mut combined = first.to_vec();
        combined.extend_from_slice(b"ult\":\"done\"}\x1e");
        let messages = JsonHubProtocol::new()
            .parse_messages(Bytes::from(combined))
            .unwrap();

        let HubMessage::Completion(completion) = &messages[0] else {
            panic!("expected a completion");
        };
        assert_eq!(completion.result::<String>().unwrap().as_deref(), Some("done"));
    }

    #[test]
    fn test_parse_unknown_type() {
        let err = parse(b"{\"type\":99}\x1e").unwrap_err();
        assert!(matches!(
            err,
            HubError::ProtocolViolation(FrameError::UnexpectedKind(99))
        ));
    }

    #[test]
    fn test_parse_send_only_kinds_rejected() {
        let err = parse(b"{\"type\":4,\"invocationId\":\"1\",\"target\":\"Count\",\"arguments\":[]}\x1e")
            .unwrap_err();
        assert!(matches!(
            err,
            HubError::ProtocolViolation(FrameError::UnexpectedKind(4))
        ));

        let err = parse(b"{\"type\":5,\"invocationId\":\"1\"}\x1e").unwrap_err();
        assert!(matches!(
            err,
            HubError::ProtocolViolation(FrameError::UnexpectedKind(5))
        ));
    }

    #[test]
    fn test_parse_missing_type() {
        let err = parse(b"{\"target\":\"Send\"}\x1e").unwrap_err();
        assert!(matches!(
            err,
            HubError::ProtocolViolation(FrameError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_non_integer_type() {
        let err = parse(b"{\"type\":\"ping\"}\x1e").unwrap_err();
        assert!(err.is_protocol_violation());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse(b"not json\x1e").unwrap_err().is_protocol_violation());
        assert!(parse(b"\xff\xfe\x1e").unwrap_err().is_protocol_violation());
    }

    #[test]
    fn test_parse_wrong_shape_for_kind() {
        // Completion requires invocationId.
        let err = parse(b"{\"type\":3,\"result\":1}\x1e").unwrap_err();
        assert!(matches!(
            err,
            HubError::ProtocolViolation(FrameError::Malformed(_))
        ));

        // Stream item requires the item field.
        let err = parse(b"{\"type\":2,\"invocationId\":\"1\"}\x1e").unwrap_err();
        assert!(err.is_protocol_violation());

        // Invocation requires a string target.
        let err = parse(b"{\"type\":1,\"target\":5}\x1e").unwrap_err();
        assert!(err.is_protocol_violation());
    }

    #[test]
    fn test_parse_fails_whole_batch() {
        let result = parse(b"{\"type\":6}\x1e{\"type\":42}\x1e{\"type\":6}\x1e");
        assert!(result.unwrap_err().is_protocol_violation());
    }

    #[test]
    fn test_write_server_invocation() {
        let bytes = write(
            ServerInvocation::new("Send", vec![Argument::new("hi"), Argument::new(42)])
                .with_invocation_id("1"),
        )
        .unwrap();

        assert_eq!(
            &bytes[..],
            b"{\"type\":1,\"invocationId\":\"1\",\"target\":\"Send\",\"arguments\":[\"hi\",42]}\x1e"
        );
    }

    #[test]
    fn test_write_non_blocking_invocation_omits_id() {
        let bytes = write(ServerInvocation::new("Log", Vec::new())).unwrap();
        assert_eq!(
            &bytes[..],
            b"{\"type\":1,\"target\":\"Log\",\"arguments\":[]}\x1e"
        );
    }

    #[test]
    fn test_write_heterogeneous_arguments_in_order() {
        let reading = Reading {
            sensor: "t1".to_string(),
            value: 0.5,
        };
        let bytes = write(ServerInvocation::new(
            "Report",
            vec![
                Argument::new(reading),
                Argument::new(Option::<i32>::None),
                Argument::new(vec![true, false]),
                Argument::new('x'),
            ],
        ))
        .unwrap();

        let json = written_json(&bytes);
        assert_eq!(
            json["arguments"],
            serde_json::json!([{"sensor": "t1", "value": 0.5}, null, [true, false], "x"])
        );
    }

    #[test]
    fn test_write_stream_invocation() {
        let bytes = write(
            StreamInvocation::new("3", "Counter", vec![Argument::new(10)])
                .with_stream_ids(vec!["upload".to_string()]),
        )
        .unwrap();

        assert_eq!(
            written_json(&bytes),
            serde_json::json!({
                "type": 4,
                "invocationId": "3",
                "target": "Counter",
                "arguments": [10],
                "streamIds": ["upload"]
            })
        );
    }

    #[test]
    fn test_write_stream_item() {
        let bytes = write(StreamItem::new("upload", "chunk")).unwrap();
        assert_eq!(
            &bytes[..],
            b"{\"type\":2,\"invocationId\":\"upload\",\"item\":\"chunk\"}\x1e"
        );
    }

    #[test]
    fn test_write_completions() {
        let bytes = write(Completion::void("1")).unwrap();
        assert_eq!(&bytes[..], b"{\"type\":3,\"invocationId\":\"1\"}\x1e");

        let bytes = write(Completion::with_result("2", Option::<i32>::None)).unwrap();
        assert_eq!(
            &bytes[..],
            b"{\"type\":3,\"invocationId\":\"2\",\"result\":null}\x1e"
        );

        let bytes = write(Completion::with_error("3", "nope")).unwrap();
        assert_eq!(
            &bytes[..],
            b"{\"type\":3,\"invocationId\":\"3\",\"error\":\"nope\"}\x1e"
        );
    }

    #[test]
    fn test_write_cancel_invocation() {
        let bytes = write(CancelInvocation::new("8")).unwrap();
        assert_eq!(&bytes[..], b"{\"type\":5,\"invocationId\":\"8\"}\x1e");
    }

    #[test]
    fn test_write_rejects_receive_only_kinds() {
        let protocol = JsonHubProtocol::new();

        assert!(protocol
            .write_message(&HubMessage::PING)
            .unwrap_err()
            .is_invalid_operation());
        assert!(protocol
            .write_message(&Close::new(Some("bye".to_string())).into())
            .unwrap_err()
            .is_invalid_operation());

        let mut received = parse(b"{\"type\":1,\"target\":\"Send\",\"arguments\":[]}\x1e").unwrap();
        let invocation = received.remove(0);
        assert!(protocol
            .write_message(&invocation)
            .unwrap_err()
            .is_invalid_operation());
    }

    #[test]
    fn test_write_unserializable_argument() {
        use std::collections::HashMap;

        // JSON object keys must be strings.
        let mut map = HashMap::new();
        map.insert(vec![1u8], 1);

        let err = write(ServerInvocation::new("Send", vec![Argument::new(map)])).unwrap_err();
        assert!(matches!(err, HubError::Serialization(_)));
    }

    #[test]
    fn test_received_item_is_written_verbatim() {
        let mut messages =
            parse(b"{\"type\":2,\"invocationId\":\"1\",\"item\":{\"b\":1,\"a\":2.50}}\x1e").unwrap();
        let echoed = write(messages.remove(0)).unwrap();

        assert_eq!(
            &echoed[..],
            b"{\"type\":2,\"invocationId\":\"1\",\"item\":{\"b\":1,\"a\":2.50}}\x1e"
        );
    }

    #[test]
    fn test_server_invocation_round_trip() {
        let protocol = JsonHubProtocol::new();
        let bytes = protocol
            .write_message(
                &ServerInvocation::new(
                    "Send",
                    vec![Argument::new("hi"), Argument::new(42), Argument::new(1.25)],
                )
                .with_invocation_id("17")
                .into(),
            )
            .unwrap();

        let mut messages = protocol.parse_messages(bytes.clone()).unwrap();
        let HubMessage::ClientInvocation(invocation) = &mut messages[0] else {
            panic!("expected a client invocation");
        };

        assert_eq!(invocation.invocation_id(), Some("17"));
        assert_eq!(invocation.target(), "Send");
        assert_eq!(invocation.next_argument::<String>().unwrap(), "hi");
        assert_eq!(invocation.next_argument::<i32>().unwrap(), 42);
        assert_eq!(invocation.next_argument::<f64>().unwrap(), 1.25);
        assert!(!invocation.has_more_arguments());
        assert_eq!(&invocation.raw_payload()[..], &bytes[..bytes.len() - 1]);
    }

    #[test]
    fn test_stream_item_round_trip() {
        let protocol = JsonHubProtocol::new();
        let reading = Reading {
            sensor: "t2".to_string(),
            value: -3.0,
        };
        let bytes = protocol
            .write_message(&StreamItem::new("5", reading).into())
            .unwrap();

        let messages = protocol.parse_messages(bytes).unwrap();
        let HubMessage::StreamItem(item) = &messages[0] else {
            panic!("expected a stream item");
        };
        assert_eq!(item.invocation_id(), "5");
        assert_eq!(
            item.item::<Reading>().unwrap(),
            Reading {
                sensor: "t2".to_string(),
                value: -3.0
            }
        );
    }

    #[test]
    fn test_completion_round_trip() {
        let protocol = JsonHubProtocol::new();

        let bytes = protocol
            .write_message(&Completion::with_result("1", vec!["a", "b"]).into())
            .unwrap();
        let messages = protocol.parse_messages(bytes).unwrap();
        let HubMessage::Completion(completion) = &messages[0] else {
            panic!("expected a completion");
        };
        assert_eq!(completion.invocation_id(), "1");
        assert!(completion.has_result());
        assert_eq!(
            completion.result::<Vec<String>>().unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );

        let bytes = protocol
            .write_message(&Completion::with_error("2", "failed").into())
            .unwrap();
        let messages = protocol.parse_messages(bytes).unwrap();
        let HubMessage::Completion(completion) = &messages[0] else {
            panic!("expected a completion");
        };
        assert_eq!(completion.error(), Some("failed"));
        assert!(!completion.has_result());
        assert_eq!(completion.result::<String>().unwrap(), None);
    }

    #[test]
    fn test_send_only_kinds_round_trip_structurally() {
        // The decoder refuses these kinds, so compare the written shape.
        let bytes = write(StreamInvocation::new("3", "Counter", vec![Argument::new(10)])).unwrap();
        let json = written_json(&bytes);
        assert_eq!(json["type"], 4);
        assert_eq!(json["invocationId"], "3");
        assert_eq!(json["target"], "Counter");
        assert_eq!(json["arguments"], serde_json::json!([10]));
        assert!(json.get("streamIds").is_none());

        let bytes = write(CancelInvocation::new("3")).unwrap();
        let json = written_json(&bytes);
        assert_eq!(json, serde_json::json!({"type": 5, "invocationId": "3"}));
    }
}
