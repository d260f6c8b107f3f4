use bytes::BytesMut;
use hubwire_frame::encode_frame;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::convert::TypeConverter;
use crate::error::{ProtocolError, Result};
use crate::message::{HubMessage, InvocationMessage, MessageType};

/// Wire shape of an outgoing invocation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InvocationFrame<'a> {
    #[serde(rename = "type")]
    message_type: i64,
    invocation_id: &'a str,
    target: &'a str,
    arguments: Vec<Value>,
    non_blocking: bool,
}

/// Encode `message` and append the framed bytes to `dst`.
///
/// Only invocations can be encoded. Each argument goes through `converter`;
/// the first one it rejects aborts the call and leaves `dst` untouched.
pub fn write_message(
    message: &HubMessage,
    converter: &dyn TypeConverter,
    dst: &mut BytesMut,
) -> Result<()> {
    match message {
        HubMessage::Invocation(invocation) => write_invocation(invocation, converter, dst),
        HubMessage::StreamItem(_) | HubMessage::Completion(_) => {
            Err(ProtocolError::InvalidOperation(format!(
                "cannot encode {} messages",
                message.message_type()
            )))
        }
    }
}

fn write_invocation(
    invocation: &InvocationMessage,
    converter: &dyn TypeConverter,
    dst: &mut BytesMut,
) -> Result<()> {
    if invocation.invocation_id().is_empty() {
        return Err(ProtocolError::InvalidMessage {
            message_type: MessageType::Invocation,
            field: "invocationId",
        });
    }

    let arguments = invocation
        .arguments()
        .iter()
        .map(|argument| converter.convert_to_wire(argument))
        .collect::<Result<Vec<_>>>()?;

    let frame = InvocationFrame {
        message_type: MessageType::Invocation.as_i64(),
        invocation_id: invocation.invocation_id(),
        target: invocation.target(),
        arguments,
        non_blocking: invocation.non_blocking(),
    };
    let payload = serde_json::to_vec(&frame).map_err(ProtocolError::Serialization)?;
    encode_frame(&payload, dst)?;

    trace!(
        invocation_id = invocation.invocation_id(),
        target = invocation.target(),
        size = payload.len(),
        "encoded invocation"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use hubwire_frame::RECORD_SEPARATOR;
    use serde_json::json;

    use super::*;
    use crate::convert::JsonTypeConverter;
    use crate::message::{CompletionMessage, StreamItemMessage};

    fn encode(message: &HubMessage) -> Result<BytesMut> {
        let mut dst = BytesMut::new();
        write_message(message, &JsonTypeConverter::new(), &mut dst)?;
        Ok(dst)
    }

    #[test]
    fn invocation_wire_shape() {
        let msg = InvocationMessage::new("7", "broadcast", vec![json!("hi"), json!([1, 2])]);
        let bytes = encode(&msg.into()).unwrap();

        assert_eq!(bytes[bytes.len() - 1], RECORD_SEPARATOR);
        let document: Value = serde_json::from_slice(&bytes[..bytes.len() - 1]).unwrap();
        assert_eq!(
            document,
            json!({
                "type": 1,
                "invocationId": "7",
                "target": "broadcast",
                "arguments": ["hi", [1, 2]],
                "nonBlocking": false
            })
        );
    }

    #[test]
    fn empty_arguments_encode_as_empty_array() {
        let msg = InvocationMessage::new("1", "ping", Vec::new()).with_non_blocking(true);
        let bytes = encode(&msg.into()).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();

        assert!(text.contains("\"arguments\":[]"));
        assert!(text.contains("\"nonBlocking\":true"));
    }

    #[test]
    fn control_characters_never_produce_a_raw_separator() {
        let msg = InvocationMessage::new("1", "echo", vec![json!("a\u{1e}b")]);
        let bytes = encode(&msg.into()).unwrap();

        let separators = bytes.iter().filter(|b| **b == RECORD_SEPARATOR).count();
        assert_eq!(separators, 1);
    }

    #[test]
    fn stream_item_and_completion_are_not_encodable() {
        let item: HubMessage = StreamItemMessage::new("1", None).into();
        let completion: HubMessage = CompletionMessage::void("1").into();

        assert!(matches!(
            encode(&item),
            Err(ProtocolError::InvalidOperation(_))
        ));
        assert!(matches!(
            encode(&completion),
            Err(ProtocolError::InvalidOperation(_))
        ));
    }

    #[test]
    fn inadmissible_argument_aborts_encoding() {
        let deep = json!([[[[1]]]]);
        let msg = InvocationMessage::new("1", "t", vec![json!(1), deep]);

        let mut dst = BytesMut::new();
        let err = write_message(&msg.into(), &JsonTypeConverter::with_max_depth(2), &mut dst)
            .unwrap_err();

        assert!(matches!(err, ProtocolError::UnsupportedType(_)));
        assert!(dst.is_empty());
    }

    #[test]
    fn empty_invocation_id_is_not_encodable() {
        let msg = InvocationMessage::new("", "t", Vec::new());
        let mut dst = BytesMut::new();
        let err = write_message(&msg.into(), &JsonTypeConverter::new(), &mut dst).unwrap_err();

        assert!(matches!(
            err,
            ProtocolError::InvalidMessage {
                message_type: MessageType::Invocation,
                field: "invocationId"
            }
        ));
        assert!(dst.is_empty());
    }
}
