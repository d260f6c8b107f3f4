use bytes::BytesMut;
use hubwire_frame::{split_frames_bytes, FrameDecoder, FrameError};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{ProtocolError, Result};
use crate::message::{
    CompletionMessage, HubMessage, InvocationMessage, MessageType, StreamItemMessage,
};

/// Decode every complete frame in `input`, in order.
///
/// An unterminated trailing frame is ignored. The first frame that fails to
/// decode aborts the call and nothing is returned.
pub fn parse_messages(input: &[u8], max_payload: usize) -> Result<Vec<HubMessage>> {
    let payloads = split_frames_bytes(input)?;
    debug!(frames = payloads.len(), "decoding frames");

    payloads
        .into_iter()
        .map(|payload| {
            check_payload_size(payload.len(), max_payload)?;
            parse_message(payload)
        })
        .collect()
}

/// Decode every complete frame buffered in `src`, leaving an unterminated
/// frame in place for the next read. `decoder` must stay paired with `src`
/// across calls.
///
/// On error the frames consumed before the failing one are dropped along
/// with it; the stream should be considered broken.
pub fn parse_buffered(
    decoder: &mut FrameDecoder,
    src: &mut BytesMut,
) -> Result<Vec<HubMessage>> {
    let mut messages = Vec::new();
    while let Some(payload) = decoder.decode(src)? {
        // The frame decoder has already validated UTF-8.
        let text = std::str::from_utf8(&payload).map_err(FrameError::from)?;
        messages.push(parse_message(text)?);
    }
    debug!(
        messages = messages.len(),
        pending = src.len(),
        "decoded buffered frames"
    );
    Ok(messages)
}

/// Decode a single frame payload (without its terminator).
pub fn parse_message(payload: &str) -> Result<HubMessage> {
    let document: Value = serde_json::from_str(payload).map_err(ProtocolError::Decoding)?;

    let Value::Object(mut fields) = document else {
        return Err(ProtocolError::UnknownMessageType(None));
    };

    let message_type = match fields.get("type").and_then(Value::as_i64) {
        Some(raw) => MessageType::try_from(raw)?,
        None => return Err(ProtocolError::UnknownMessageType(None)),
    };

    let message: HubMessage = match message_type {
        MessageType::Invocation => parse_invocation(&mut fields)?.into(),
        MessageType::StreamItem => parse_stream_item(&mut fields)?.into(),
        MessageType::Completion => parse_completion(&mut fields)?.into(),
    };

    trace!(
        message_type = %message_type,
        invocation_id = message.invocation_id(),
        "decoded message"
    );
    Ok(message)
}

fn parse_invocation(fields: &mut Map<String, Value>) -> Result<InvocationMessage> {
    let invocation_id = take_invocation_id(fields, MessageType::Invocation)?;
    if invocation_id.is_empty() {
        return Err(ProtocolError::InvalidMessage {
            message_type: MessageType::Invocation,
            field: "invocationId",
        });
    }
    let target = take_string(fields, MessageType::Invocation, "target")?;

    // Arguments are passed through untyped; resolving them against the
    // target method's signature is the dispatcher's job.
    let arguments = match fields.remove("arguments") {
        Some(Value::Array(arguments)) => arguments,
        _ => Vec::new(),
    };
    let non_blocking = fields
        .get("nonBlocking")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Ok(InvocationMessage::new(invocation_id, target, arguments).with_non_blocking(non_blocking))
}

fn parse_stream_item(fields: &mut Map<String, Value>) -> Result<StreamItemMessage> {
    let invocation_id = take_invocation_id(fields, MessageType::StreamItem)?;
    let item = fields.remove("item").and_then(non_null);

    Ok(StreamItemMessage::new(invocation_id, item))
}

fn parse_completion(fields: &mut Map<String, Value>) -> Result<CompletionMessage> {
    let invocation_id = take_invocation_id(fields, MessageType::Completion)?;

    // error wins over result when a peer sends both
    if let Some(Value::String(error)) = fields.remove("error") {
        return Ok(CompletionMessage::with_error(invocation_id, error));
    }

    match fields.remove("result") {
        Some(result) => Ok(CompletionMessage::with_result(
            invocation_id,
            non_null(result),
        )),
        None => Ok(CompletionMessage::void(invocation_id)),
    }
}

fn take_invocation_id(
    fields: &mut Map<String, Value>,
    message_type: MessageType,
) -> Result<String> {
    take_string(fields, message_type, "invocationId")
}

fn take_string(
    fields: &mut Map<String, Value>,
    message_type: MessageType,
    field: &'static str,
) -> Result<String> {
    match fields.remove(field) {
        Some(Value::String(value)) => Ok(value),
        _ => Err(ProtocolError::InvalidMessage {
            message_type,
            field,
        }),
    }
}

fn non_null(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        value => Some(value),
    }
}

fn check_payload_size(size: usize, max: usize) -> Result<()> {
    if size > max {
        return Err(FrameError::PayloadTooLarge { size, max }.into());
    }
    Ok(())
}
