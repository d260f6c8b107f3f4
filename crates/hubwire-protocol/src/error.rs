use hubwire_frame::FrameError;

use crate::message::MessageType;

/// Errors that can occur while decoding or encoding hub messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A value cannot be represented on the wire, or cannot be cast to the
    /// requested type.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// The `type` discriminant is missing, not an integer, or unknown.
    #[error("unknown message type{}", .0.map(|t| format!(" {t}")).unwrap_or_default())]
    UnknownMessageType(Option<i64>),

    /// A required field is missing or has the wrong JSON type.
    #[error("invalid {message_type} message: missing or malformed field `{field}`")]
    InvalidMessage {
        message_type: MessageType,
        field: &'static str,
    },

    /// The operation is not supported for this message.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A frame payload is not a valid JSON document.
    #[error("malformed message payload: {0}")]
    Decoding(#[source] serde_json::Error),

    /// The JSON serializer failed.
    #[error("failed to serialize message: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Frame-level error (invalid UTF-8, oversized payload).
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
