//! Hub message model.
//!
//! Messages are immutable value objects: built once by the decoder from a
//! wire frame, or by the caller before encoding, and never mutated.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::convert::to_wire_value;
use crate::error::{ProtocolError, Result};

/// Integer discriminant carried in the `type` field of every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Invocation = 1,
    StreamItem = 2,
    Completion = 3,
}

impl MessageType {
    /// Wire value of the discriminant.
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageType::Invocation => "invocation",
            MessageType::StreamItem => "stream item",
            MessageType::Completion => "completion",
        }
    }
}

impl TryFrom<i64> for MessageType {
    type Error = ProtocolError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            1 => Ok(MessageType::Invocation),
            2 => Ok(MessageType::StreamItem),
            3 => Ok(MessageType::Completion),
            other => Err(ProtocolError::UnknownMessageType(Some(other))),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A request to execute a named hub method.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationMessage {
    invocation_id: String,
    target: String,
    arguments: Vec<Value>,
    non_blocking: bool,
}

impl InvocationMessage {
    pub fn new(
        invocation_id: impl Into<String>,
        target: impl Into<String>,
        arguments: Vec<Value>,
    ) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            target: target.into(),
            arguments,
            non_blocking: false,
        }
    }

    /// Mark the invocation as fire-and-forget: no completion will be sent.
    pub fn with_non_blocking(mut self, non_blocking: bool) -> Self {
        self.non_blocking = non_blocking;
        self
    }

    /// Append an application value as the next argument.
    ///
    /// Fails with [`ProtocolError::UnsupportedType`] if the value has no JSON
    /// representation.
    pub fn with_argument<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.arguments.push(to_wire_value(value)?);
        Ok(self)
    }

    pub fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn non_blocking(&self) -> bool {
        self.non_blocking
    }
}

/// One intermediate item of a streamed invocation result.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamItemMessage {
    invocation_id: String,
    item: Option<Value>,
}

impl StreamItemMessage {
    pub fn new(invocation_id: impl Into<String>, item: Option<Value>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            item,
        }
    }

    pub fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    /// The streamed value; `None` when the frame carried no item or a null.
    pub fn item(&self) -> Option<&Value> {
        self.item.as_ref()
    }
}

/// How an invocation finished.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    /// Success without a result payload.
    Void,
    /// Success with a result. `None` is a result the server sent as null.
    Result(Option<Value>),
    /// Failure with a server-provided message.
    Error(String),
}

/// Terminal response to an invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionMessage {
    invocation_id: String,
    outcome: CompletionOutcome,
}

impl CompletionMessage {
    pub fn void(invocation_id: impl Into<String>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            outcome: CompletionOutcome::Void,
        }
    }

    pub fn with_result(invocation_id: impl Into<String>, result: Option<Value>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            outcome: CompletionOutcome::Result(result),
        }
    }

    pub fn with_error(invocation_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            outcome: CompletionOutcome::Error(error.into()),
        }
    }

    pub fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    pub fn outcome(&self) -> &CompletionOutcome {
        &self.outcome
    }

    pub fn has_result(&self) -> bool {
        matches!(self.outcome, CompletionOutcome::Result(_))
    }

    /// The result value, if the invocation succeeded with a non-null result.
    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            CompletionOutcome::Result(result) => result.as_ref(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            CompletionOutcome::Error(error) => Some(error),
            _ => None,
        }
    }
}

/// Every message the codec knows about.
#[derive(Debug, Clone, PartialEq)]
pub enum HubMessage {
    Invocation(InvocationMessage),
    StreamItem(StreamItemMessage),
    Completion(CompletionMessage),
}

impl HubMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            HubMessage::Invocation(_) => MessageType::Invocation,
            HubMessage::StreamItem(_) => MessageType::StreamItem,
            HubMessage::Completion(_) => MessageType::Completion,
        }
    }

    pub fn invocation_id(&self) -> &str {
        match self {
            HubMessage::Invocation(msg) => msg.invocation_id(),
            HubMessage::StreamItem(msg) => msg.invocation_id(),
            HubMessage::Completion(msg) => msg.invocation_id(),
        }
    }
}

impl From<InvocationMessage> for HubMessage {
    fn from(msg: InvocationMessage) -> Self {
        HubMessage::Invocation(msg)
    }
}

impl From<StreamItemMessage> for HubMessage {
    fn from(msg: StreamItemMessage) -> Self {
        HubMessage::StreamItem(msg)
    }
}

impl From<CompletionMessage> for HubMessage {
    fn from(msg: CompletionMessage) -> Self {
        HubMessage::Completion(msg)
    }
}
