//! JSON hub protocol: invocation, stream item and completion messages.
//!
//! Decoding turns a buffer of record-separated JSON frames into
//! [`HubMessage`] values; encoding turns an [`InvocationMessage`] back into a
//! framed payload. Argument values pass through a [`TypeConverter`] on the
//! way out, which embedders may replace.
//!
//! ```
//! use hubwire_protocol::{HubMessage, HubProtocol, InvocationMessage, JsonHubProtocol};
//!
//! let protocol = JsonHubProtocol::new();
//! let msg = InvocationMessage::new("1", "send", Vec::new()).with_argument("hello")?;
//! let wire = protocol.write_message(&msg.clone().into())?;
//!
//! assert_eq!(protocol.parse_messages(&wire)?, vec![HubMessage::Invocation(msg)]);
//! # Ok::<(), hubwire_protocol::ProtocolError>(())
//! ```

pub mod config;
pub mod convert;
pub mod decode;
pub mod encode;
pub mod error;
pub mod message;
pub mod protocol;

pub use config::ProtocolConfig;
pub use convert::{
    from_wire_value, is_admissible, to_wire_value, JsonTypeConverter, TypeConverter,
    DEFAULT_MAX_VALUE_DEPTH,
};
pub use decode::parse_message;
pub use error::{ProtocolError, Result};
pub use message::{
    CompletionMessage, CompletionOutcome, HubMessage, InvocationMessage, MessageType,
    StreamItemMessage,
};
pub use protocol::{HubProtocol, JsonHubProtocol, TransferFormat, JSON_PROTOCOL_NAME};
pub use serde_json::Value;
