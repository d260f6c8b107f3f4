use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use hubwire_frame::FrameDecoder;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ProtocolConfig;
use crate::convert::{from_wire_value, JsonTypeConverter, TypeConverter};
use crate::decode::{parse_buffered, parse_messages};
use crate::encode::write_message;
use crate::error::Result;
use crate::message::HubMessage;

/// Protocol name announced during connection negotiation.
pub const JSON_PROTOCOL_NAME: &str = "json";

/// Whether a protocol's frames are text or binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferFormat {
    Text,
    Binary,
}

/// A hub protocol as seen by the owning transport.
pub trait HubProtocol: Send + Sync {
    /// Name used to select this protocol during negotiation.
    fn name(&self) -> &'static str;

    /// Framing the transport must use for this protocol.
    fn transfer_format(&self) -> TransferFormat;

    /// Decode every complete frame in `input`.
    fn parse_messages(&self, input: &[u8]) -> Result<Vec<HubMessage>>;

    /// Encode a message into framed bytes.
    fn write_message(&self, message: &HubMessage) -> Result<Bytes>;
}

/// JSON text protocol with record-separator framing.
#[derive(Debug, Clone)]
pub struct JsonHubProtocol {
    converter: Arc<dyn TypeConverter>,
    config: ProtocolConfig,
}

impl JsonHubProtocol {
    /// Create a protocol with default config and [`JsonTypeConverter`].
    pub fn new() -> Self {
        Self::with_config(ProtocolConfig::default())
    }

    /// Create a protocol with explicit config.
    pub fn with_config(config: ProtocolConfig) -> Self {
        Self {
            converter: Arc::new(JsonTypeConverter::with_max_depth(config.max_value_depth)),
            config,
        }
    }

    /// Replace the value converter consulted for outgoing arguments.
    pub fn with_converter(mut self, converter: Arc<dyn TypeConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// A frame decoder honouring this protocol's payload limit, for use with
    /// [`JsonHubProtocol::parse_buffered`].
    pub fn frame_decoder(&self) -> FrameDecoder {
        FrameDecoder::new(self.config.max_payload_size)
    }

    /// Decode every complete frame in `src`, keeping an unterminated frame
    /// buffered for the next call.
    pub fn parse_buffered(
        &self,
        decoder: &mut FrameDecoder,
        src: &mut BytesMut,
    ) -> Result<Vec<HubMessage>> {
        parse_buffered(decoder, src)
    }

    /// Cast a decoded value (an argument, stream item or result) to `T`
    /// through the configured converter.
    pub fn convert_from_wire<T: DeserializeOwned>(
        &self,
        value: Option<&Value>,
    ) -> Result<Option<T>> {
        match value {
            Some(value) => {
                let converted = self.converter.convert_from_wire(value)?;
                from_wire_value(converted.as_ref())
            }
            None => Ok(None),
        }
    }

    pub fn converter(&self) -> &Arc<dyn TypeConverter> {
        &self.converter
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }
}

impl Default for JsonHubProtocol {
    fn default() -> Self {
        Self::new()
    }
}

impl HubProtocol for JsonHubProtocol {
    fn name(&self) -> &'static str {
        JSON_PROTOCOL_NAME
    }

    fn transfer_format(&self) -> TransferFormat {
        TransferFormat::Text
    }

    fn parse_messages(&self, input: &[u8]) -> Result<Vec<HubMessage>> {
        parse_messages(input, self.config.max_payload_size)
    }

    fn write_message(&self, message: &HubMessage) -> Result<Bytes> {
        let mut dst = BytesMut::new();
        write_message(message, self.converter.as_ref(), &mut dst)?;
        Ok(dst.freeze())
    }
}
