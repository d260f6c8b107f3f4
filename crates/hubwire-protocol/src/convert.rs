//! Wire value admissibility and conversion.
//!
//! Wire values are [`serde_json::Value`] trees. A parsed tree is always made
//! of JSON types, so admissibility of a `Value` reduces to a nesting limit:
//! peers parse with a bounded recursion depth and reject anything deeper.
//! Application values enter through [`to_wire_value`] and leave through
//! [`from_wire_value`].

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ProtocolError, Result};

/// Containers a peer's JSON parser will nest before giving up. `serde_json`
/// fails on the 128th.
const PARSER_NESTING_LIMIT: usize = 127;

/// Containers wrapped around every argument on the wire: the message object
/// and its `arguments` array.
const ENVELOPE_DEPTH: usize = 2;

/// Default maximum nesting depth of an argument.
///
/// An argument within this limit still parses once placed inside the
/// invocation envelope, so whatever the encoder accepts the decoder reads
/// back.
pub const DEFAULT_MAX_VALUE_DEPTH: usize = PARSER_NESTING_LIMIT - ENVELOPE_DEPTH;

/// Converts values on their way to and from the wire.
///
/// The codec only calls [`TypeConverter::convert_to_wire`], once per
/// invocation argument. Implementations must be side-effect free; a single
/// converter is shared by every thread using the protocol.
pub trait TypeConverter: Send + Sync + fmt::Debug {
    /// Return the value to place on the wire, or
    /// [`ProtocolError::UnsupportedType`] if it may not be sent.
    fn convert_to_wire(&self, value: &Value) -> Result<Value>;

    /// Shallow conversion of a decoded value. JSON null maps to `None`.
    fn convert_from_wire(&self, value: &Value) -> Result<Option<Value>> {
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(value.clone()))
    }
}

/// Default converter: admits any JSON value within the nesting limit.
#[derive(Debug, Clone)]
pub struct JsonTypeConverter {
    max_depth: usize,
}

impl JsonTypeConverter {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_VALUE_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for JsonTypeConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeConverter for JsonTypeConverter {
    fn convert_to_wire(&self, value: &Value) -> Result<Value> {
        if is_admissible(value, self.max_depth) {
            return Ok(value.clone());
        }

        Err(ProtocolError::UnsupportedType(format!(
            "{} nested deeper than {} levels",
            kind_name(value),
            self.max_depth
        )))
    }
}

/// Whether `value` may be placed on the wire.
///
/// Scalars (null, bool, number, string) are always admissible. Arrays and
/// objects are admissible when every element is, and the container nesting
/// does not exceed `max_depth`.
pub fn is_admissible(value: &Value, max_depth: usize) -> bool {
    depth_within(value, max_depth)
}

fn depth_within(value: &Value, remaining: usize) -> bool {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => true,
        Value::Array(items) => {
            remaining > 0 && items.iter().all(|item| depth_within(item, remaining - 1))
        }
        Value::Object(map) => {
            remaining > 0 && map.values().all(|item| depth_within(item, remaining - 1))
        }
    }
}

/// Convert an application value into a wire value.
///
/// Fails with [`ProtocolError::UnsupportedType`] when the value has no JSON
/// document form, e.g. a map keyed by tuples or a `Serialize` impl that
/// reports an error.
pub fn to_wire_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|err| ProtocolError::UnsupportedType(err.to_string()))
}

/// Cast a decoded wire value to an application type.
///
/// Absent values and JSON null yield `Ok(None)`. Otherwise the value must
/// already have the shape `T` expects: no coercion is attempted, so a string
/// never becomes a number.
pub fn from_wire_value<T: DeserializeOwned>(value: Option<&Value>) -> Result<Option<T>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(|err| ProtocolError::UnsupportedType(err.to_string())),
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
