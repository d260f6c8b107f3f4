use hubwire_frame::DEFAULT_MAX_PAYLOAD;

use crate::convert::DEFAULT_MAX_VALUE_DEPTH;

/// Controls decoding limits and the default value converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Maximum size of a single frame payload in bytes.
    pub max_payload_size: usize,
    /// Maximum nesting depth of an outgoing argument.
    pub max_value_depth: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            max_value_depth: DEFAULT_MAX_VALUE_DEPTH,
        }
    }
}
