//! JSON hub protocol codec with record-separator framing.
//!
//! hubwire turns the byte stream of a real-time hub connection into typed
//! invocation, stream item and completion messages, and encodes outgoing
//! invocations back into frames. Transport, reconnects and dispatch to
//! application handlers live elsewhere.
//!
//! # Crate Structure
//!
//! - [`frame`] — Record-separator framing, blocking reader/writer, optional tokio-util codec
//! - [`protocol`] — Message model, decoder, encoder and value conversion

/// Re-export frame types.
pub mod frame {
    pub use hubwire_frame::*;
}

/// Re-export protocol types.
pub mod protocol {
    pub use hubwire_protocol::*;
}
