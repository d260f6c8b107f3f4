//! Record-separator message framing for JSON hub protocols.
//!
//! Every message on the wire is a UTF-8 text payload terminated by a single
//! record separator byte (`0x1E`, U+001E). JSON escapes every control
//! character inside strings, so the separator can only ever appear as a
//! terminator.
//!
//! Bytes after the last separator belong to a frame that has not finished
//! arriving. [`split_frames`] ignores them; [`FrameDecoder`], [`FrameReader`]
//! and (behind the `async` feature) `RecordSeparatorCodec` keep them buffered
//! for the next read.

#[cfg(feature = "async")]
pub mod async_codec;
pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::RecordSeparatorCodec;
pub use codec::{
    decode_frame, encode_frame, split_frames, split_frames_bytes, FrameConfig, FrameDecoder,
    DEFAULT_MAX_PAYLOAD, RECORD_SEPARATOR, RECORD_SEPARATOR_CHAR,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
