use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::error::{FrameError, Result};

/// Frame terminator: ASCII record separator (0x1E).
pub const RECORD_SEPARATOR: u8 = 0x1E;

/// [`RECORD_SEPARATOR`] as a `char`, for splitting decoded text.
pub const RECORD_SEPARATOR_CHAR: char = '\u{1e}';

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Split decoded text into complete frame payloads.
///
/// Only the region up to the last separator is considered. Anything after it
/// is an unterminated frame and is not returned. Empty fields (two adjacent
/// separators, or a leading separator) are skipped. Text without any
/// separator yields an empty vector.
pub fn split_frames(text: &str) -> Vec<&str> {
    let Some(end) = text.rfind(RECORD_SEPARATOR_CHAR) else {
        return Vec::new();
    };

    text[..end]
        .split(RECORD_SEPARATOR_CHAR)
        .filter(|payload| !payload.is_empty())
        .collect()
}

/// Split a raw byte buffer into complete frame payloads.
///
/// The terminated region must be valid UTF-8. The unterminated tail is not
/// inspected, so a multi-byte character cut off at the end of a read does
/// not fail the call.
pub fn split_frames_bytes(bytes: &[u8]) -> Result<Vec<&str>> {
    let Some(end) = bytes.iter().rposition(|b| *b == RECORD_SEPARATOR) else {
        return Ok(Vec::new());
    };

    let text = std::str::from_utf8(&bytes[..=end])?;
    Ok(split_frames(text))
}

/// Append a payload and its terminator to `dst`.
///
/// Wire format:
/// ```text
/// ┌──────────────────────────┬────────┐
/// │ Payload (UTF-8 JSON)     │ 0x1E   │
/// └──────────────────────────┴────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if let Some(offset) = payload.iter().position(|b| *b == RECORD_SEPARATOR) {
        return Err(FrameError::SeparatorInPayload { offset });
    }

    dst.reserve(payload.len() + 1);
    dst.put_slice(payload);
    dst.put_u8(RECORD_SEPARATOR);
    Ok(())
}

/// Decode one frame from an accumulation buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a terminated frame yet;
/// the partial frame stays in `src` for the next call. On success, consumes
/// the payload and its terminator. Empty frames are consumed and skipped.
///
/// Each call scans `src` from the start. When the same buffer is decoded
/// again after every read, keep a [`FrameDecoder`] instead.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Bytes>> {
    FrameDecoder::new(max_payload).decode(src)
}

/// Incremental frame decoder for one accumulation buffer.
///
/// Remembers how much of the buffered, unterminated frame has already been
/// searched for a terminator, so a frame that arrives over many reads is
/// scanned once. Use one decoder per buffer, and only append to the buffer
/// between calls.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    max_payload_size: usize,
    next_index: usize,
}

impl FrameDecoder {
    pub fn new(max_payload_size: usize) -> Self {
        Self {
            max_payload_size,
            next_index: 0,
        }
    }

    pub fn max_payload_size(&self) -> usize {
        self.max_payload_size
    }

    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.max_payload_size = max_payload_size;
    }

    /// Decode the next frame from `src`; see [`decode_frame`].
    pub fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        loop {
            // A buffer shorter than the scanned prefix was drained elsewhere.
            let start = if self.next_index <= src.len() {
                self.next_index
            } else {
                0
            };
            let Some(offset) = src[start..].iter().position(|b| *b == RECORD_SEPARATOR) else {
                self.next_index = src.len();
                if src.len() > self.max_payload_size {
                    return Err(FrameError::PayloadTooLarge {
                        size: src.len(),
                        max: self.max_payload_size,
                    });
                }
                return Ok(None); // Need more data
            };

            let end = start + offset;
            self.next_index = 0;

            if end > self.max_payload_size {
                return Err(FrameError::PayloadTooLarge {
                    size: end,
                    max: self.max_payload_size,
                });
            }

            let payload = src.split_to(end).freeze();
            src.advance(1);

            if payload.is_empty() {
                trace!("skipping empty frame");
                continue;
            }

            std::str::from_utf8(&payload)?;
            return Ok(Some(payload));
        }
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAYLOAD)
    }
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}
