use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use hubwire_frame::{FrameConfig, FrameError, FrameReader};
use hubwire_protocol::{parse_message, ProtocolConfig};
use tracing::{debug, info, warn};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, protocol_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat, config: ProtocolConfig) -> CliResult<i32> {
    let input = open_input(args.path.as_deref())?;
    let mut reader = FrameReader::with_config(
        input,
        FrameConfig {
            max_payload_size: config.max_payload_size,
        },
    );

    let count = decode_stream(&mut reader, args.strict, |message, payload| {
        print_message(message, payload, format)
    })?;
    info!(messages = count, "decode finished");

    Ok(SUCCESS)
}

fn open_input(path: Option<&Path>) -> CliResult<Box<dyn Read>> {
    match path {
        Some(path) if path != Path::new("-") => File::open(path)
            .map(|file| Box::new(file) as Box<dyn Read>)
            .map_err(|err| io_error(&format!("failed opening {}", path.display()), err)),
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

/// Decode frames until EOF, handing each message to `emit`.
///
/// Stops at the first frame that fails to decode. An unterminated frame at
/// EOF is ignored unless `strict` is set.
fn decode_stream<R, F>(reader: &mut FrameReader<R>, strict: bool, mut emit: F) -> CliResult<usize>
where
    R: Read,
    F: FnMut(&hubwire_protocol::HubMessage, &[u8]),
{
    let mut count = 0usize;
    loop {
        match reader.next_frame() {
            Ok(Some(payload)) => {
                let text = std::str::from_utf8(&payload)
                    .map_err(|err| frame_error("read failed", FrameError::from(err)))?;
                let message = parse_message(text)
                    .map_err(|err| protocol_error(&format!("frame {count}"), err))?;
                debug!(
                    frame = count,
                    message_type = %message.message_type(),
                    invocation_id = message.invocation_id(),
                    "decoded frame"
                );
                emit(&message, &payload);
                count += 1;
            }
            Ok(None) => return Ok(count),
            Err(FrameError::ConnectionClosed) if !strict => {
                warn!(
                    pending = reader.pending().len(),
                    "ignoring unterminated trailing frame"
                );
                return Ok(count);
            }
            Err(err) => return Err(frame_error("read failed", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use hubwire_protocol::HubMessage;

    use super::*;
    use crate::exit::{DATA_INVALID, FAILURE};

    fn collect(input: &[u8], strict: bool) -> CliResult<Vec<HubMessage>> {
        let mut reader = FrameReader::new(Cursor::new(input.to_vec()));
        let mut messages = Vec::new();
        decode_stream(&mut reader, strict, |message, _| messages.push(message.clone()))?;
        Ok(messages)
    }

    #[test]
    fn decodes_every_frame() {
        let messages = collect(
            b"{\"type\":2,\"invocationId\":\"1\",\"item\":1}\x1e{\"type\":3,\"invocationId\":\"1\"}\x1e",
            false,
        )
        .unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn trailing_fragment_is_ignored_unless_strict() {
        let input = b"{\"type\":3,\"invocationId\":\"1\"}\x1e{\"type\":";
        assert_eq!(collect(input, false).unwrap().len(), 1);

        let err = collect(input, true).unwrap_err();
        assert_eq!(err.code, FAILURE);
    }

    #[test]
    fn invalid_frame_stops_decoding() {
        let err = collect(b"{\"type\":9,\"invocationId\":\"1\"}\x1e", false).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("frame 0"));
    }
}
