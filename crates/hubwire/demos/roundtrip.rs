//! Encode an invocation, then decode a server reply that arrives in pieces.
//!
//! Run with:
//!   cargo run --example roundtrip
//!
//! Pipe the CLI into itself for the same round trip:
//!   cargo run --features cli -- encode -t add --arg 1 --arg 2 \
//!     | cargo run --features cli -- decode --format pretty

use bytes::BytesMut;
use hubwire::protocol::{
    CompletionOutcome, HubMessage, HubProtocol, InvocationMessage, JsonHubProtocol,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let protocol = JsonHubProtocol::new();

    let call = InvocationMessage::new("1", "sum", Vec::new())
        .with_argument(&[1, 2, 3])?
        .with_argument("running total")?;
    let wire = protocol.write_message(&call.into())?;
    let text = String::from_utf8_lossy(&wire);
    eprintln!("Sent {} bytes: {}", wire.len(), text.trim_end_matches('\u{1e}'));

    // A reply as it might arrive from the socket: two stream items and a
    // completion, split at arbitrary byte offsets.
    let reply = b"{\"type\":2,\"invocationId\":\"1\",\"item\":1}\x1e{\"type\":2,\"invocationId\":\"1\",\"item\":3}\x1e{\"type\":3,\"invocationId\":\"1\",\"result\":[1,3,6]}\x1e";
    let mut decoder = protocol.frame_decoder();
    let mut buf = BytesMut::new();

    for chunk in reply.chunks(17) {
        buf.extend_from_slice(chunk);
        for message in protocol.parse_buffered(&mut decoder, &mut buf)? {
            match message {
                HubMessage::StreamItem(item) => {
                    let value: Option<i64> = protocol.convert_from_wire(item.item())?;
                    eprintln!("Stream item for {}: {value:?}", item.invocation_id());
                }
                HubMessage::Completion(done) => match done.outcome() {
                    CompletionOutcome::Void => eprintln!("Completed {}", done.invocation_id()),
                    CompletionOutcome::Result(result) => {
                        let totals: Option<Vec<i64>> =
                            protocol.convert_from_wire(result.as_ref())?;
                        eprintln!("Completed {} with {totals:?}", done.invocation_id());
                    }
                    CompletionOutcome::Error(error) => {
                        eprintln!("Invocation {} failed: {error}", done.invocation_id());
                    }
                },
                HubMessage::Invocation(call) => eprintln!("Unexpected call to {}", call.target()),
            }
        }
    }

    Ok(())
}
