use std::io;

use hubwire_frame::FrameWriter;
use hubwire_protocol::{HubProtocol, InvocationMessage, JsonHubProtocol, ProtocolConfig, Value};
use tracing::debug;

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, protocol_error, CliError, CliResult, SUCCESS, USAGE};

pub fn run(args: EncodeArgs, config: ProtocolConfig) -> CliResult<i32> {
    let arguments = parse_arguments(&args.args)?;
    let message = InvocationMessage::new(args.id, args.target, arguments)
        .with_non_blocking(args.non_blocking);

    let protocol = JsonHubProtocol::with_config(config);
    let framed = protocol
        .write_message(&message.into())
        .map_err(|err| protocol_error("encode failed", err))?;

    let mut writer = FrameWriter::new(io::stdout().lock());
    writer
        .write_framed(&framed)
        .map_err(|err| frame_error("write failed", err))?;
    debug!(size = framed.len(), "wrote invocation frame");

    Ok(SUCCESS)
}

fn parse_arguments(raw: &[String]) -> CliResult<Vec<Value>> {
    raw.iter()
        .enumerate()
        .map(|(index, arg)| {
            serde_json::from_str(arg).map_err(|err| {
                CliError::new(USAGE, format!("--arg #{} is not valid JSON: {err}", index + 1))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_json_arguments() {
        let args = vec!["1".to_string(), "\"two\"".to_string(), "[3]".to_string()];
        assert_eq!(
            parse_arguments(&args).unwrap(),
            vec![json!(1), json!("two"), json!([3])]
        );
    }

    #[test]
    fn rejects_invalid_json_argument() {
        let args = vec!["1".to_string(), "not json".to_string()];
        let err = parse_arguments(&args).unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(err.message.contains("#2"));
    }
}
