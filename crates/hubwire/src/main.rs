mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;
use hubwire_frame::DEFAULT_MAX_PAYLOAD;
use hubwire_protocol::{ProtocolConfig, DEFAULT_MAX_VALUE_DEPTH};

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "hubwire", version, about = "JSON hub protocol codec CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    /// Largest accepted frame payload in bytes.
    #[arg(
        long,
        value_name = "BYTES",
        env = "HUBWIRE_MAX_PAYLOAD",
        default_value_t = DEFAULT_MAX_PAYLOAD,
        global = true
    )]
    max_payload: usize,

    /// Deepest nesting accepted for argument values.
    #[arg(
        long,
        value_name = "DEPTH",
        env = "HUBWIRE_MAX_DEPTH",
        default_value_t = DEFAULT_MAX_VALUE_DEPTH,
        global = true
    )]
    max_depth: usize,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn protocol_config(&self) -> ProtocolConfig {
        ProtocolConfig {
            max_payload_size: self.max_payload,
            max_value_depth: self.max_depth,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let config = cli.protocol_config();
    let result = cmd::run(cli.command, format, config);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}
