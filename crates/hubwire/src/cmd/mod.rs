use clap::{Args, Subcommand};
use std::path::PathBuf;

use hubwire_protocol::ProtocolConfig;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode framed hub messages from a file or stdin.
    Decode(DecodeArgs),
    /// Encode an invocation and write the framed bytes to stdout.
    Encode(EncodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat, config: ProtocolConfig) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format, config),
        Command::Encode(args) => encode::run(args, config),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Input file. Reads stdin when omitted or `-`.
    pub path: Option<PathBuf>,
    /// Fail when the input ends with an unterminated frame.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Hub method to invoke.
    #[arg(long, short = 't')]
    pub target: String,
    /// Invocation id.
    #[arg(long, default_value = "0")]
    pub id: String,
    /// Argument as a JSON value; repeat for each argument.
    #[arg(long = "arg", value_name = "JSON")]
    pub args: Vec<String>,
    /// Do not expect a completion for this invocation.
    #[arg(long)]
    pub non_blocking: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
