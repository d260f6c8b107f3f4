use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use hubwire_protocol::{CompletionOutcome, HubMessage, Value};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

static NULL: Value = Value::Null;

#[derive(Serialize)]
struct MessageOutput<'a> {
    #[serde(rename = "type")]
    message_type: &'static str,
    invocation_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arguments: Option<&'a [Value]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    non_blocking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    item: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl<'a> MessageOutput<'a> {
    fn from_message(message: &'a HubMessage) -> Self {
        let mut out = Self {
            message_type: message.message_type().name(),
            invocation_id: message.invocation_id(),
            target: None,
            arguments: None,
            non_blocking: None,
            item: None,
            result: None,
            error: None,
        };

        match message {
            HubMessage::Invocation(msg) => {
                out.target = Some(msg.target());
                out.arguments = Some(msg.arguments());
                out.non_blocking = Some(msg.non_blocking());
            }
            HubMessage::StreamItem(msg) => {
                out.item = msg.item();
            }
            HubMessage::Completion(msg) => match msg.outcome() {
                CompletionOutcome::Void => {}
                CompletionOutcome::Result(result) => {
                    out.result = Some(result.as_ref().unwrap_or(&NULL));
                }
                CompletionOutcome::Error(error) => out.error = Some(error),
            },
        }

        out
    }
}

pub fn print_message(message: &HubMessage, payload: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = MessageOutput::from_message(message);
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TYPE", "INVOCATION", "TARGET", "PAYLOAD"])
                .add_row(vec![
                    message.message_type().name().to_string(),
                    message.invocation_id().to_string(),
                    target_of(message).to_string(),
                    payload_summary(message),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "type={} id={} target={} payload={}",
                message.message_type().name(),
                message.invocation_id(),
                target_of(message),
                payload_summary(message)
            );
        }
        OutputFormat::Raw => {
            print_raw(payload);
            print_raw(b"\n");
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn target_of(message: &HubMessage) -> &str {
    match message {
        HubMessage::Invocation(msg) => msg.target(),
        _ => "-",
    }
}

fn payload_summary(message: &HubMessage) -> String {
    match message {
        HubMessage::Invocation(msg) => Value::from(msg.arguments().to_vec()).to_string(),
        HubMessage::StreamItem(msg) => msg
            .item()
            .map(Value::to_string)
            .unwrap_or_else(|| "-".to_string()),
        HubMessage::Completion(msg) => match msg.outcome() {
            CompletionOutcome::Void => "ok".to_string(),
            CompletionOutcome::Result(result) => format!(
                "result={}",
                result.as_ref().unwrap_or(&NULL)
            ),
            CompletionOutcome::Error(error) => format!("error={error}"),
        },
    }
}
