use std::io;

use daybook_client::contracts::envelope::failure_from_error;
use daybook_client::{ClientError, SuccessEnvelope};
use serde::Serialize;
use serde_json::Value;

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "days" | "report" | "alerts" | "simulate" => serialize_json_pretty(success),
        _ => Err(io::Error::other(format!(
            "JSON output is not supported for command `{}`",
            success.command
        ))),
    }
}

/// Endpoint payloads are printed exactly as produced.
pub fn render_payload_json(payload: &Value) -> io::Result<String> {
    serialize_json_pretty(payload)
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    serialize_json_pretty(&failure_from_error(error))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
