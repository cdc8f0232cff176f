mod error_text;
mod format;
mod json;
mod mode;
mod report_text;
mod sheet_text;

use std::io;

use daybook_client::{ClientError, SuccessEnvelope};
use serde_json::Value;

use crate::stdout_io::write_stdout_line;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_payload(payload: &Value) -> io::Result<()> {
    write_stdout_line(&json::render_payload_json(payload)?)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "days" => sheet_text::render_days(&success.data),
        "simulate" => sheet_text::render_simulate(&success.data),
        "report" => report_text::render_report(&success.data),
        "alerts" => report_text::render_alerts(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
