use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

use crate::store::SHEET_HEADERS;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `daybook {cmd} --help` for usage."),
            None => "Run `daybook --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn no_data_for_day(day: &str) -> Self {
        Self::new(
            "no_data_for_day",
            &format!("There is no sales data for {day}."),
            vec![
                "Run `daybook days` to list the days that have data.".to_string(),
                "Run `daybook simulate` to append a synthetic next day.".to_string(),
            ],
        )
        .with_data(json!({
            "target_date": day,
        }))
    }

    pub fn sheet_empty(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "no_data_for_day",
            &format!("Sales sheet at `{location}` has no usable rows yet."),
            vec!["Run `daybook simulate` to append a synthetic day of sales.".to_string()],
        )
        .with_data(json!({
            "sheet_path": location,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn config_invalid(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "config_invalid",
            &format!("Configuration at `{location}` could not be read: {detail}"),
            vec![format!(
                "Fix or remove `{location}`; every key in it is optional."
            )],
        )
    }

    pub fn home_unresolved(detail: &str) -> Self {
        Self::new(
            "home_unresolved",
            detail,
            vec!["Set `DAYBOOK_HOME` to a readable directory.".to_string()],
        )
    }

    pub fn sheet_not_found(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "sheet_not_found",
            &format!("Sales sheet was not found at `{location}`."),
            vec![
                format!(
                    "Create `{location}` with the header row: {}.",
                    SHEET_HEADERS.join(",")
                ),
                "Or point `DAYBOOK_SHEET` at an existing sales sheet.".to_string(),
            ],
        )
        .with_data(json!({
            "sheet_path": location,
            "expected_headers": SHEET_HEADERS,
        }))
    }

    pub fn sheet_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "sheet_permission_denied",
            &format!("Cannot access sales sheet at `{location}`: {detail}"),
            vec![format!(
                "Grant read and write access to `{location}` or set `DAYBOOK_SHEET` to a writable file."
            )],
        )
    }

    pub fn sheet_unreadable(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "sheet_unreadable",
            &format!("Failed to load sales sheet at `{location}`: {detail}"),
            vec!["Retry the command once the sheet is readable.".to_string()],
        )
    }

    pub fn sheet_append_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "sheet_append_failed",
            &format!("Failed to append rows to sales sheet at `{location}`: {detail}"),
            vec!["Retry `daybook simulate` once the sheet is writable.".to_string()],
        )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
