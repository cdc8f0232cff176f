use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{ClientError, ClientResult};

pub fn resolve_daybook_home(home_override: Option<&Path>) -> ClientResult<PathBuf> {
    let candidate = match home_override {
        Some(path) => path.to_path_buf(),
        None => {
            if let Some(override_path) = std::env::var_os("DAYBOOK_HOME") {
                PathBuf::from(override_path)
            } else if let Some(home_path) = home::home_dir() {
                home_path.join(".daybook")
            } else {
                return Err(ClientError::home_unresolved(
                    "Could not resolve a home directory for the sales sheet.",
                ));
            }
        }
    };

    absolutize(&candidate)
}

pub fn sheet_path_from_env() -> Option<PathBuf> {
    std::env::var_os("DAYBOOK_SHEET")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

pub fn resolve_relative_to(home: &Path, raw: &str) -> PathBuf {
    let candidate = Path::new(raw);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }
    home.join(candidate)
}

pub fn map_sheet_read_error(path: &Path, error: &std::io::Error) -> ClientError {
    match error.kind() {
        ErrorKind::NotFound => ClientError::sheet_not_found(path),
        ErrorKind::PermissionDenied => {
            ClientError::sheet_permission_denied(path, &error.to_string())
        }
        _ => ClientError::sheet_unreadable(path, &error.to_string()),
    }
}

pub fn map_sheet_write_error(path: &Path, error: &std::io::Error) -> ClientError {
    match error.kind() {
        ErrorKind::NotFound => ClientError::sheet_not_found(path),
        ErrorKind::PermissionDenied => {
            ClientError::sheet_permission_denied(path, &error.to_string())
        }
        _ => ClientError::sheet_append_failed(path, &error.to_string()),
    }
}

fn absolutize(path: &Path) -> ClientResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|error| ClientError::home_unresolved(&error.to_string()))
}
