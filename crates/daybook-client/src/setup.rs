use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ClientResult;
use crate::config::{DEFAULT_SHEET_FILE, load_config};
use crate::state::{resolve_daybook_home, resolve_relative_to, sheet_path_from_env};

#[derive(Debug, Clone)]
pub struct SetupContext {
    pub home: PathBuf,
    pub sheet_path: PathBuf,
    pub cache_ttl: Duration,
}

pub fn resolve() -> ClientResult<SetupContext> {
    resolve_with_home_override(None)
}

pub fn resolve_at(home_override: &Path) -> ClientResult<SetupContext> {
    resolve_with_home_override(Some(home_override))
}

fn resolve_with_home_override(home_override: Option<&Path>) -> ClientResult<SetupContext> {
    let home = resolve_daybook_home(home_override)?;
    let config = load_config(&home)?;

    // An explicit home pins the sheet to that home's config.
    let env_sheet = if home_override.is_none() {
        sheet_path_from_env()
    } else {
        None
    };
    let sheet_path = match (env_sheet, config.sheet.path.as_deref()) {
        (Some(path), _) => path,
        (None, Some(raw)) => resolve_relative_to(&home, raw),
        (None, None) => home.join(DEFAULT_SHEET_FILE),
    };

    tracing::debug!(
        home = %home.display(),
        sheet = %sheet_path.display(),
        ttl_seconds = config.cache.ttl_seconds,
        "resolved setup"
    );

    Ok(SetupContext {
        home,
        sheet_path,
        cache_ttl: Duration::from_secs(config.cache.ttl_seconds),
    })
}
