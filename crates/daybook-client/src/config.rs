use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::{ClientError, ClientResult};

pub const CONFIG_FILE_NAME: &str = "daybook.toml";
pub const DEFAULT_SHEET_FILE: &str = "sales.csv";
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 600;

/// Optional `<home>/daybook.toml`. Every section and key may be omitted.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DaybookConfig {
    pub sheet: SheetConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Sheet file path; relative paths resolve against the daybook home.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }
}

pub fn load_config(home: &Path) -> ClientResult<DaybookConfig> {
    let config_path = home.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(DaybookConfig::default());
    }

    let contents = fs::read_to_string(&config_path)
        .map_err(|error| ClientError::config_invalid(&config_path, &error.to_string()))?;
    let config = parse_config(&contents)
        .map_err(|detail| ClientError::config_invalid(&config_path, &detail))?;
    tracing::info!(path = %config_path.display(), "loaded config");
    Ok(config)
}

fn parse_config(contents: &str) -> Result<DaybookConfig, String> {
    toml::from_str::<DaybookConfig>(contents).map_err(|error| error.message().to_string())
}
