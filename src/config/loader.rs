//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::BridgeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the Miniflux base URL.
pub const URL_ENV_VAR: &str = "MINIFLUX_URL";

/// Environment variable holding the Miniflux API key.
pub const API_KEY_ENV_VAR: &str = "MINIFLUX_API_KEY";

/// Environment variable pointing at an optional TOML config file.
pub const CONFIG_PATH_ENV_VAR: &str = "MINIFLUX_BRIDGE_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML config file. Validation is left to the caller so that
/// environment and CLI overrides are applied first.
pub fn read_config(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Build the unvalidated runtime configuration: optional file, then process
/// environment.
///
/// `explicit` takes precedence over `MINIFLUX_BRIDGE_CONFIG`. Without either,
/// defaults are used.
pub fn load_from_env(explicit: Option<&Path>) -> Result<BridgeConfig, ConfigError> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV_VAR).map(PathBuf::from));

    let mut config = match path {
        Some(path) => read_config(&path)?,
        None => BridgeConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Run semantic validation on a fully assembled configuration.
pub fn finalize(config: BridgeConfig) -> Result<BridgeConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay endpoint settings from an environment lookup.
pub fn apply_env_overrides<F>(config: &mut BridgeConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(URL_ENV_VAR) {
        config.upstream.url = Some(url);
    }
    if let Some(key) = lookup(API_KEY_ENV_VAR) {
        config.upstream.api_key = Some(key);
    }
}
