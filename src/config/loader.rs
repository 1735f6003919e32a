//! Tool configuration loading.
//!
//! The default configuration is compiled into the binary. An explicit
//! override file replaces it entirely; keys it omits stay absent so that
//! handlers can report them by name.

use std::fs;
use std::path::Path;

use crate::config::schema::ToolConfig;
use crate::error::{GetlitError, Result};

/// The configuration shipped with the binary.
pub const DEFAULT_CONFIG: &str = include_str!("../../getlit.config.json");

/// Parse configuration JSON, attributing errors to `origin`.
pub fn parse_config(content: &str, origin: &Path) -> Result<ToolConfig> {
    serde_json::from_str(content).map_err(|e| GetlitError::ConfigParseError {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the embedded default configuration.
pub fn load_default_config() -> Result<ToolConfig> {
    parse_config(DEFAULT_CONFIG, Path::new("getlit.config.json"))
}

/// Load a configuration file from disk.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the JSON is invalid.
pub fn load_config_file(path: &Path) -> Result<ToolConfig> {
    if !path.exists() {
        return Err(GetlitError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content, path)
}

/// Load the configuration for this invocation.
///
/// Uses `override_path` when given, otherwise the embedded default.
pub fn load_config(override_path: Option<&Path>) -> Result<ToolConfig> {
    match override_path {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            load_config_file(path)
        }
        None => load_default_config(),
    }
}
