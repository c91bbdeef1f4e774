//! Mailbook configuration directory
//!
//! Settings live in `~/.config/mailbook/` unless `MAILBOOK_CONFIG_DIR` points
//! somewhere else. Every file is optional: a missing file means "use the
//! defaults", a present but broken file is an error.
//!
//! Call [`init`] at application startup to bootstrap the config directory.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Name of the application directory inside the platform config dir
const APP_DIR: &str = "mailbook";

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "MAILBOOK_CONFIG_DIR";

/// Initialize the Mailbook config directory.
///
/// Creates the directory if it doesn't exist.
/// Call this once at application startup.
pub fn init() -> Result<PathBuf> {
    let dir = config_dir().context("Could not determine config directory")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    Ok(dir)
}

/// Get the Mailbook config directory
pub fn config_dir() -> Option<PathBuf> {
    resolve_config_dir(std::env::var_os(CONFIG_DIR_ENV), dirs::config_dir())
}

/// Pick the override when it is non-empty, else `<platform dir>/mailbook`
fn resolve_config_dir(over: Option<OsString>, platform: Option<PathBuf>) -> Option<PathBuf> {
    match over {
        Some(dir) if !dir.is_empty() => Some(expand_home(&dir.to_string_lossy())),
        _ => platform.map(|p| p.join(APP_DIR)),
    }
}

/// Get the path to a config file within the Mailbook config directory
pub fn config_path(filename: &str) -> Option<PathBuf> {
    config_dir().map(|p| p.join(filename))
}

/// Load a JSON config file from the config directory, or `T::default()`
/// when the file (or the directory) does not exist
pub fn load_json_or_default<T: DeserializeOwned + Default>(filename: &str) -> Result<T> {
    match config_path(filename) {
        Some(path) => load_json_file_or_default(&path),
        None => Ok(T::default()),
    }
}

/// Load a JSON file, or `T::default()` when it does not exist
pub fn load_json_file_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_json(&content, path),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(T::default()),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to read config file: {}", path.display()))
        }
    }
}

/// Load and parse a JSON file that must exist
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_json(&content, path)
}

fn parse_json<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T> {
    serde_json::from_str(content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Expand a leading `~` to the user's home directory
///
/// Paths without a leading tilde, or when no home directory can be found,
/// are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
