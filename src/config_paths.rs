//! Where codenav keeps its files
//!
//! Resolution order for the base directory:
//! 1. `$CODENAV_CONFIG_DIR`, used as-is
//! 2. `%APPDATA%\codenav` on Windows
//! 3. `$XDG_CONFIG_HOME/codenav`, else `~/.config/codenav`
//!
//! Inside it: `config.yaml` and `logs/`.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "codenav";
const CONFIG_FILE: &str = "config.yaml";
const LOGS_DIR: &str = "logs";

/// Explicit override of the base directory
pub const CONFIG_DIR_ENV: &str = "CODENAV_CONFIG_DIR";

/// Prefix of the daily-rotated log files (`codenav.log.2026-01-07`)
pub const LOG_FILE_PREFIX: &str = "codenav.log";

/// Base directory, if one can be determined
pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    platform_config_root().map(|root| root.join(APP_DIR))
}

#[cfg(target_os = "windows")]
fn platform_config_root() -> Option<PathBuf> {
    env::var_os("APPDATA").map(PathBuf::from)
}

#[cfg(not(target_os = "windows"))]
fn platform_config_root() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(LOGS_DIR))
}

/// Create the logs directory (and its parents) and return it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let dir = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
    Ok(dir)
}
