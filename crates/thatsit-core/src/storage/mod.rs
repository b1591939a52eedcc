mod config;

pub use config::{Config, CountdownConfig, LockConfig, UiConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/thatsit[-dev]/` based on THATSIT_ENV.
///
/// Set THATSIT_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("THATSIT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("thatsit-dev")
    } else {
        base_dir.join("thatsit")
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Log file written by the interactive front end.
pub fn log_path() -> Result<PathBuf, ConfigError> {
    Ok(data_dir()?.join("thatsit.log"))
}
