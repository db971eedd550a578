//! Path management for tuition-pay files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/tuition-pay/        # Config directory
//! ├── config.toml               # Client configuration
//! └── logs/                     # Application logs
//!     └── tuition.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "tuition-pay";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find the user config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for tuition_core::TuitionError {
    fn from(err: PathError) -> Self {
        tuition_core::TuitionError::config(err.to_string())
    }
}

pub struct TuitionPaths;

impl TuitionPaths {
    /// Returns the configuration directory (e.g. `~/.config/tuition-pay/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the log directory.
    pub fn log_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }

    /// Returns the directory receipts are written to: the current directory,
    /// falling back to the config directory.
    pub fn receipt_dir() -> Result<PathBuf, PathError> {
        match std::env::current_dir() {
            Ok(dir) => Ok(dir),
            Err(_) => Self::config_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_lives_in_app_dir() {
        if let Ok(path) = TuitionPaths::config_file() {
            assert!(path.ends_with("tuition-pay/config.toml"));
        }
    }

    #[test]
    fn test_log_dir_is_under_config_dir() {
        if let (Ok(config), Ok(logs)) = (TuitionPaths::config_dir(), TuitionPaths::log_dir()) {
            assert!(logs.starts_with(config));
        }
    }
}
