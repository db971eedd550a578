//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `config.toml` (a missing file means defaults),
//! applies environment overrides and caches the result.

use crate::paths::TuitionPaths;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tuition_core::config::ClientConfig;
use tuition_core::{Result, TuitionError};

/// Overrides `api_base_url`.
pub const ENV_API_BASE_URL: &str = "TUITION_API_BASE_URL";
/// Overrides `log_level`.
pub const ENV_LOG_LEVEL: &str = "TUITION_LOG_LEVEL";

/// Configuration service that loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Explicit config file; `None` resolves the default location.
    path: Option<PathBuf>,
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default `~/.config/tuition-pay/config.toml`.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading the given file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading it on first access.
    ///
    /// A broken file is logged and replaced by defaults; use
    /// [`Self::try_get_config`] to surface the error instead.
    pub fn get_config(&self) -> ClientConfig {
        match self.try_get_config() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("[ConfigService] Falling back to defaults: {}", e);
                let config = Self::apply_env_overrides(ClientConfig::default(), |key| {
                    std::env::var(key).ok()
                });
                self.store(config.clone());
                config
            }
        }
    }

    /// Gets the configuration, loading it on first access.
    pub fn try_get_config(&self) -> Result<ClientConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let path = self.config_path()?;
        let loaded = Self::load_file(&path)?;
        let loaded = Self::apply_env_overrides(loaded, |key| std::env::var(key).ok());
        tracing::debug!(
            "[ConfigService] Loaded config from {} (api_base_url={})",
            path.display(),
            loaded.api_base_url
        );

        self.store(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    /// The file this service reads.
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(TuitionPaths::config_file()?),
        }
    }

    fn store(&self, config: ClientConfig) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(config);
    }

    /// Reads a config file; a missing file yields defaults.
    pub fn load_file(path: &Path) -> Result<ClientConfig> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("[ConfigService] {} not found, using defaults", path.display());
                return Ok(ClientConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: ClientConfig = toml::from_str(&content)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Applies `TUITION_*` overrides. Empty values are ignored.
    pub fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> ClientConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_API_BASE_URL) {
            config.api_base_url = url.trim().to_string();
        }
        if let Some(level) = non_empty(ENV_LOG_LEVEL) {
            config.log_level = level.trim().to_string();
        }
        config
    }

    fn validate(config: &ClientConfig) -> Result<()> {
        if config.api_base_url.trim().is_empty() {
            return Err(TuitionError::config("api_base_url must not be empty"));
        }
        if config.otp.countdown_secs == 0 {
            return Err(TuitionError::config("otp.countdown_secs must be positive"));
        }
        Ok(())
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
