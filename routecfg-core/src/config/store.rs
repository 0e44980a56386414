//! JSON file persistence for the configuration document.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::document::ConfigDocument;
use crate::error::{ConfigError, Result};

/// Environment variable that overrides the default config path.
pub const CONFIG_ENV_VAR: &str = "ROUTECFG_CONFIG";

/// File-backed storage for a [`ConfigDocument`].
///
/// Loads validate before returning; saves validate before writing and go
/// through a sibling temp file so a crash never leaves a truncated config.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Use the config file at a specific path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the config path from an explicit override, then
    /// `ROUTECFG_CONFIG`, then the platform default.
    pub fn resolve(explicit: Option<PathBuf>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Ok(Self::at(path));
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
            return Ok(Self::at(PathBuf::from(path)));
        }
        Ok(Self::at(Self::default_path()?))
    }

    /// Get the default config path.
    ///
    /// Returns `~/.config/routecfg/config.json` (or platform equivalent).
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("routecfg").join("config.json"))
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the config file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load and validate the document.
    pub fn load(&self) -> Result<ConfigDocument> {
        if !self.path.exists() {
            return Err(ConfigError::FileNotFound(self.path.clone()));
        }
        let json = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), bytes = json.len(), "Loading config");
        ConfigDocument::parse(&json)
    }

    /// Validate and write the document.
    ///
    /// Creates parent directories if they don't exist.
    /// Sets file permissions to 0600 on Unix (the file holds API keys).
    pub fn save(&self, doc: &ConfigDocument) -> Result<()> {
        let mut json = doc.to_json_pretty()?;
        json.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let tmp = self.temp_path();
        std::fs::write(&tmp, json.as_bytes()).map_err(|source| ConfigError::Io {
            path: tmp.clone(),
            source,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))
            {
                tracing::warn!(path = %tmp.display(), error = %e, "Failed to set config file permissions");
            }
        }

        std::fs::rename(&tmp, &self.path).map_err(|source| self.io_error(source))?;
        info!(path = %self.path.display(), "Saved config");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "config.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
