use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::ClientError;

/// Directory name used under the platform config/data directories.
pub const APP_DIR: &str = "finance-tracker";

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration, read from `config.toml`.
///
/// ```toml
/// base_url = "https://finance.example.com"
/// timeout_secs = 30
/// data_dir = "/home/me/.local/share/finance-tracker"
/// ```
///
/// Every field is optional; missing ones fall back to [`ClientConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin every API path is resolved against.
    pub base_url: String,

    /// Request timeout (ignored on WASM, where the browser owns timeouts).
    pub timeout_secs: u64,

    /// Where the credential file lives. `None` means the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            data_dir: None,
        }
    }
}

impl ClientConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(s: &str) -> Result<Self, ClientError> {
        let config: ClientConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`; a missing file yields the defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load from the default location (`<config_dir>/finance-tracker/config.toml`).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_default() -> Result<Self, ClientError> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Default config file path, if the platform has a config directory.
    #[cfg(not(target_arch = "wasm32"))]
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Directory holding the persisted credential.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ClientError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or_else(|| ClientError::Config("Cannot determine a data directory".into()))
    }

    /// Replace the base URL, e.g. from a command-line flag.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ClientError> {
        self.base_url = base_url.into();
        self.validate()?;
        Ok(self)
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    #[must_use]
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    fn validate(&self) -> Result<(), ClientError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base_url must start with http:// or https:// (got '{}')",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Config("timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }
}
