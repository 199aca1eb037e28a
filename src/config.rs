//! User configuration loaded from `~/.facturama-sandbox/config.yaml`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::compose::RequestComposer;
use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_AUTHORIZATION, DEFAULT_BASE_URL, DEFAULT_LOG_FILE,
    DEFAULT_TIMEOUT_SECS,
};
use crate::models::HeaderSet;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Origin every endpoint path is appended to
    pub base_url: String,
    /// Initial Authorization header value
    pub authorization: String,
    pub timeout_secs: u64,
    /// Replaces the built-in catalog when set
    pub catalog: Option<PathBuf>,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            authorization: DEFAULT_AUTHORIZATION.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            catalog: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Directory holding the config file
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
    }

    /// Load from the default location, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        Config::load_from(&Config::config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        ensure!(
            config.timeout_secs > 0,
            "Invalid config {}: timeout_secs must be greater than zero",
            path.display()
        );
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn default_headers(&self) -> HeaderSet {
        HeaderSet::seeded(self.authorization.clone())
    }

    pub fn composer(&self) -> RequestComposer {
        RequestComposer::new(self.base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.composer().base_url(), "https://apisandbox.facturama.mx");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "base_url: http://localhost:5000/\nauthorization: Basic dXNlcjpwYXNz\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.composer().base_url(), "http://localhost:5000");
        assert_eq!(config.default_headers().get("Authorization"), Some("Basic dXNlcjpwYXNz"));
        assert_eq!(config.default_headers().get("Content-Type"), Some("application/json"));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.catalog.is_none());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "timeout_secs: 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("timeout_secs must be greater than zero"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "timeout_secs: [not a number]\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config"));
    }
}
