//! Client configuration.
//!
//! Resolution order, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. `<config_dir>/mood-journal/config.json`
//! 3. Environment: `MOOD_JOURNAL_URL`, `MOOD_JOURNAL_TIMEOUT_SECS`
//! 4. Command-line flags (applied by the binary)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "mood-journal";
const CONFIG_FILE: &str = "config.json";
const STORE_FILE: &str = "identity.db";

/// Default URL of the analysis service.
pub const DEFAULT_URL: &str = "http://localhost:8000";

/// Default bound on every request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the analysis/registration service.
    pub base_url: String,
    /// Request timeout in seconds, applied to registration, submission and history.
    pub timeout_secs: u64,
    /// Identity store location. `None` means the platform data directory.
    pub store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            store_path: None,
        }
    }
}

impl Config {
    /// Load the config file and apply environment overrides.
    /// A missing or unreadable file falls back to defaults.
    pub fn load() -> Self {
        let mut config = match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.apply_env();
        config
    }

    fn try_load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    /// Read a config file without environment overrides. A missing file
    /// yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var("MOOD_JOURNAL_URL").ok(),
            std::env::var("MOOD_JOURNAL_TIMEOUT_SECS").ok(),
        );
    }

    fn apply_overrides(&mut self, url: Option<String>, timeout: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(raw) = timeout {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => tracing::warn!("Ignoring invalid MOOD_JOURNAL_TIMEOUT_SECS '{}'", raw),
            }
        }
    }

    /// Save the current configuration to the user config file and return
    /// where it went.
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = get_config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Configured store path, or the platform default.
    pub fn resolved_store_path(&self) -> Result<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => default_store_path(),
        }
    }
}

pub fn default_store_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join(STORE_FILE))
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_service() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let config: Config = serde_json::from_str(r#"{"base_url":"https://mood.example"}"#).unwrap();
        assert_eq!(config.base_url, "https://mood.example");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.store_path.is_none());
    }

    #[test]
    fn overrides_replace_url_and_timeout() {
        let mut config = Config::default();
        config.apply_overrides(Some("http://10.0.2.2:8000".into()), Some("5".into()));
        assert_eq!(config.base_url, "http://10.0.2.2:8000");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn invalid_timeout_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(None, Some("0".into()));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        config.apply_overrides(Some("  ".into()), Some("soon".into()));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.base_url, DEFAULT_URL);
    }

    #[test]
    fn saved_overrides_are_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mood-journal").join(CONFIG_FILE);
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let mut config = Config::default();
        config.apply_overrides(Some("https://mood.example".into()), Some("12".into()));
        config.store_path = Some(dir.path().join("identity.db"));
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn unparseable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "not json").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
