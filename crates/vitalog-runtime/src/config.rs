use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Resolve the on-device data directory:
/// 1. Explicit path (with tilde expansion)
/// 2. VITALOG_PATH environment variable (with tilde expansion)
/// 3. XDG data directory
/// 4. ~/.vitalog (fallback for systems without XDG)
pub fn resolve_data_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("VITALOG_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("vitalog"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".vitalog"));
    }

    Err(Error::Config(
        "could not determine data path: no HOME directory or XDG data directory found".to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Hosted backend coordinates. The section is optional in the config file;
/// without it the app is permanently in guest mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub url: String,
    pub api_key: String,
}

fn default_history_window() -> usize {
    30
}

fn default_session_check_timeout_ms() -> u64 {
    3500
}

/// Knobs for the sync coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Bounded history window: how many records stay in memory and in the
    /// cache snapshot. Oldest-by-timestamp rows are evicted past the cap.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// How long startup waits on the remote session check before falling
    /// back to guest mode.
    #[serde(default = "default_session_check_timeout_ms")]
    pub session_check_timeout_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            session_check_timeout_ms: default_session_check_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
    #[serde(default)]
    pub sync: SyncSettings,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::default_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::Config(format!("failed to read {}: {}", path.display(), err))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| {
                Error::Config(format!("failed to create {}: {}", parent.display(), err))
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|err| Error::Config(format!("failed to write {}: {}", path.display(), err)))?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(resolve_data_path(None)?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_a_file() -> Result<()> {
        let temp_dir = TempDir::new().expect("tempdir");
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path)?;
        assert!(config.remote.is_none());
        assert_eq!(config.sync.history_window, 30);
        assert_eq!(config.sync.session_check_timeout_ms, 3500);
        Ok(())
    }

    #[test]
    fn save_and_load_round_trip() -> Result<()> {
        let temp_dir = TempDir::new().expect("tempdir");
        let config_path = temp_dir.path().join("config.toml");

        let config = Config {
            remote: Some(RemoteConfig {
                url: "https://backend.example.com".to_string(),
                api_key: "anon-key".to_string(),
            }),
            sync: SyncSettings {
                history_window: 50,
                session_check_timeout_ms: 1000,
            },
        };

        config.save_to(&config_path)?;
        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded.sync.history_window, 50);
        assert_eq!(loaded.remote.expect("remote section").url, config.remote.unwrap().url);
        Ok(())
    }

    #[test]
    fn partial_file_fills_in_defaults() -> Result<()> {
        let temp_dir = TempDir::new().expect("tempdir");
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[sync]\nhistory_window = 10\n").expect("write");

        let config = Config::load_from(&config_path)?;
        assert!(config.remote.is_none());
        assert_eq!(config.sync.history_window, 10);
        assert_eq!(config.sync.session_check_timeout_ms, 3500);
        Ok(())
    }

    #[test]
    fn explicit_path_wins() {
        let path = resolve_data_path(Some("/tmp/vitalog-test")).expect("resolve");
        assert_eq!(path, PathBuf::from("/tmp/vitalog-test"));
    }
}
