//! Configuration management for numfacts.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Environment variables (NUMFACTS_*)
//! 2. Config file (--config, $NUMFACTS_CONFIG, or the user config dir)
//! 3. Default values

use anyhow::{Context, Result};
use directories::ProjectDirs;
use numfacts_core::{NumfactsConfig, SourceConfig, StorageBackend, StoreConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where history is kept
    #[serde(default)]
    pub storage: StorageConfig,

    /// Numbers API settings
    #[serde(default)]
    pub source: SourceConfig,

    /// History size settings
    #[serde(default)]
    pub history: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store backend (sqlite or memory)
    #[serde(default)]
    pub backend: StorageBackend,

    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_path: default_database_path(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "numfacts", "numfacts")
}

fn default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = project_dirs() {
        proj_dirs.data_dir().to_path_buf()
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".numfacts")
    }
}

fn default_config_dir() -> PathBuf {
    if let Some(proj_dirs) = project_dirs() {
        proj_dirs.config_dir().to_path_buf()
    } else {
        default_data_dir()
    }
}

fn default_database_path() -> PathBuf {
    default_data_dir().join("facts.db")
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// An explicit `path` must exist; the default location may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let config_path = Self::config_path();
                if config_path.exists() {
                    Self::from_file(&config_path)?
                } else {
                    Config::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("NUMFACTS_CONFIG") {
            PathBuf::from(path)
        } else {
            default_config_dir().join("config.toml")
        }
    }

    /// Apply NUMFACTS_* overrides using `lookup` to read variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("NUMFACTS_DATABASE_PATH").filter(|v| !v.is_empty()) {
            self.storage.database_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("NUMFACTS_BASE_URL").filter(|v| !v.is_empty()) {
            self.source.base_url = url;
        }
    }

    /// Library configuration for building the app.
    pub fn to_core(&self) -> NumfactsConfig {
        NumfactsConfig::new(&self.storage.database_path)
            .with_backend(self.storage.backend)
            .with_source(self.source.clone())
            .with_store(self.history.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numfacts_core::config::{RandomCategory, ResponseFormat};
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert!(config.storage.database_path.ends_with("facts.db"));
        assert_eq!(config.source.base_url, "http://numbersapi.com");
        assert_eq!(config.history.capacity, 100);
        assert_eq!(config.history.history_limit, 50);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[storage]
backend = "memory"

[source]
format = "text"
random_category = "year"

[history]
capacity = 10
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.storage.database_path.ends_with("facts.db"));
        assert_eq!(config.source.format, ResponseFormat::Text);
        assert_eq!(config.source.random_category, RandomCategory::Year);
        assert_eq!(config.source.request_timeout_ms, 15_000);
        assert_eq!(config.history.capacity, 10);
        assert_eq!(config.history.history_limit, 50);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert!(Config::load(Some(dir.path().join("nope.toml").as_path())).is_err());
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage\nbackend = ").unwrap();

        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("NUMFACTS_DATABASE_PATH", "/var/lib/numfacts/facts.db"),
            ("NUMFACTS_BASE_URL", "http://localhost:9000"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(
            config.storage.database_path,
            PathBuf::from("/var/lib/numfacts/facts.db")
        );
        assert_eq!(config.source.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env(|_| Some(String::new()));

        assert_eq!(config.source.base_url, "http://numbersapi.com");
        assert!(config.storage.database_path.ends_with("facts.db"));
    }

    #[test]
    fn test_to_core() {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;
        config.history.history_limit = 7;

        let core = config.to_core();

        assert_eq!(core.backend, StorageBackend::Memory);
        assert_eq!(core.database_path, config.storage.database_path);
        assert_eq!(core.store.history_limit, 7);
        assert!(core.validate().is_ok());
    }
}
