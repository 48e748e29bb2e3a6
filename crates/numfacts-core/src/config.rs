//! Configuration
//!
//! Configuration for the fact source, the fact store, and how the two are
//! wired together. Values are supplied by the composition layer; nothing
//! here reads the environment or the filesystem.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default remote endpoint
pub const DEFAULT_BASE_URL: &str = "http://numbersapi.com";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NumfactsConfig {
    /// Path to the SQLite database file (durable backend only)
    pub database_path: PathBuf,

    /// Which store backend to use
    pub backend: StorageBackend,

    /// Remote source configuration
    pub source: SourceConfig,

    /// Store configuration
    pub store: StoreConfig,
}

impl Default for NumfactsConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("numfacts.db"),
            backend: StorageBackend::default(),
            source: SourceConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// Store backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite file, survives restarts
    #[default]
    Sqlite,
    /// Process-local, dropped on exit
    Memory,
}

/// Response format requested from the source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// `?json` payloads with `text`, `number`, `found`, and `type`
    #[default]
    Json,
    /// Bare fact text
    Text,
}

/// Category used for random facts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomCategory {
    #[default]
    Math,
    Trivia,
    Date,
    Year,
}

impl RandomCategory {
    /// Path segment for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            RandomCategory::Math => "math",
            RandomCategory::Trivia => "trivia",
            RandomCategory::Date => "date",
            RandomCategory::Year => "year",
        }
    }
}

/// Remote source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base endpoint (default: http://numbersapi.com)
    pub base_url: String,

    /// Connect timeout in milliseconds (default: 15000)
    pub request_timeout_ms: u64,

    /// Total request timeout in milliseconds (default: 20000)
    pub resource_timeout_ms: u64,

    /// Response format (default: json)
    pub format: ResponseFormat,

    /// Category for random facts (default: math)
    pub random_category: RandomCategory,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 15_000,
            resource_timeout_ms: 20_000,
            format: ResponseFormat::default(),
            random_category: RandomCategory::default(),
        }
    }
}

impl SourceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn resource_timeout(&self) -> Duration {
        Duration::from_millis(self.resource_timeout_ms)
    }

    /// Set the base endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set both timeouts
    pub fn with_timeouts(mut self, request: Duration, resource: Duration) -> Self {
        self.request_timeout_ms = request.as_millis() as u64;
        self.resource_timeout_ms = resource.as_millis() as u64;
        self
    }

    /// Set the response format
    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the random fact category
    pub fn with_random_category(mut self, category: RandomCategory) -> Self {
        self.random_category = category;
        self
    }
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of facts kept (default: 100)
    pub capacity: usize,

    /// Number of facts surfaced as history (default: 50)
    pub history_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: crate::store::DEFAULT_CAPACITY,
            history_limit: 50,
        }
    }
}

impl NumfactsConfig {
    /// Create a config with the given database path
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            ..Default::default()
        }
    }

    /// Set the store backend
    pub fn with_backend(mut self, backend: StorageBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Set source configuration
    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.source = source;
        self
    }

    /// Set store configuration
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.source.base_url.trim().is_empty() {
            return Err(ConfigValidationError::MissingBaseUrl);
        }

        if self.source.request_timeout_ms == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "source.request_timeout_ms".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.source.resource_timeout_ms == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "source.resource_timeout_ms".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.store.capacity == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "store.capacity".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.store.history_limit == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "store.history_limit".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.backend == StorageBackend::Sqlite && self.database_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::InvalidValue {
                field: "database_path".into(),
                message: "required for the sqlite backend".into(),
            });
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("source.base_url is required")]
    MissingBaseUrl,

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NumfactsConfig::default();
        assert_eq!(config.source.base_url, "http://numbersapi.com");
        assert_eq!(config.source.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.source.resource_timeout(), Duration::from_secs(20));
        assert_eq!(config.source.format, ResponseFormat::Json);
        assert_eq!(config.source.random_category, RandomCategory::Math);
        assert_eq!(config.store.capacity, 100);
        assert_eq!(config.store.history_limit, 50);
        assert_eq!(config.backend, StorageBackend::Sqlite);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = NumfactsConfig::new("/tmp/facts.db")
            .with_backend(StorageBackend::Memory)
            .with_source(
                SourceConfig::default()
                    .with_base_url("http://localhost:9000")
                    .with_format(ResponseFormat::Text)
                    .with_random_category(RandomCategory::Trivia),
            )
            .with_store(StoreConfig {
                capacity: 3,
                history_limit: 2,
            });

        assert_eq!(config.database_path, PathBuf::from("/tmp/facts.db"));
        assert_eq!(config.backend, StorageBackend::Memory);
        assert_eq!(config.source.base_url, "http://localhost:9000");
        assert_eq!(config.source.random_category.as_str(), "trivia");
        assert_eq!(config.store.capacity, 3);
    }

    #[test]
    fn test_config_validation() {
        let mut config = NumfactsConfig::default();
        config.store.capacity = 0;
        assert!(config.validate().is_err());

        config.store.capacity = 10;
        config.source.base_url = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::MissingBaseUrl)
        ));

        config.source.base_url = DEFAULT_BASE_URL.into();
        config.source.resource_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: NumfactsConfig = serde_json::from_str(
            r#"{ "backend": "memory", "source": { "format": "text" }, "store": { "capacity": 5 } }"#,
        )
        .unwrap();

        assert_eq!(config.backend, StorageBackend::Memory);
        assert_eq!(config.source.format, ResponseFormat::Text);
        assert_eq!(config.source.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.store.capacity, 5);
        assert_eq!(config.store.history_limit, 50);
    }
}
