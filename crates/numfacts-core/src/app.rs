//! Composition root
//!
//! Builds the source, the store, and the orchestrator from a
//! [`NumfactsConfig`] and hands out shared references to them.

use std::sync::Arc;

use tracing::info;

use crate::config::{NumfactsConfig, StorageBackend};
use crate::orchestrator::FetchOrchestrator;
use crate::source::{FactSource, NumbersApiClient};
use crate::store::{FactStore, InMemoryFactStore, SqliteFactStore};
use crate::Result;

/// Wired-up application
///
/// # Example
///
/// ```rust,no_run
/// use numfacts_core::{App, NumfactsConfig};
///
/// async fn example() -> anyhow::Result<()> {
///     let app = App::build(NumfactsConfig::new("facts.db"))?;
///     app.orchestrator().on_appear().await;
///     app.orchestrator().get_fact(42).await;
///     Ok(())
/// }
/// ```
pub struct App {
    config: NumfactsConfig,
    store: Arc<dyn FactStore>,
    orchestrator: FetchOrchestrator,
}

impl App {
    /// Build an app from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - The HTTP client cannot be created
    /// - The database cannot be opened or migrated
    ///
    /// The memory backend spawns a worker task, so this must run inside a
    /// tokio runtime.
    pub fn build(config: NumfactsConfig) -> Result<Self> {
        config.validate()?;

        let source: Arc<dyn FactSource> = Arc::new(NumbersApiClient::new(config.source.clone())?);

        let store: Arc<dyn FactStore> = match config.backend {
            StorageBackend::Sqlite => {
                if let Some(parent) = config.database_path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                Arc::new(SqliteFactStore::open(
                    &config.database_path,
                    config.store.capacity,
                )?)
            }
            StorageBackend::Memory => Arc::new(InMemoryFactStore::new(config.store.capacity)),
        };

        info!(
            backend = ?config.backend,
            base_url = %config.source.base_url,
            capacity = config.store.capacity,
            "numfacts initialized"
        );

        Ok(Self::with_parts(config, source, store))
    }

    /// Assemble an app from already-built parts.
    pub fn with_parts(
        config: NumfactsConfig,
        source: Arc<dyn FactSource>,
        store: Arc<dyn FactStore>,
    ) -> Self {
        let orchestrator = FetchOrchestrator::new(source, store.clone(), config.store.history_limit);
        Self {
            config,
            store,
            orchestrator,
        }
    }

    pub fn orchestrator(&self) -> &FetchOrchestrator {
        &self.orchestrator
    }

    pub fn store(&self) -> &Arc<dyn FactStore> {
        &self.store
    }

    pub fn config(&self) -> &NumfactsConfig {
        &self.config
    }
}
