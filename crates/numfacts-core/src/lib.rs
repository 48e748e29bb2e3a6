//! numfacts-core - Core library for numfacts
//!
//! This crate provides everything below the CLI:
//!
//! - **types**: The `Fact` record
//! - **source**: Remote fact source contract and the Numbers API client
//! - **store**: Bounded, deduplicated, recency-ordered fact history (SQLite and in-memory)
//! - **orchestrator**: Single-flight fetch coordination and observable state
//! - **config**: Source, store, and backend configuration
//! - **app**: Composition root wiring the pieces together

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod source;
pub mod store;
pub mod types;

#[cfg(all(feature = "client", feature = "db"))]
pub mod app;

// Re-export commonly used types
#[cfg(all(feature = "client", feature = "db"))]
pub use app::App;
pub use config::{NumfactsConfig, SourceConfig, StorageBackend, StoreConfig};
pub use error::{Error, Result, SourceError, StoreError};
pub use orchestrator::{FactState, FetchOrchestrator, FetchOutcome};
pub use source::FactSource;
pub use store::{FactStore, InMemoryFactStore};
pub use types::Fact;
