//! Remote fact sources.
//!
//! A `FactSource` is stateless: each call either produces a fresh `Fact`
//! or fails with a [`SourceError`]. Timeouts are the implementation's
//! responsibility and surface as `SourceError::TransportFailure`.

#[cfg(feature = "client")]
mod client;

#[cfg(feature = "client")]
pub use client::NumbersApiClient;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::types::Fact;

/// Contract for anything that can produce facts about numbers.
#[async_trait]
pub trait FactSource: Send + Sync {
    /// Fetch a fact about `key`.
    async fn fact(&self, key: i64) -> Result<Fact, SourceError>;

    /// Fetch a fact about a number of the source's choosing.
    async fn random_fact(&self) -> Result<Fact, SourceError>;
}
