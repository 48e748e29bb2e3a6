//! HTTP client for the Numbers API.
//!
//! # Usage
//!
//! ```rust,no_run
//! use numfacts_core::source::{FactSource, NumbersApiClient};
//! use numfacts_core::SourceConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = NumbersApiClient::new(SourceConfig::default())?;
//!     let fact = client.fact(42).await?;
//!     println!("{}", fact.text);
//!     Ok(())
//! }
//! ```

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use super::FactSource;
use crate::config::{ResponseFormat, SourceConfig};
use crate::error::SourceError;
use crate::types::Fact;

static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("integer pattern is valid"));

/// JSON payload returned with `?json`
#[derive(Debug, Deserialize)]
struct NumbersPayload {
    text: String,
    number: i64,
    found: bool,
    #[serde(rename = "type")]
    kind: String,
}

/// Fact source backed by the Numbers API
#[derive(Clone)]
pub struct NumbersApiClient {
    client: Client,
    config: SourceConfig,
}

impl NumbersApiClient {
    /// Create a client with the configured endpoint and timeouts.
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .connect_timeout(config.request_timeout())
            .timeout(config.resource_timeout())
            .build()
            .map_err(|e| anyhow::Error::new(e).context("Failed to create HTTP client"))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Build the request URL for a path below the base endpoint.
    fn endpoint(&self, path: &str) -> Result<Url, SourceError> {
        let mut raw = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        if self.config.format == ResponseFormat::Json {
            raw.push_str("?json");
        }

        let url = Url::parse(&raw)
            .map_err(|e| SourceError::InvalidTarget(format!("{}: {}", raw, e)))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(SourceError::InvalidTarget(format!(
                "unsupported scheme '{}' in {}",
                scheme, raw
            ))),
        }
    }

    async fn fetch(&self, path: &str, requested: Option<i64>) -> Result<Fact, SourceError> {
        let url = self.endpoint(path)?;
        debug!(%url, "Requesting fact");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Fact request rejected");
            return Err(SourceError::status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(transport_error)?;

        match self.config.format {
            ResponseFormat::Json => decode_json(&body),
            ResponseFormat::Text => decode_text(&body, requested),
        }
    }
}

#[async_trait]
impl FactSource for NumbersApiClient {
    async fn fact(&self, key: i64) -> Result<Fact, SourceError> {
        self.fetch(&key.to_string(), Some(key)).await
    }

    async fn random_fact(&self) -> Result<Fact, SourceError> {
        let path = format!("random/{}", self.config.random_category.as_str());
        self.fetch(&path, None).await
    }
}

fn transport_error(e: reqwest::Error) -> SourceError {
    if e.is_builder() {
        return SourceError::InvalidTarget(e.to_string());
    }
    if e.is_timeout() {
        warn!("Fact request timed out");
    } else {
        warn!(error = %e, "Fact request failed");
    }
    match e.status() {
        Some(status) => SourceError::status(status.as_u16()),
        None => SourceError::no_response(),
    }
}

fn decode_json(body: &[u8]) -> Result<Fact, SourceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(SourceError::EmptyPayload);
    }

    let payload: NumbersPayload =
        serde_json::from_slice(body).map_err(|e| SourceError::malformed(e.to_string()))?;

    if !payload.found {
        debug!(number = payload.number, kind = %payload.kind, "No fact found");
        return Err(SourceError::EmptyPayload);
    }

    if payload.text.trim().is_empty() {
        return Err(SourceError::EmptyPayload);
    }

    // Stored verbatim: the text is part of the dedup identity
    Ok(Fact::new(payload.number, payload.text))
}

fn decode_text(body: &[u8], requested: Option<i64>) -> Result<Fact, SourceError> {
    let text = std::str::from_utf8(body).map_err(|e| SourceError::malformed(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(SourceError::EmptyPayload);
    }

    let key = match requested {
        Some(key) => key,
        None => first_integer(text)
            .ok_or_else(|| SourceError::malformed("no number in fact text"))?,
    };

    Ok(Fact::new(key, text))
}

/// First run of digits in `text`, if it fits an i64.
fn first_integer(text: &str) -> Option<i64> {
    FIRST_INTEGER
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}
