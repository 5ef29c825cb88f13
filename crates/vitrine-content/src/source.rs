//! Content backend clients.
//!
//! Both adapters send the same [`ContentQuery`] body. [`DirectSource`] posts
//! it to the backend query API and is meant for privileged (server-side)
//! callers holding the backend configuration. [`RelaySource`] posts it to the
//! site's own query relay, so browser-side callers never see that
//! configuration. Pick one with [`SourceMode`] when wiring things up.

use std::{fmt, str::FromStr, sync::Arc};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use vitrine_core::{Config, ContentConfig, ContentQuery, QueryResult};

use crate::error::{Result, SourceError};

/// A read-only content backend.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Send a query and return the response body verbatim.
    async fn query(&self, query: &ContentQuery) -> Result<Value>;

    /// Send a query and return only its `result` document.
    async fn fetch(&self, query: &ContentQuery) -> Result<Option<Value>> {
        let response = self.query(query).await?;
        Ok(QueryResult::from_response(&response).into_document())
    }

    /// Short adapter name for logs.
    fn name(&self) -> &'static str;
}

/// Which adapter a caller is allowed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    /// Call the backend directly.
    #[default]
    Direct,
    /// Go through the query relay endpoint.
    Relay,
}

impl SourceMode {
    /// Mode for a caller that does or does not hold backend configuration.
    pub fn for_context(privileged: bool) -> Self {
        if privileged { Self::Direct } else { Self::Relay }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Relay => f.write_str("relay"),
        }
    }
}

impl FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "relay" => Ok(Self::Relay),
            other => Err(format!("unknown source mode: {other}")),
        }
    }
}

/// Build the adapter for `mode` from resolved configuration.
pub fn build_source(config: &Config, mode: SourceMode) -> Arc<dyn ContentSource> {
    match mode {
        SourceMode::Direct => Arc::new(DirectSource::new(&config.content)),
        SourceMode::Relay => Arc::new(RelaySource::new(config.relay.url.clone())),
    }
}

/// Calls the backend query API.
#[derive(Debug, Clone)]
pub struct DirectSource {
    client: Client,
    url: String,
}

impl DirectSource {
    /// Create a client for the configured project and dataset.
    pub fn new(config: &ContentConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a client reusing an existing HTTP client.
    pub fn with_client(client: Client, config: &ContentConfig) -> Self {
        Self {
            client,
            url: config.query_url(),
        }
    }

    /// Query endpoint this source posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ContentSource for DirectSource {
    async fn query(&self, query: &ContentQuery) -> Result<Value> {
        post_query(&self.client, &self.url, query).await
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}

/// Calls the site's query relay endpoint.
#[derive(Debug, Clone)]
pub struct RelaySource {
    client: Client,
    url: String,
}

impl RelaySource {
    /// Create a client for the relay at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    /// Create a client reusing an existing HTTP client.
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Relay endpoint this source posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ContentSource for RelaySource {
    async fn query(&self, query: &ContentQuery) -> Result<Value> {
        post_query(&self.client, &self.url, query).await
    }

    fn name(&self) -> &'static str {
        "relay"
    }
}

async fn post_query(client: &Client, url: &str, query: &ContentQuery) -> Result<Value> {
    query.validate()?;
    debug!(url, params = query.params.len(), "posting content query");

    let response = client.post(url).json(query).send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Status {
            status: status.as_u16(),
            message: upstream_message(status.as_u16(), &body),
        });
    }

    response.json::<Value>().await.map_err(SourceError::Decode)
}

/// Pull a human-readable message out of an error body.
///
/// Understands the backend's `{"error": {"description"}}` shape and the
/// relay's `{"message"}` shape, falling back to the raw body.
fn upstream_message(status: u16, body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let described = parsed.as_ref().and_then(|value| {
        value
            .pointer("/error/description")
            .or_else(|| value.get("message"))
            .or_else(|| value.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    match described {
        Some(message) if !message.is_empty() => message,
        _ if !body.trim().is_empty() => format!("upstream responded with {status}: {}", body.trim()),
        _ => format!("upstream responded with {status}"),
    }
}
