//! Query relay and SVG proxy endpoints.
//!
//! The relay lets browser-side code query the content backend without
//! holding its configuration. The proxy re-serves SVGs from allow-listed
//! hosts so they can be inlined without cross-origin restrictions.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use vitrine_content::{ContentSource, DirectSource};
use vitrine_core::{Config, ContentQuery, ProxyConfig, query::QUERY_REQUIRED};

/// Relay route.
pub const QUERY_ROUTE: &str = "/api/sanity/query";

/// SVG proxy route.
pub const PROXY_ROUTE: &str = "/api/proxy-svg";

const SVG_CONTENT_TYPE: &str = "image/svg+xml; charset=utf-8";
const RELAY_FALLBACK_MESSAGE: &str = "Failed to query Sanity";
const PROXY_FALLBACK_MESSAGE: &str = "Proxy failed";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Backend used by the relay. Always the direct adapter.
    pub source: Arc<dyn ContentSource>,
    /// Client for proxied fetches.
    pub http: reqwest::Client,
    pub proxy: Arc<ProxyConfig>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::new();
        Self {
            source: Arc::new(DirectSource::with_client(http.clone(), &config.content)),
            http,
            proxy: Arc::new(config.proxy.clone()),
        }
    }
}

/// Errors returned to relay and proxy callers.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Malformed request.
    #[error("{0}")]
    BadRequest(String),

    /// The upstream call failed.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },
}

impl RelayError {
    fn upstream(status: StatusCode, message: String, fallback: &str) -> Self {
        let message = if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        };
        Self::Upstream { status, message }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => *status,
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            status_code: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(QUERY_ROUTE, post(query_handler))
        .route(PROXY_ROUTE, get(proxy_svg_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn query_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, RelayError> {
    let query = relay_query(&body)?;

    match state.source.query(&query).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            tracing::error!(error = %err, "content query failed");
            Err(RelayError::upstream(
                StatusCode::INTERNAL_SERVER_ERROR,
                err.to_string(),
                RELAY_FALLBACK_MESSAGE,
            ))
        }
    }
}

/// Read a relay body into a query.
///
/// Only `query` is required. Malformed `params` are dropped, and a body that
/// is not JSON at all reads as one without a query.
pub fn relay_query(body: &[u8]) -> Result<ContentQuery, RelayError> {
    let body: Value = serde_json::from_slice(body).unwrap_or(Value::Null);

    let query = body
        .get("query")
        .and_then(Value::as_str)
        .filter(|query| !query.trim().is_empty())
        .ok_or_else(|| RelayError::BadRequest(QUERY_REQUIRED.to_string()))?;
    let params = body
        .get("params")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    Ok(ContentQuery {
        query: query.to_string(),
        params,
    })
}

/// Validate a proxy target against the allow-list.
pub fn proxy_target(raw: Option<&str>, proxy: &ProxyConfig) -> Result<Url, RelayError> {
    let raw = raw
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| RelayError::BadRequest("Missing url".to_string()))?;
    let url = Url::parse(raw).map_err(|_| RelayError::BadRequest("Invalid url".to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| RelayError::BadRequest("Invalid url".to_string()))?;

    if !proxy.is_allowed(host) {
        tracing::warn!(host, "proxy target rejected");
        return Err(RelayError::BadRequest("Host not allowed".to_string()));
    }
    Ok(url)
}

async fn proxy_svg_handler(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, RelayError> {
    // A repeated `url` uses its first value.
    let raw = params
        .iter()
        .find(|(name, _)| name == "url")
        .map(|(_, value)| value.as_str());
    let url = proxy_target(raw, &state.proxy)?;

    let upstream = state.http.get(url.clone()).send().await.map_err(|err| {
        tracing::error!(%url, error = %err, "proxy fetch failed");
        RelayError::upstream(
            StatusCode::INTERNAL_SERVER_ERROR,
            err.to_string(),
            PROXY_FALLBACK_MESSAGE,
        )
    })?;

    let status = upstream.status();
    if !status.is_success() {
        tracing::debug!(%url, status = status.as_u16(), "proxy upstream error");
        return Err(RelayError::Upstream {
            status,
            message: format!("Upstream error {}", status.as_u16()),
        });
    }

    let cache_control = HeaderValue::from_str(&state.proxy.cache_control)
        .unwrap_or_else(|_| HeaderValue::from_static("no-cache"));

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(SVG_CONTENT_TYPE)),
            (header::CACHE_CONTROL, cache_control),
            (
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ),
        ],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response())
}
