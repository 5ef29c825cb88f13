//! Content sources against an in-process mock backend.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use vitrine_content::{
    ContentSource, DirectSource, PageSlug, RelaySource, SettingsResolver, SourceError, SourceMode,
};
use vitrine_core::{Config, ContentConfig, ContentQuery};

#[derive(Clone, Default)]
struct Backend {
    hits: Arc<AtomicUsize>,
}

async fn query_handler(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    backend.hits.fetch_add(1, Ordering::SeqCst);

    let query = body["query"].as_str().unwrap_or_default();
    if query.contains("siteSettings") {
        return Json(json!({
            "ms": 2,
            "query": query,
            "result": {"title": "Mock Studio", "copyright": "© [year] Mock"}
        }))
        .into_response();
    }
    if query.contains("$slug") {
        let slug = body["params"]["slug"].as_str().unwrap_or_default();
        return Json(json!({"result": {"textColor": format!("#{slug}")}})).into_response();
    }
    if query.contains("broken") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"description": "unexpected token"}})),
        )
            .into_response();
    }
    Json(json!({"result": null})).into_response()
}

async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/v2021-10-21/data/query/production", post(query_handler))
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    (format!("http://{addr}"), backend)
}

fn content_config(endpoint: &str) -> ContentConfig {
    ContentConfig {
        endpoint: Some(endpoint.to_string()),
        ..ContentConfig::default()
    }
}

#[tokio::test]
async fn test_direct_source_returns_response_verbatim() {
    let (endpoint, _) = spawn_backend().await;
    let source = DirectSource::new(&content_config(&endpoint));

    let response = source
        .query(&ContentQuery::new("*[_type == \"siteSettings\"][0]"))
        .await
        .expect("query");
    assert_eq!(response["ms"], 2);
    assert_eq!(response["result"]["title"], "Mock Studio");
}

#[tokio::test]
async fn test_direct_source_sends_params() {
    let (endpoint, _) = spawn_backend().await;
    let source = DirectSource::new(&content_config(&endpoint));

    let doc = source
        .fetch(&PageSlug::Slug("fff000".to_string()).query())
        .await
        .expect("fetch");
    assert_eq!(doc, Some(json!({"textColor": "#fff000"})));
}

#[tokio::test]
async fn test_null_result_is_none() {
    let (endpoint, _) = spawn_backend().await;
    let source = DirectSource::new(&content_config(&endpoint));

    let doc = source
        .fetch(&ContentQuery::new("*[_type == \"nothing\"][0]"))
        .await
        .expect("fetch");
    assert_eq!(doc, None);
}

#[tokio::test]
async fn test_backend_error_surfaces_description() {
    let (endpoint, _) = spawn_backend().await;
    let source = DirectSource::new(&content_config(&endpoint));

    let err = source
        .query(&ContentQuery::new("broken"))
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Status { status: 400, .. }));
    assert_eq!(err.to_string(), "unexpected token");
}

#[tokio::test]
async fn test_unreachable_backend_is_http_error() {
    let (endpoint, _) = spawn_backend().await;
    let source = RelaySource::new(format!("{endpoint}/missing-route"));

    let err = source.query(&ContentQuery::new("*")).await.unwrap_err();
    assert_eq!(err.status(), Some(404));

    let source = DirectSource::new(&content_config("http://127.0.0.1:1"));
    let err = source.query(&ContentQuery::new("*")).await.unwrap_err();
    assert!(matches!(err, SourceError::Http(_)));
}

#[tokio::test]
async fn test_resolver_over_direct_source() {
    let (endpoint, backend) = spawn_backend().await;
    let config = Config {
        content: content_config(&endpoint),
        ..Config::default()
    };
    let resolver = SettingsResolver::for_mode(&config, SourceMode::Direct);

    let settings = resolver.site_settings().await;
    assert_eq!(settings.title(), "Mock Studio");
    assert_eq!(settings.copyright_for_year(2025), "© 2025 Mock");
    assert_eq!(settings.max_width(), "1800px");

    resolver.site_settings().await;
    assert_eq!(backend.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_resolver_swallows_relay_failure() {
    let config = Config {
        relay: vitrine_core::RelayConfig {
            url: "http://127.0.0.1:1/api/sanity/query".to_string(),
        },
        ..Config::default()
    };
    let resolver = SettingsResolver::for_mode(&config, SourceMode::Relay);

    let settings = resolver.site_settings().await;
    assert!(!settings.is_loaded());
    assert_eq!(settings.title(), "JF Design Office");

    let page = resolver.page_settings(Some(&PageSlug::Home)).await;
    assert_eq!(page.background_color(), "#ffffff");
}
