//! Serve command - query relay and SVG proxy

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use tokio::net::TcpListener;

use crate::server::{AppState, PROXY_ROUTE, QUERY_ROUTE, create_router};

/// Run the serve command.
pub async fn run(config_path: &Path, port: Option<u16>) -> Result<()> {
    let mut config = super::load_config(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    tracing::info!(?config_path, addr = %config.server.addr(), "Starting server");

    let app = create_router(AppState::new(&config));
    let addr = config.server.addr();

    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Relay:  http://{addr}{QUERY_ROUTE}");
    println!("  Proxy:  http://{addr}{PROXY_ROUTE}?url=<svg url>");
    println!("  Backend: {}", config.content.query_url());
    println!("  Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
