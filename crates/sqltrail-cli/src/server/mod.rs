//! HTTP server module for serve mode.
//!
//! Exposes the extraction engine over a small REST API so graph consumers
//! (a rendering layer, a JSON viewer) can fetch lineage without embedding
//! the engine. The engine is synchronous and cheap, so handlers run it
//! inline.

pub mod api;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

/// Run the HTTP server.
///
/// This function blocks until the server is shut down (e.g., via Ctrl+C).
pub async fn run_server(port: u16) -> Result<()> {
    let app = build_router();
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    println!("sqltrail: server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("\nsqltrail: server stopped");
    Ok(())
}

/// Build the router with all endpoints.
pub fn build_router() -> Router {
    Router::new()
        .route("/parse", post(api::parse))
        .route("/health", get(api::health))
        .layer(CorsLayer::permissive())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}
