//! Development proxy: sends the bare root to the reading list and answers
//! the `HEAD /list` readiness probe used by end-to-end runs.

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::routing::{get, head};
use axum::Router;
use std::net::SocketAddr;
use tracing::{info, warn};

pub fn router() -> Router {
    Router::new()
        .route(
            "/",
            get(|| async { (StatusCode::FOUND, [(header::LOCATION, "/list")]) }),
        )
        .route("/list", head(|| async { StatusCode::OK }))
}

pub async fn serve(addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "dev proxy listening");
    axum::serve(listener, router())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "ctrl-c handler unavailable, shutting down dev proxy");
            }
        })
        .await?;
    Ok(())
}
