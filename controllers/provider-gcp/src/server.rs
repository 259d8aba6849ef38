//! Probe and metrics endpoints

use crate::error::ControllerError;
use crate::metrics::Metrics;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Router serving `/healthz`, `/readyz` and `/metrics`
pub fn router(metrics: Metrics) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/readyz", get(|| async { "ok" }))
        .route("/metrics", get(render_metrics))
        .with_state(metrics)
        .layer(TraceLayer::new_for_http())
}

async fn render_metrics(State(metrics): State<Metrics>) -> Result<String, (StatusCode, String)> {
    metrics.render().map_err(|e| {
        error!("Failed to encode metrics: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}

/// Serve the router on `addr` until the process exits
pub async fn serve(addr: SocketAddr, metrics: Metrics) -> Result<(), ControllerError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Serving probes and metrics on {}", addr);
    axum::serve(listener, router(metrics)).await?;
    Ok(())
}
