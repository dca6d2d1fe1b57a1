use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::connector::api::Container;

use super::handlers;

/// Build the HTTP API router.
///
/// Every request is logged once it has been answered; CORS is open to any
/// origin so browser dashboards can call the API directly.
pub fn http_router(container: Arc<Container>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/performance", get(handlers::performance))
        .route("/analyze-sentiment", post(handlers::analyze_sentiment))
        .route("/analyze-bulk", post(handlers::analyze_bulk))
        .route("/aisensy/chat-analysis", post(handlers::chat_analysis))
        .with_state(container)
        .layer(middleware::from_fn(log_http_request))
        .layer(CorsLayer::permissive())
}

/// Bind `addr` and serve the API until the process is stopped.
pub async fn serve(container: Arc<Container>, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(addr = %addr, model = %container.model_name(), "chatsense listening");

    axum::serve(listener, http_router(container))
        .await
        .context("HTTP server terminated")?;
    Ok(())
}

async fn log_http_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;
    let status = response.status();
    info!(
        method = %method,
        uri = %uri,
        status = %status,
        "http request"
    );
    response
}
