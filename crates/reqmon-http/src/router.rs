//! Axum router wiring for the demo server.
//!
//! Application routes are instrumented with the monitor's chain; the scrape
//! endpoint is mounted afterwards so scraping never shows up in the request
//! metrics.

use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};

use crate::monitor::Monitor;

pub fn build_router(monitor: &Monitor, metrics_path: &str) -> Router {
    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/slow", get(slow));

    monitor
        .instrument(app)
        .route(metrics_path, monitor.scrape_handler())
}

async fn index() -> StatusCode {
    StatusCode::OK
}

async fn health() -> &'static str {
    "ok"
}

async fn slow() -> StatusCode {
    tokio::time::sleep(Duration::from_secs(6)).await;
    StatusCode::OK
}
