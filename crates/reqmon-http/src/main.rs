//! reqmon demo server
//!
//! - Routes: `/`, `/health` (skipped by the measurements), `/slow`
//! - Scrape endpoint: `/metrics` (configurable)
//! - Config: `reqmon.yaml` when present, otherwise the built-in defaults
//! - A custom `custom_func` counter shows how to attach caller-defined metrics

use std::net::SocketAddr;

use axum::{extract::Request, middleware::Next};
use tracing_subscriber::{fmt, EnvFilter};

use reqmon_core::{CounterVec, Opts};
use reqmon_http::{config, middleware_fn, router, Metric, Monitor, MonitorBuilder, SkipPaths};

const CONFIG_PATH: &str = "reqmon.yaml";

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_or_default(CONFIG_PATH).expect("config load failed");
    let listen: SocketAddr = std::env::var("REQMON_LISTEN")
        .unwrap_or_else(|_| cfg.listen.clone())
        .parse()
        .expect("listen must be a valid SocketAddr");

    let monitor: Monitor = MonitorBuilder::from_config(cfg.monitor.clone())
        .with_custom_fn(custom_metric)
        .build()
        .expect("monitor build failed");

    let app = router::build_router(&monitor, &cfg.metrics_path);

    tracing::info!(%listen, metrics_path = %cfg.metrics_path, "reqmon demo starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}

/// Counts requests by path and method, honouring the configured skip paths.
fn custom_metric(skip: &SkipPaths) -> reqmon_core::Result<Metric> {
    let vec = CounterVec::new(
        Opts::new("custom_func", "Custom metric desc.").labels(&["uri", "method"]),
    )?;

    let skip = skip.clone();
    let counter = vec.clone();
    let mw = middleware_fn(move |request: Request, next: Next| {
        let skip = skip.clone();
        let counter = counter.clone();
        async move {
            let path = request.uri().path().to_owned();
            let method = request.method().as_str().to_owned();
            let response = next.run(request).await;
            if !skip.contains(&path) {
                counter.inc(&[path.as_str(), method.as_str()]);
            }
            response
        }
    });

    Ok(Metric::new("custom_func", vec).with_shared_middleware(mw))
}
