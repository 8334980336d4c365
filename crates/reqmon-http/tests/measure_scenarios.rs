//! End-to-end request scenarios through an instrumented axum router.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use tower::ServiceExt;

use reqmon_core::DEFAULT_DURATION_BUCKETS;
use reqmon_http::Monitor;

async fn send(app: &Router, method: &str, uri: &str) -> StatusCode {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
}

async fn body_of(app: &Router, uri: &str) -> String {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn request_total_counts_path_method_status() {
    let monitor = Monitor::builder().with_request_total().build().unwrap();
    let app = monitor.instrument(Router::new().route("/foo", get(|| async { StatusCode::OK })));

    assert_eq!(send(&app, "GET", "/foo").await, StatusCode::OK);

    let vec = monitor.counter_vec("request_total").unwrap();
    assert_eq!(vec.get(&["/foo", "GET", "200"]), Some(1));
    assert_eq!(monitor.names(), ["request_total".to_string()]);

    let text = monitor.render();
    assert!(text.contains("request_total{uri=\"/foo\",method=\"GET\",status_code=\"200\"} 1\n"));
    assert_eq!(text.matches("# TYPE").count(), 1);
}

#[tokio::test]
async fn status_from_handler_is_recorded() {
    let monitor = Monitor::builder().with_request_total().build().unwrap();
    let app = monitor.instrument(
        Router::new()
            .route("/boom", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/gone", get(|| async { (StatusCode::NOT_FOUND, "nope") }))
            .route("/plain", get(|| async { "no explicit status" })),
    );

    send(&app, "GET", "/boom").await;
    send(&app, "GET", "/gone").await;
    send(&app, "GET", "/plain").await;

    let vec = monitor.counter_vec("request_total").unwrap();
    assert_eq!(vec.get(&["/boom", "GET", "500"]), Some(1));
    assert_eq!(vec.get(&["/gone", "GET", "404"]), Some(1));
    assert_eq!(vec.get(&["/plain", "GET", "200"]), Some(1));
}

#[tokio::test]
async fn skipped_paths_call_inner_handler_without_recording() {
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);

    let monitor = Monitor::builder()
        .skip_paths(["/health"])
        .with_basic()
        .build()
        .unwrap();
    let app = monitor.instrument(Router::new().route(
        "/health",
        get(move || {
            let h = Arc::clone(&h);
            async move {
                h.fetch_add(1, Ordering::SeqCst);
                "ok"
            }
        }),
    ));

    assert_eq!(send(&app, "GET", "/health").await, StatusCode::OK);
    assert_eq!(send(&app, "GET", "/health").await, StatusCode::OK);

    assert_eq!(hits.load(Ordering::SeqCst), 2);
    let total = monitor.counter_vec("request_total").unwrap();
    assert_eq!(total.get(&["/health", "GET", "200"]), None);
    assert!(monitor.histogram_vec("request_duration").unwrap().get(&["/health"]).is_none());
    assert_eq!(monitor.counter_vec("slow_request_total").unwrap().series_count(), 0);
    assert_eq!(monitor.render(), "");
}

#[tokio::test]
async fn skip_paths_match_exactly() {
    let monitor = Monitor::builder()
        .skip_paths(["/health"])
        .with_request_total()
        .build()
        .unwrap();
    let app = monitor.instrument(
        Router::new()
            .route("/health/deep", get(|| async { "ok" }))
            .route("/healthz", get(|| async { "ok" })),
    );

    send(&app, "GET", "/health/deep").await;
    send(&app, "GET", "/healthz").await;

    let vec = monitor.counter_vec("request_total").unwrap();
    assert_eq!(vec.get(&["/health/deep", "GET", "200"]), Some(1));
    assert_eq!(vec.get(&["/healthz", "GET", "200"]), Some(1));
}

#[tokio::test]
async fn request_duration_observes_each_request() {
    let monitor = Monitor::builder()
        .with_request_duration(None)
        .build()
        .unwrap();
    let app = monitor.instrument(Router::new().route("/foo", get(|| async { "ok" })));

    send(&app, "GET", "/foo").await;
    send(&app, "POST", "/foo").await;

    let vec = monitor.histogram_vec("request_duration").unwrap();
    assert_eq!(vec.upper_bounds(), DEFAULT_DURATION_BUCKETS);
    let h = vec.get(&["/foo"]).unwrap();
    assert_eq!(h.count(), 2);
    // Both requests are far below the smallest bucket.
    assert_eq!(h.buckets()[0], (0.1, 2));

    let text = monitor.render();
    assert!(text.contains("request_duration_bucket{uri=\"/foo\",le=\"+Inf\"} 2\n"));
    assert!(text.contains("request_duration_count{uri=\"/foo\"} 2\n"));
}

#[tokio::test]
async fn request_duration_uses_explicit_buckets() {
    let monitor = Monitor::builder()
        .with_request_duration(Some(vec![0.01, 0.5]))
        .build()
        .unwrap();
    assert_eq!(
        monitor.histogram_vec("request_duration").unwrap().upper_bounds(),
        [0.01, 0.5]
    );

    let empty = Monitor::builder()
        .with_request_duration(Some(Vec::new()))
        .build()
        .unwrap();
    assert_eq!(
        empty.histogram_vec("request_duration").unwrap().upper_bounds(),
        DEFAULT_DURATION_BUCKETS
    );
}

#[tokio::test]
async fn slow_request_counts_only_above_threshold() {
    let monitor = Monitor::builder()
        .with_slow_request(Some(Duration::from_secs(1)))
        .build()
        .unwrap();
    let app = monitor.instrument(
        Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    StatusCode::INTERNAL_SERVER_ERROR
                }),
            )
            .route("/fast", get(|| async { StatusCode::INTERNAL_SERVER_ERROR })),
    );

    assert_eq!(send(&app, "GET", "/slow").await, StatusCode::INTERNAL_SERVER_ERROR);
    send(&app, "GET", "/fast").await;

    let vec = monitor.counter_vec("slow_request_total").unwrap();
    assert_eq!(vec.get(&["/slow", "GET", "500"]), Some(1));
    assert_eq!(vec.get(&["/fast", "GET", "500"]), None);
    assert!(monitor
        .render()
        .contains("slow_request_total{uri=\"/slow\",method=\"GET\",code=\"500\"} 1\n"));
}

#[tokio::test]
async fn zero_threshold_behaves_like_five_seconds() {
    let monitor = Monitor::builder()
        .with_slow_request(Some(Duration::ZERO))
        .build()
        .unwrap();
    let app = monitor.instrument(Router::new().route(
        "/medium",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            "ok"
        }),
    ));

    send(&app, "GET", "/medium").await;

    let vec = monitor.counter_vec("slow_request_total").unwrap();
    assert_eq!(vec.series_count(), 0);
    assert!(vec.desc().help.contains("t=5s"));
}

#[tokio::test]
async fn scrape_is_stable_without_traffic() {
    let monitor = Monitor::builder()
        .with_basic()
        .with_runtime()
        .build()
        .unwrap();
    let app = monitor
        .instrument(Router::new().route("/foo", get(|| async { "ok" })))
        .route("/metrics", monitor.scrape_handler());

    send(&app, "GET", "/foo").await;
    send(&app, "PUT", "/foo").await;

    let first = body_of(&app, "/metrics").await;
    let second = body_of(&app, "/metrics").await;
    assert!(first.contains("request_total{uri=\"/foo\",method=\"GET\",status_code=\"200\"} 1\n"));
    // Runtime gauges may move between scrapes; compare the request families only.
    let requests = |s: &str| {
        s.lines()
            .filter(|l| l.contains("request"))
            .map(str::to_owned)
            .collect::<Vec<_>>()
    };
    assert_eq!(requests(&first), requests(&second));
    // The scrape endpoint itself is not instrumented.
    assert!(!first.contains("uri=\"/metrics\""));
}

#[tokio::test]
async fn scrape_is_byte_identical_for_request_metrics() {
    let monitor = Monitor::builder().with_basic().build().unwrap();
    let app = monitor
        .instrument(Router::new().route("/foo", get(|| async { "ok" })))
        .route("/metrics", monitor.scrape_handler());

    send(&app, "GET", "/foo").await;

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()["content-type"],
        "text/plain; version=0.0.4; charset=utf-8"
    );

    let first = body_of(&app, "/metrics").await;
    let second = body_of(&app, "/metrics").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn runtime_and_process_collectors_are_exported() {
    let monitor = Monitor::builder()
        .with_runtime()
        .with_process()
        .build()
        .unwrap();

    assert!(monitor.middlewares().is_empty());
    let text = monitor.render();
    assert!(text.contains("# TYPE runtime_workers gauge\n"));
    assert!(text.contains("runtime_workers 1\n"));
    if cfg!(target_os = "linux") {
        assert!(text.contains("process_resident_memory_bytes "));
    }
}
