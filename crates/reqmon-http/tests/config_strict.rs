#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use reqmon_http::{config, Monitor};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
monitor:
  request_total: true
  slow_request: { threshold_msec: 100 } # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.listen, "0.0.0.0:8080");
    assert_eq!(cfg.metrics_path, "/metrics");
    assert_eq!(cfg.monitor, config::MonitorConfig::default());
}

#[test]
fn unsupported_version_rejected() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
}

#[test]
fn full_config_builds_monitor() {
    let yaml = r#"
version: 1
listen: "127.0.0.1:9000"
monitor:
  skip_paths: ["/health", "/ready"]
  request_total: true
  request_duration:
    buckets: [0.05, 0.5, 5]
  slow_request:
    threshold_ms: 1500
  runtime: true
"#;
    let cfg = config::load_from_str(yaml).expect("must parse");
    let slow = cfg.monitor.slow_request.clone().expect("slow_request set");
    assert_eq!(slow.threshold(), Some(Duration::from_millis(1500)));

    let monitor = Monitor::from_config(cfg.monitor).expect("must build");
    assert_eq!(
        monitor.names(),
        ["request_total", "request_duration", "slow_request_total", "runtime"].map(String::from)
    );
    assert_eq!(monitor.middlewares().len(), 3);
    assert_eq!(
        monitor.histogram_vec("request_duration").unwrap().upper_bounds(),
        [0.05, 0.5, 5.0]
    );
    assert!(monitor.skip_paths().contains("/ready"));
}

#[test]
fn non_positive_threshold_falls_back_to_default() {
    let yaml = r#"
version: 1
monitor:
  slow_request: { threshold_ms: -20 }
"#;
    let cfg = config::load_from_str(yaml).expect("must parse");
    assert_eq!(cfg.monitor.slow_request.as_ref().unwrap().threshold(), None);

    let monitor = Monitor::from_config(cfg.monitor).expect("must build");
    let slow_vec = monitor.counter_vec("slow_request_total").unwrap();
    let help = &slow_vec.desc().help;
    assert!(help.contains("t=5s"));
}

#[test]
fn empty_bucket_list_selects_defaults() {
    let yaml = r#"
version: 1
monitor:
  request_duration: {}
"#;
    let cfg = config::load_from_str(yaml).expect("must parse");
    let monitor = Monitor::from_config(cfg.monitor).expect("must build");
    assert_eq!(
        monitor.histogram_vec("request_duration").unwrap().upper_bounds(),
        reqmon_core::DEFAULT_DURATION_BUCKETS
    );
}

#[test]
fn relative_skip_path_rejected() {
    let yaml = r#"
version: 1
monitor:
  skip_paths: ["health"]
"#;
    let err = config::load_from_str(yaml).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
}

#[test]
fn infinite_bucket_bound_rejected() {
    let yaml = r#"
version: 1
monitor:
  request_duration: { buckets: [1.0, .inf] }
"#;
    let err = config::load_from_str(yaml).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
}

#[test]
fn builder_rejects_inf_only_buckets() {
    let err = Monitor::builder()
        .with_request_duration(Some(vec![f64::INFINITY]))
        .build()
        .expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
}

#[test]
fn missing_file_handling() {
    let path = "definitely/not/here/reqmon.yaml";

    let err = config::load_from_file(path).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
    assert!(err.to_string().contains("not found"));

    let cfg = config::load_or_default(path).expect("defaults");
    assert_eq!(cfg, config::ServerConfig::default());
}
