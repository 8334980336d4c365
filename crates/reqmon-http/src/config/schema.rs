use std::time::Duration;

use serde::Deserialize;
use reqmon_core::{MonitorError, Result};

/// Which measurements a monitor attaches.
///
/// Every field defaults to "off". Skip paths are part of the config itself,
/// so they are always known before any built-in measurement is constructed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Exact request paths that bypass every built-in measurement.
    #[serde(default)]
    pub skip_paths: Vec<String>,

    /// request_total, request_duration and slow_request_total with defaults.
    #[serde(default)]
    pub basic: bool,

    #[serde(default)]
    pub request_total: bool,

    #[serde(default)]
    pub request_duration: Option<RequestDurationConfig>,

    #[serde(default)]
    pub slow_request: Option<SlowRequestConfig>,

    /// Async runtime gauges.
    #[serde(default)]
    pub runtime: bool,

    /// Process memory/CPU gauges.
    #[serde(default)]
    pub process: bool,
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<()> {
        for p in &self.skip_paths {
            if !p.starts_with('/') {
                return Err(MonitorError::InvalidConfig(format!(
                    "skip_paths entry must start with '/': {p:?}"
                )));
            }
        }
        if let Some(d) = &self.request_duration {
            d.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestDurationConfig {
    /// Bucket upper bounds in seconds. Empty selects the defaults.
    #[serde(default)]
    pub buckets: Vec<f64>,
}

impl RequestDurationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.buckets.iter().any(|b| !b.is_finite()) {
            return Err(MonitorError::InvalidConfig(
                "request_duration.buckets must be finite (+Inf is implicit)".into(),
            ));
        }
        if self.buckets.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MonitorError::InvalidConfig(
                "request_duration.buckets must be strictly increasing".into(),
            ));
        }
        Ok(())
    }

    pub fn buckets(&self) -> Option<&[f64]> {
        if self.buckets.is_empty() {
            None
        } else {
            Some(&self.buckets)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlowRequestConfig {
    /// Zero or negative selects the 5s default.
    #[serde(default)]
    pub threshold_ms: i64,
}

impl SlowRequestConfig {
    pub fn from_threshold(threshold: Option<Duration>) -> Self {
        let threshold_ms = threshold
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        Self { threshold_ms }
    }

    pub fn threshold(&self) -> Option<Duration> {
        u64::try_from(self.threshold_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

/// File layout read by the demo server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,

    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MonitorError::InvalidConfig(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        if !self.metrics_path.starts_with('/') {
            return Err(MonitorError::InvalidConfig(
                "metrics_path must start with '/'".into(),
            ));
        }
        self.monitor.validate()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            listen: default_listen(),
            metrics_path: default_metrics_path(),
            monitor: MonitorConfig {
                skip_paths: vec!["/health".into()],
                basic: true,
                runtime: true,
                process: true,
                ..MonitorConfig::default()
            },
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_metrics_path() -> String {
    "/metrics".into()
}
