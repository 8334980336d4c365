use std::time::Duration;

use reqmon_core::Result;

use crate::config::{MonitorConfig, RequestDurationConfig, SlowRequestConfig};
use crate::measure;
use crate::metric::Metric;
use crate::middleware::SkipPaths;
use crate::telemetry;

use super::Monitor;

type MetricFn = Box<dyn FnOnce(&SkipPaths) -> Result<Metric> + Send>;

enum Custom {
    Ready(Metric),
    Deferred(MetricFn),
}

/// Collects a [`MonitorConfig`] and custom descriptors, then builds the
/// [`Monitor`].
///
/// Descriptors are offered in a fixed order regardless of the order the
/// builder methods were called in:
/// 1. the `basic` bundle (slow_request_total, request_duration, request_total)
/// 2. request_total
/// 3. request_duration
/// 4. slow_request_total
/// 5. runtime, then process
/// 6. custom descriptors, in the order they were added
///
/// The first descriptor offered under a name wins, so `basic` combined with an
/// explicit `with_request_duration(Some(..))` keeps the default buckets.
#[derive(Default)]
pub struct MonitorBuilder {
    config: MonitorConfig,
    custom: Vec<Custom>,
}

impl MonitorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: MonitorConfig) -> Self {
        Self {
            config,
            custom: Vec::new(),
        }
    }

    pub fn skip_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.config.skip_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_basic(mut self) -> Self {
        self.config.basic = true;
        self
    }

    pub fn with_request_total(mut self) -> Self {
        self.config.request_total = true;
        self
    }

    /// `None` or an empty vector selects the default buckets.
    pub fn with_request_duration(mut self, buckets: Option<Vec<f64>>) -> Self {
        self.config.request_duration = Some(RequestDurationConfig {
            buckets: buckets.unwrap_or_default(),
        });
        self
    }

    /// `None` or a zero duration selects the 5s default.
    pub fn with_slow_request(mut self, threshold: Option<Duration>) -> Self {
        self.config.slow_request = Some(SlowRequestConfig::from_threshold(threshold));
        self
    }

    pub fn with_runtime(mut self) -> Self {
        self.config.runtime = true;
        self
    }

    pub fn with_process(mut self) -> Self {
        self.config.process = true;
        self
    }

    /// Attach a caller-built descriptor.
    pub fn with_custom(mut self, metric: Metric) -> Self {
        self.custom.push(Custom::Ready(metric));
        self
    }

    /// Attach a descriptor built at `build()` time from the final skip paths.
    pub fn with_custom_fn<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&SkipPaths) -> Result<Metric> + Send + 'static,
    {
        self.custom.push(Custom::Deferred(Box::new(f)));
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Validate the config, construct every descriptor and assemble the monitor.
    pub fn build(self) -> Result<Monitor> {
        let cfg = self.config;
        cfg.validate()?;

        let skip = SkipPaths::new(cfg.skip_paths.iter().cloned());
        let mut metrics = Vec::new();

        if cfg.basic {
            metrics.push(measure::slow_request_total(&skip, None)?);
            metrics.push(measure::request_duration(&skip, None)?);
            metrics.push(measure::request_total(&skip)?);
        }
        if cfg.request_total {
            metrics.push(measure::request_total(&skip)?);
        }
        if let Some(d) = &cfg.request_duration {
            metrics.push(measure::request_duration(&skip, d.buckets())?);
        }
        if let Some(s) = &cfg.slow_request {
            metrics.push(measure::slow_request_total(&skip, s.threshold())?);
        }
        if cfg.runtime {
            metrics.push(telemetry::runtime_collector());
        }
        if cfg.process {
            metrics.push(telemetry::process_collector());
        }
        for c in self.custom {
            let metric = match c {
                Custom::Ready(m) => m,
                Custom::Deferred(f) => f(&skip)?,
            };
            metrics.push(metric);
        }

        Monitor::assemble(metrics, skip)
    }
}
