//! reqmon core: transport-agnostic collectors, registry, and text exposition.
//!
//! This crate defines the measurement sinks (counter, gauge, histogram and
//! summary vectors), the registry that owns them, and the encoder that turns a
//! registry snapshot into the Prometheus text format. It carries no HTTP or
//! runtime dependencies so it can be reused outside of the axum integration.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Collectors are updated from inside request handlers; every fallible path
//! must surface as `MonitorError`/`Result` so a bad label never takes down a
//! request in flight.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod collector;
pub mod encode;
pub mod error;
pub mod family;
pub mod registry;

pub use collector::{
    Collect, Collector, Counter, CounterVec, Desc, Gauge, GaugeVec, Histogram, HistogramVec, Kind,
    Opts, Summary, SummaryVec, DEFAULT_DURATION_BUCKETS,
};
pub use encode::{encode_text, TEXT_CONTENT_TYPE};
pub use error::{ErrorCode, MonitorError, Result};
pub use family::{MetricFamily, Series, Value};
pub use registry::Registry;
