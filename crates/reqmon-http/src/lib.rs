//! reqmon HTTP integration.
//!
//! Builds a [`Monitor`] from a [`MonitorConfig`](config::MonitorConfig) and
//! custom [`Metric`] descriptors, applies its middleware chain to an axum
//! router and serves the collected measurements from a scrape endpoint.
//!
//! ```ignore
//! let monitor = Monitor::builder()
//!     .skip_paths(["/health"])
//!     .with_request_total()
//!     .with_slow_request(Some(Duration::from_secs(10)))
//!     .with_request_duration(None)
//!     .with_runtime()
//!     .with_process()
//!     .build()?;
//!
//! let app = monitor
//!     .instrument(Router::new().route("/", get(handler)))
//!     .route("/metrics", monitor.scrape_handler());
//! ```

pub mod config;
pub mod measure;
pub mod metric;
pub mod middleware;
pub mod monitor;
pub mod outcome;
pub mod router;
pub mod scrape;
pub mod telemetry;

pub use metric::Metric;
pub use middleware::{middleware_fn, Middleware, SkipPaths};
pub use monitor::{Lookup, Monitor, MonitorBuilder};
pub use outcome::Outcome;
