//! Top-level facade crate for reqmon.
//!
//! Re-exports the collectors and the HTTP integration so users can depend on a single crate.

pub mod core {
    pub use reqmon_core::*;
}

pub mod http {
    pub use reqmon_http::*;
}

pub use reqmon_core::{MonitorError, Result};
pub use reqmon_http::{Metric, Monitor, MonitorBuilder};
