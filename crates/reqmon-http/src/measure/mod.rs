//! Built-in request measurements.
//!
//! Each constructor closes over the skip-path set it is given and returns a
//! [`Metric`](crate::Metric) carrying a fresh collector and the middleware that
//! feeds it. Timing and status capture are done per measurement, so enabling
//! one never changes what another records.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `request_total` | Counter | uri, method, status_code |
//! | `request_duration` | Histogram | uri |
//! | `slow_request_total` | Counter | uri, method, code |

mod request_duration;
mod request_total;
mod slow_request;

pub use request_duration::{request_duration, REQUEST_DURATION};
pub use request_total::{request_total, REQUEST_TOTAL};
pub use slow_request::{effective_threshold, slow_request_total, DEFAULT_SLOW_THRESHOLD, SLOW_REQUEST_TOTAL};
