use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response};

use reqmon_core::{HistogramVec, Opts, Result};

use crate::metric::Metric;
use crate::middleware::{Middleware, SkipPaths};
use crate::outcome::Outcome;

pub const REQUEST_DURATION: &str = "request_duration";

/// Histogram of handler wall-clock time in seconds, by path.
///
/// `None` or an empty slice selects
/// [`DEFAULT_DURATION_BUCKETS`](reqmon_core::DEFAULT_DURATION_BUCKETS).
pub fn request_duration(skip: &SkipPaths, buckets: Option<&[f64]>) -> Result<Metric> {
    let vec = HistogramVec::new(
        Opts::new(REQUEST_DURATION, "The time server took to handle the request.")
            .labels(&["uri"]),
        buckets.unwrap_or_default(),
    )?;

    let mw = RequestDuration {
        skip: skip.clone(),
        vec: vec.clone(),
    };
    Ok(Metric::new(REQUEST_DURATION, vec).with_middleware(mw))
}

struct RequestDuration {
    skip: SkipPaths,
    vec: HistogramVec,
}

#[async_trait]
impl Middleware for RequestDuration {
    async fn handle(&self, request: Request, next: Next) -> Response {
        if self.skip.contains(request.uri().path()) {
            return next.run(request).await;
        }

        let path = request.uri().path().to_owned();
        let (response, outcome) = Outcome::capture(request, next).await;

        self.vec.observe(&[path.as_str()], outcome.elapsed.as_secs_f64());
        response
    }
}
