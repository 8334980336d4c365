use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response};

use reqmon_core::{CounterVec, Opts, Result};

use crate::metric::Metric;
use crate::middleware::{Middleware, SkipPaths};
use crate::outcome::{Outcome, RequestLabels};

pub const REQUEST_TOTAL: &str = "request_total";

/// Counter of every non-skipped request, by path, method and final status.
pub fn request_total(skip: &SkipPaths) -> Result<Metric> {
    let vec = CounterVec::new(
        Opts::new(REQUEST_TOTAL, "All the server received request num with every uri.")
            .labels(&["uri", "method", "status_code"]),
    )?;

    let mw = RequestTotal {
        skip: skip.clone(),
        vec: vec.clone(),
    };
    Ok(Metric::new(REQUEST_TOTAL, vec).with_middleware(mw))
}

struct RequestTotal {
    skip: SkipPaths,
    vec: CounterVec,
}

#[async_trait]
impl Middleware for RequestTotal {
    async fn handle(&self, request: Request, next: Next) -> Response {
        if self.skip.contains(request.uri().path()) {
            return next.run(request).await;
        }

        let labels = RequestLabels::of(&request);
        let (response, outcome) = Outcome::capture(request, next).await;

        self.vec
            .inc(&[labels.path.as_str(), labels.method.as_str(), outcome.status_label()]);
        response
    }
}
