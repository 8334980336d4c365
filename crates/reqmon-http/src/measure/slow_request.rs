use std::time::Duration;

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response};

use reqmon_core::{CounterVec, Opts, Result};

use crate::metric::Metric;
use crate::middleware::{Middleware, SkipPaths};
use crate::outcome::{Outcome, RequestLabels};

pub const SLOW_REQUEST_TOTAL: &str = "slow_request_total";

pub const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_secs(5);

/// `None` and zero both resolve to [`DEFAULT_SLOW_THRESHOLD`].
pub fn effective_threshold(threshold: Option<Duration>) -> Duration {
    match threshold {
        Some(t) if !t.is_zero() => t,
        _ => DEFAULT_SLOW_THRESHOLD,
    }
}

/// Counter of requests whose handler ran strictly longer than `threshold`.
pub fn slow_request_total(skip: &SkipPaths, threshold: Option<Duration>) -> Result<Metric> {
    let threshold = effective_threshold(threshold);
    let vec = CounterVec::new(
        Opts::new(
            SLOW_REQUEST_TOTAL,
            format!("The server handled slow requests counter, t={threshold:?}."),
        )
        .labels(&["uri", "method", "code"]),
    )?;

    let mw = SlowRequest {
        skip: skip.clone(),
        threshold,
        vec: vec.clone(),
    };
    Ok(Metric::new(SLOW_REQUEST_TOTAL, vec).with_middleware(mw))
}

struct SlowRequest {
    skip: SkipPaths,
    threshold: Duration,
    vec: CounterVec,
}

#[async_trait]
impl Middleware for SlowRequest {
    async fn handle(&self, request: Request, next: Next) -> Response {
        if self.skip.contains(request.uri().path()) {
            return next.run(request).await;
        }

        let labels = RequestLabels::of(&request);
        let (response, outcome) = Outcome::capture(request, next).await;

        if outcome.elapsed > self.threshold {
            self.vec
                .inc(&[labels.path.as_str(), labels.method.as_str(), outcome.status_label()]);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_missing_threshold_default_to_five_seconds() {
        assert_eq!(effective_threshold(None), Duration::from_secs(5));
        assert_eq!(effective_threshold(Some(Duration::ZERO)), Duration::from_secs(5));
        assert_eq!(
            effective_threshold(Some(Duration::from_millis(250))),
            Duration::from_millis(250)
        );
    }
}
