//! Response outcome observed by measuring middlewares.
//!
//! Instead of decorating the response writer, a middleware runs the inner
//! handler through [`Outcome::capture`] and receives the final status and the
//! wall-clock time the handler took. The response itself passes through
//! untouched.
//!
//! A handler that never sets a status produces axum's default response status,
//! `200 OK`, and that is what gets recorded.
//!
//! `elapsed` stops once the inner service has produced the response head.
//! Time spent streaming the body to the client afterwards is not included.

use std::time::{Duration, Instant};

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub status: StatusCode,
    pub elapsed: Duration,
}

impl Outcome {
    /// Run the rest of the pipeline exactly once and record what came back.
    pub async fn capture(request: Request, next: Next) -> (Response, Outcome) {
        let start = Instant::now();
        let response = next.run(request).await;
        let outcome = Outcome {
            status: response.status(),
            elapsed: start.elapsed(),
        };
        (response, outcome)
    }

    /// Numeric status as used in label values (`"200"`).
    pub fn status_label(&self) -> &str {
        self.status.as_str()
    }
}

/// Path and method of a request, taken before the request is moved into the
/// inner handler.
#[derive(Debug, Clone)]
pub struct RequestLabels {
    pub path: String,
    pub method: String,
}

impl RequestLabels {
    pub fn of(request: &Request) -> Self {
        Self {
            path: request.uri().path().to_owned(),
            method: request.method().as_str().to_owned(),
        }
    }
}
