//! Scrape endpoint response.
//!
//! - `GET <metrics_path>` : Prometheus text format, no parameters, no side effects

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};

use reqmon_core::TEXT_CONTENT_TYPE;

pub fn response(body: String) -> Response {
    (StatusCode::OK, [(CONTENT_TYPE, TEXT_CONTENT_TYPE)], body).into_response()
}
