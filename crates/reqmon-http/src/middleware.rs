//! Middleware contract and router wiring.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::Request,
    middleware::{from_fn, Next},
    response::Response,
    Router,
};

/// Request-wrapping behavior attached by a metric.
///
/// An implementation must call `next.run` exactly once, skipped requests
/// included. A middleware that never calls it silently drops the request and
/// nothing here can detect that.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, request: Request, next: Next) -> Response;
}

/// Adapter for plain async closures.
pub struct FnMiddleware<F>(F);

#[async_trait]
impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    async fn handle(&self, request: Request, next: Next) -> Response {
        (self.0)(request, next).await
    }
}

/// Wrap an async closure as a shareable middleware.
pub fn middleware_fn<F, Fut>(f: F) -> Arc<dyn Middleware>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(FnMiddleware(f))
}

/// Exact-match path set shared by the skip-aware measurements.
#[derive(Debug, Clone)]
pub struct SkipPaths(Arc<[String]>);

impl Default for SkipPaths {
    fn default() -> Self {
        Self(Arc::from(Vec::new()))
    }
}

impl SkipPaths {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self(paths.into_iter().map(Into::into).collect())
    }

    /// Compared by value, no patterns.
    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|p| p == path)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Apply `chain` to `router`, first element innermost.
///
/// Equivalent to folding `handler = mw(handler)` over the chain: the last
/// middleware sees the request first.
pub fn layer_chain<S>(router: Router<S>, chain: &[Arc<dyn Middleware>]) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    chain.iter().fold(router, |router, mw| {
        let mw = Arc::clone(mw);
        router.layer(from_fn(move |request: Request, next: Next| {
            let mw = Arc::clone(&mw);
            async move { mw.handle(request, next).await }
        }))
    })
}
