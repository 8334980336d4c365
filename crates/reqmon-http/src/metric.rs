use std::fmt;
use std::sync::Arc;

use reqmon_core::Collector;

use crate::middleware::Middleware;

/// Unit handed to a [`Monitor`](crate::Monitor): a unique name, the collector
/// to register, and an optional middleware that feeds it.
///
/// A descriptor without middleware is a background collector and only
/// contributes a registry entry.
#[derive(Clone)]
pub struct Metric {
    name: String,
    collector: Collector,
    middleware: Option<Arc<dyn Middleware>>,
}

impl Metric {
    pub fn new(name: impl Into<String>, collector: impl Into<Collector>) -> Self {
        Self {
            name: name.into(),
            collector: collector.into(),
            middleware: None,
        }
    }

    pub fn with_middleware<M: Middleware + 'static>(self, middleware: M) -> Self {
        self.with_shared_middleware(Arc::new(middleware))
    }

    pub fn with_shared_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware = Some(middleware);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    pub fn middleware(&self) -> Option<&Arc<dyn Middleware>> {
        self.middleware.as_ref()
    }

    pub(crate) fn into_parts(self) -> (String, Collector, Option<Arc<dyn Middleware>>) {
        (self.name, self.collector, self.middleware)
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metric")
            .field("name", &self.name)
            .field("collector", &self.collector)
            .field("middleware", &self.middleware.is_some())
            .finish()
    }
}
