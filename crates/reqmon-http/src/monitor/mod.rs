//! The assembled, immutable set of collectors and their middleware chain.

mod builder;

pub use builder::MonitorBuilder;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{response::Response, routing::MethodRouter, Router};

use reqmon_core::{
    Collector, CounterVec, GaugeVec, HistogramVec, Kind, MonitorError, Registry, Result,
    SummaryVec,
};

use crate::config::MonitorConfig;
use crate::metric::Metric;
use crate::middleware::{layer_chain, Middleware, SkipPaths};
use crate::scrape;

/// Result of a shape-checked lookup.
#[derive(Debug, Clone)]
pub enum Lookup {
    Found(Collector),
    Missing,
    WrongKind { expected: Kind, actual: Kind },
}

impl Lookup {
    pub fn found(self) -> Option<Collector> {
        match self {
            Lookup::Found(c) => Some(c),
            _ => None,
        }
    }
}

/// Registered collectors plus the ordered middleware chain feeding them.
///
/// Built once and never mutated afterwards; clones share the same state and
/// can be handed to any number of request tasks.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    registry: Registry,
    collectors: HashMap<String, Collector>,
    names: Vec<String>,
    middlewares: Vec<Arc<dyn Middleware>>,
    skip_paths: SkipPaths,
}

impl Monitor {
    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::new()
    }

    pub fn from_config(config: MonitorConfig) -> Result<Self> {
        MonitorBuilder::from_config(config).build()
    }

    /// Register descriptors in order; the first one offered under a name wins.
    ///
    /// Any registry error aborts the whole build and nothing assembled so far
    /// escapes.
    pub(crate) fn assemble(metrics: Vec<Metric>, skip_paths: SkipPaths) -> Result<Self> {
        let registry = Registry::new();
        let mut collectors = HashMap::with_capacity(metrics.len());
        let mut names = Vec::with_capacity(metrics.len());
        let mut middlewares = Vec::new();

        for metric in metrics {
            let (name, collector, middleware) = metric.into_parts();
            if collectors.contains_key(&name) {
                tracing::debug!(metric = %name, "duplicate metric ignored");
                continue;
            }

            registry
                .register(collector.clone())
                .map_err(|e| MonitorError::Registration {
                    name: name.clone(),
                    source: Box::new(e),
                })?;

            if let Some(mw) = middleware {
                middlewares.push(mw);
            }
            names.push(name.clone());
            collectors.insert(name, collector);
        }

        tracing::info!(
            metrics = names.len(),
            middlewares = middlewares.len(),
            skip_paths = skip_paths.as_slice().len(),
            "monitor built"
        );

        Ok(Self {
            inner: Arc::new(MonitorInner {
                registry,
                collectors,
                names,
                middlewares,
                skip_paths,
            }),
        })
    }

    /// The chain in offering order. Apply it with [`Monitor::instrument`] or
    /// fold it yourself, first element innermost.
    pub fn middlewares(&self) -> &[Arc<dyn Middleware>] {
        &self.inner.middlewares
    }

    /// Wrap every route of `router` with the chain.
    ///
    /// Routes added to the returned router afterwards (typically the scrape
    /// endpoint) are not instrumented.
    pub fn instrument<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        layer_chain(router, &self.inner.middlewares)
    }

    /// GET handler serving the text exposition of every registered collector.
    pub fn scrape_handler<S>(&self) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let monitor = self.clone();
        axum::routing::get(move || {
            let monitor = monitor.clone();
            async move { monitor.scrape() }
        })
    }

    /// Scrape response: status 200 with the rendered body.
    pub fn scrape(&self) -> Response {
        scrape::response(self.render())
    }

    /// Current state of every registered collector in text format.
    pub fn render(&self) -> String {
        self.inner.registry.render()
    }

    /// Register an extra collector outside the descriptor flow.
    ///
    /// A collector whose families are already registered is ignored; any other
    /// error is returned. The collector is exported by the scrape handler but
    /// is not reachable through the lookups.
    pub fn register(&self, collector: impl Into<Collector>) -> Result<()> {
        match self.inner.registry.register(collector.into()) {
            Err(e) if e.is_already_registered() => Ok(()),
            other => other,
        }
    }

    /// Descriptor names in the order they were accepted.
    pub fn names(&self) -> &[String] {
        &self.inner.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.collectors.contains_key(name)
    }

    pub fn skip_paths(&self) -> &SkipPaths {
        &self.inner.skip_paths
    }

    pub fn lookup(&self, name: &str, expected: Kind) -> Lookup {
        match self.inner.collectors.get(name) {
            None => Lookup::Missing,
            Some(c) if c.kind() == expected => Lookup::Found(c.clone()),
            Some(c) => Lookup::WrongKind {
                expected,
                actual: c.kind(),
            },
        }
    }

    pub fn counter_vec(&self, name: &str) -> Option<CounterVec> {
        self.inner
            .collectors
            .get(name)
            .and_then(|c| c.as_counter_vec().cloned())
    }

    pub fn histogram_vec(&self, name: &str) -> Option<HistogramVec> {
        self.inner
            .collectors
            .get(name)
            .and_then(|c| c.as_histogram_vec().cloned())
    }

    pub fn gauge_vec(&self, name: &str) -> Option<GaugeVec> {
        self.inner
            .collectors
            .get(name)
            .and_then(|c| c.as_gauge_vec().cloned())
    }

    pub fn summary_vec(&self, name: &str) -> Option<SummaryVec> {
        self.inner
            .collectors
            .get(name)
            .and_then(|c| c.as_summary_vec().cloned())
    }
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("metrics", &self.inner.names)
            .field("middlewares", &self.inner.middlewares.len())
            .field("skip_paths", &self.inner.skip_paths)
            .finish()
    }
}
