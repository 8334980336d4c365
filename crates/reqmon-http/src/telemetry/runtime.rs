use std::sync::Arc;

use reqmon_core::{Collect, Collector, Desc, MetricFamily};
use tokio::runtime::Handle;

use crate::metric::Metric;

pub const RUNTIME: &str = "runtime";

const WORKERS: (&str, &str) = ("runtime_workers", "Number of worker threads used by the runtime.");
const ALIVE_TASKS: (&str, &str) = ("runtime_alive_tasks", "Number of alive tasks in the runtime.");
const QUEUE_DEPTH: (&str, &str) = (
    "runtime_global_queue_depth",
    "Number of tasks currently scheduled in the runtime's global queue.",
);

/// Gauges read from the tokio runtime the scrape runs on.
/// Outside a runtime nothing is emitted.
#[derive(Debug, Default)]
pub struct RuntimeCollector;

impl Collect for RuntimeCollector {
    fn describe(&self) -> Vec<Desc> {
        [WORKERS, ALIVE_TASKS, QUEUE_DEPTH]
            .into_iter()
            .map(|(name, help)| Desc {
                name: name.to_string(),
                help: help.to_string(),
                label_names: Vec::new(),
            })
            .collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let Ok(handle) = Handle::try_current() else {
            return Vec::new();
        };
        let m = handle.metrics();
        vec![
            MetricFamily::gauge(WORKERS.0, WORKERS.1, m.num_workers() as f64),
            MetricFamily::gauge(ALIVE_TASKS.0, ALIVE_TASKS.1, m.num_alive_tasks() as f64),
            MetricFamily::gauge(QUEUE_DEPTH.0, QUEUE_DEPTH.1, m.global_queue_depth() as f64),
        ]
    }
}

/// Descriptor for the runtime collector, named `runtime`.
pub fn runtime_collector() -> Metric {
    Metric::new(RUNTIME, Collector::Custom(Arc::new(RuntimeCollector)))
}
