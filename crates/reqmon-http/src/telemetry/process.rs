use std::sync::{Arc, Mutex, PoisonError};

use reqmon_core::{Collect, Collector, Desc, MetricFamily};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

use crate::metric::Metric;

pub const PROCESS: &str = "process";

const RESIDENT: (&str, &str) = ("process_resident_memory_bytes", "Resident memory size in bytes.");
const VIRTUAL: (&str, &str) = ("process_virtual_memory_bytes", "Virtual memory size in bytes.");
const CPU: (&str, &str) = (
    "process_cpu_usage_percent",
    "CPU usage of the process since the previous scrape, in percent.",
);
const START: (&str, &str) = (
    "process_start_time_seconds",
    "Start time of the process since unix epoch in seconds.",
);

/// Memory, CPU and start time of the current process, via `sysinfo`.
///
/// Sampling reads `/proc` (or the platform equivalent) synchronously under a
/// mutex, on whatever thread runs the scrape. That is one small read per
/// scrape; at higher scrape rates wrap the scrape in `spawn_blocking`.
pub struct ProcessCollector {
    pid: Option<Pid>,
    system: Mutex<System>,
}

impl ProcessCollector {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!(error = %e, "process metrics unavailable on this platform");
                None
            }
        };
        Self {
            pid,
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for ProcessCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collect for ProcessCollector {
    fn describe(&self) -> Vec<Desc> {
        [RESIDENT, VIRTUAL, CPU, START]
            .into_iter()
            .map(|(name, help)| Desc {
                name: name.to_string(),
                help: help.to_string(),
                label_names: Vec::new(),
            })
            .collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let Some(pid) = self.pid else {
            return Vec::new();
        };
        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );
        let Some(process) = system.process(pid) else {
            return Vec::new();
        };
        vec![
            MetricFamily::gauge(RESIDENT.0, RESIDENT.1, process.memory() as f64),
            MetricFamily::gauge(VIRTUAL.0, VIRTUAL.1, process.virtual_memory() as f64),
            MetricFamily::gauge(CPU.0, CPU.1, f64::from(process.cpu_usage())),
            MetricFamily::gauge(START.0, START.1, process.start_time() as f64),
        ]
    }
}

/// Descriptor for the process collector, named `process`.
pub fn process_collector() -> Metric {
    Metric::new(PROCESS, Collector::Custom(Arc::new(ProcessCollector::new())))
}
