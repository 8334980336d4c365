//! Labelled measurement sinks.
//!
//! Every vector type stores one child per label-value tuple in a `DashMap`, so
//! concurrent requests can update different series without contending on a
//! global lock. Children are handed out as cheap `Arc`-backed handles.
//! Label values are kept in declaration order; the scrape output sorts series
//! by those values to keep the rendering deterministic.

mod counter;
mod gauge;
mod histogram;
mod summary;

pub use counter::{Counter, CounterVec};
pub use gauge::{Gauge, GaugeVec};
pub use histogram::{Histogram, HistogramVec, DEFAULT_DURATION_BUCKETS};
pub use summary::{Summary, SummaryVec};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{MonitorError, Result};
use crate::family::MetricFamily;

/// Metric shape. Doubles as the `# TYPE` of a rendered family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Counter,
    Gauge,
    Histogram,
    Summary,
    Untyped,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Counter => "counter",
            Kind::Gauge => "gauge",
            Kind::Histogram => "histogram",
            Kind::Summary => "summary",
            Kind::Untyped => "untyped",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name, help and label names of a metric family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Desc {
    pub name: String,
    pub help: String,
    pub label_names: Vec<String>,
}

/// Construction options shared by all vector types.
#[derive(Debug, Clone)]
pub struct Opts {
    pub name: String,
    pub help: String,
    pub label_names: Vec<String>,
}

impl Opts {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            label_names: Vec::new(),
        }
    }

    pub fn labels(mut self, names: &[&str]) -> Self {
        self.label_names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Validate names and turn the options into a descriptor.
    /// `reserved` lists label names the metric type claims for itself.
    pub(crate) fn into_desc(self, reserved: &[&str]) -> Result<Desc> {
        if !is_valid_metric_name(&self.name) {
            return Err(MonitorError::invalid_metric(
                &self.name,
                "metric name must match [a-zA-Z_:][a-zA-Z0-9_:]*",
            ));
        }
        if self.help.is_empty() {
            return Err(MonitorError::invalid_metric(&self.name, "help must not be empty"));
        }
        for (i, label) in self.label_names.iter().enumerate() {
            if !is_valid_label_name(label) {
                return Err(MonitorError::invalid_metric(
                    &self.name,
                    format!("invalid label name '{label}'"),
                ));
            }
            if reserved.contains(&label.as_str()) {
                return Err(MonitorError::invalid_metric(
                    &self.name,
                    format!("label name '{label}' is reserved"),
                ));
            }
            if self.label_names[..i].contains(label) {
                return Err(MonitorError::invalid_metric(
                    &self.name,
                    format!("duplicate label name '{label}'"),
                ));
            }
        }
        Ok(Desc {
            name: self.name,
            help: self.help,
            label_names: self.label_names,
        })
    }
}

fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn is_valid_label_name(name: &str) -> bool {
    if name.starts_with("__") {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Anything that can describe and sample metric families.
///
/// Implemented by the built-in vectors and by opaque collectors such as the
/// runtime and process telemetry in `reqmon-http`.
pub trait Collect: Send + Sync {
    /// Families this collector will emit. Used for conflict detection.
    fn describe(&self) -> Vec<Desc>;
    /// Sample the current state.
    fn collect(&self) -> Vec<MetricFamily>;
}

/// Tagged collector handle.
///
/// The typed variants support lookups by shape; `Custom` covers collectors
/// whose internals are opaque to the monitor.
#[derive(Clone)]
pub enum Collector {
    Counter(CounterVec),
    Gauge(GaugeVec),
    Histogram(HistogramVec),
    Summary(SummaryVec),
    Custom(Arc<dyn Collect>),
}

impl Collector {
    pub fn kind(&self) -> Kind {
        match self {
            Collector::Counter(_) => Kind::Counter,
            Collector::Gauge(_) => Kind::Gauge,
            Collector::Histogram(_) => Kind::Histogram,
            Collector::Summary(_) => Kind::Summary,
            Collector::Custom(_) => Kind::Untyped,
        }
    }

    pub fn as_counter_vec(&self) -> Option<&CounterVec> {
        match self {
            Collector::Counter(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_gauge_vec(&self) -> Option<&GaugeVec> {
        match self {
            Collector::Gauge(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_histogram_vec(&self) -> Option<&HistogramVec> {
        match self {
            Collector::Histogram(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_summary_vec(&self) -> Option<&SummaryVec> {
        match self {
            Collector::Summary(v) => Some(v),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn Collect {
        match self {
            Collector::Counter(v) => v,
            Collector::Gauge(v) => v,
            Collector::Histogram(v) => v,
            Collector::Summary(v) => v,
            Collector::Custom(c) => c.as_ref(),
        }
    }
}

impl Collect for Collector {
    fn describe(&self) -> Vec<Desc> {
        self.inner().describe()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.inner().collect()
    }
}

impl fmt::Debug for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.describe().into_iter().map(|d| d.name).collect();
        f.debug_struct("Collector")
            .field("kind", &self.kind())
            .field("families", &names)
            .finish()
    }
}

impl From<CounterVec> for Collector {
    fn from(v: CounterVec) -> Self {
        Collector::Counter(v)
    }
}

impl From<GaugeVec> for Collector {
    fn from(v: GaugeVec) -> Self {
        Collector::Gauge(v)
    }
}

impl From<HistogramVec> for Collector {
    fn from(v: HistogramVec) -> Self {
        Collector::Histogram(v)
    }
}

impl From<SummaryVec> for Collector {
    fn from(v: SummaryVec) -> Self {
        Collector::Summary(v)
    }
}

/// `f64` stored as raw bits.
#[derive(Debug, Default)]
pub(crate) struct AtomicF64(AtomicU64);

impl AtomicF64 {
    pub(crate) fn new(v: f64) -> Self {
        Self(AtomicU64::new(v.to_bits()))
    }

    pub(crate) fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub(crate) fn set(&self, v: f64) {
        self.0.store(v.to_bits(), Ordering::Relaxed);
    }

    pub(crate) fn add(&self, delta: f64) {
        let mut cur = self.0.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(cur) + delta).to_bits();
            match self
                .0
                .compare_exchange_weak(cur, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(actual) => cur = actual,
            }
        }
    }
}

/// Label-keyed children shared by every vector type.
pub(crate) struct LabelVec<T> {
    pub(crate) desc: Desc,
    children: DashMap<Vec<String>, T>,
}

impl<T: Clone> LabelVec<T> {
    pub(crate) fn new(desc: Desc) -> Self {
        Self {
            desc,
            children: DashMap::new(),
        }
    }

    /// Fetch (or create) the child for `values`.
    pub(crate) fn child_with(&self, values: &[&str], make: impl FnOnce() -> T) -> Result<T> {
        if values.len() != self.desc.label_names.len() {
            return Err(MonitorError::LabelCardinality {
                name: self.desc.name.clone(),
                expected: self.desc.label_names.len(),
                actual: values.len(),
            });
        }
        let key: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        if let Some(existing) = self.children.get(&key) {
            return Ok(existing.value().clone());
        }
        Ok(self.children.entry(key).or_insert_with(make).value().clone())
    }

    /// Look up an existing child without creating it.
    pub(crate) fn get(&self, values: &[&str]) -> Option<T> {
        let key: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        self.children.get(&key).map(|c| c.value().clone())
    }

    pub(crate) fn len(&self) -> usize {
        self.children.len()
    }

    /// Children sorted by label values, paired with their `(name, value)` labels.
    pub(crate) fn snapshot(&self) -> Vec<(Vec<(String, String)>, T)> {
        let mut items: Vec<(Vec<String>, T)> = self
            .children
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        items.sort_by(|a, b| a.0.cmp(&b.0));
        items
            .into_iter()
            .map(|(values, child)| {
                let labels = self
                    .desc
                    .label_names
                    .iter()
                    .cloned()
                    .zip(values)
                    .collect();
                (labels, child)
            })
            .collect()
    }

    pub(crate) fn family(&self, kind: Kind) -> MetricFamily {
        MetricFamily::new(self.desc.name.clone(), self.desc.help.clone(), kind)
    }
}
