use std::sync::Arc;

use crate::error::Result;
use crate::family::{MetricFamily, Value};

use super::{AtomicF64, Collect, Desc, Kind, LabelVec, Opts};

/// Settable gauge for one label tuple.
#[derive(Debug, Clone, Default)]
pub struct Gauge(Arc<AtomicF64>);

impl Gauge {
    pub fn set(&self, v: f64) {
        self.0.set(v);
    }
    /// Increment by 1.
    pub fn inc(&self) {
        self.add(1.0);
    }
    /// Decrement by 1.
    pub fn dec(&self) {
        self.add(-1.0);
    }
    /// Add an arbitrary signed delta.
    pub fn add(&self, v: f64) {
        self.0.add(v);
    }
    pub fn get(&self) -> f64 {
        self.0.get()
    }
}

/// Gauge family keyed by label values.
#[derive(Clone)]
pub struct GaugeVec {
    inner: Arc<LabelVec<Gauge>>,
}

impl GaugeVec {
    pub fn new(opts: Opts) -> Result<Self> {
        let desc = opts.into_desc(&[])?;
        Ok(Self {
            inner: Arc::new(LabelVec::new(desc)),
        })
    }

    pub fn with_label_values(&self, values: &[&str]) -> Result<Gauge> {
        self.inner.child_with(values, Gauge::default)
    }

    pub fn get(&self, values: &[&str]) -> Option<f64> {
        self.inner.get(values).map(|g| g.get())
    }

    pub fn desc(&self) -> &Desc {
        &self.inner.desc
    }
}

impl Collect for GaugeVec {
    fn describe(&self) -> Vec<Desc> {
        vec![self.inner.desc.clone()]
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let mut fam = self.inner.family(Kind::Gauge);
        for (labels, g) in self.inner.snapshot() {
            fam.push(labels, Value::Gauge(g.get()));
        }
        vec![fam]
    }
}
