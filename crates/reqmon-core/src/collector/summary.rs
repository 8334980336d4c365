use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::Result;
use crate::family::{MetricFamily, Value};

use super::{AtomicF64, Collect, Desc, Kind, LabelVec, Opts};

#[derive(Debug, Default)]
struct SummaryCore {
    count: AtomicU64,
    sum: AtomicF64,
}

/// Sum/count summary for one label tuple. Quantiles are not tracked.
#[derive(Debug, Clone, Default)]
pub struct Summary(Arc<SummaryCore>);

impl Summary {
    pub fn observe(&self, v: f64) {
        self.0.count.fetch_add(1, Ordering::Relaxed);
        self.0.sum.add(v);
    }

    pub fn count(&self) -> u64 {
        self.0.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> f64 {
        self.0.sum.get()
    }
}

#[derive(Clone)]
pub struct SummaryVec {
    inner: Arc<LabelVec<Summary>>,
}

impl SummaryVec {
    pub fn new(opts: Opts) -> Result<Self> {
        let desc = opts.into_desc(&["quantile"])?;
        Ok(Self {
            inner: Arc::new(LabelVec::new(desc)),
        })
    }

    pub fn with_label_values(&self, values: &[&str]) -> Result<Summary> {
        self.inner.child_with(values, Summary::default)
    }

    pub fn observe(&self, values: &[&str], v: f64) {
        match self.with_label_values(values) {
            Ok(s) => s.observe(v),
            Err(e) => tracing::warn!(error = %e, "summary observation dropped"),
        }
    }

    pub fn get(&self, values: &[&str]) -> Option<Summary> {
        self.inner.get(values)
    }

    pub fn desc(&self) -> &Desc {
        &self.inner.desc
    }
}

impl Collect for SummaryVec {
    fn describe(&self) -> Vec<Desc> {
        vec![self.inner.desc.clone()]
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let mut fam = self.inner.family(Kind::Summary);
        for (labels, s) in self.inner.snapshot() {
            fam.push(
                labels,
                Value::Summary {
                    sum: s.sum(),
                    count: s.count(),
                },
            );
        }
        vec![fam]
    }
}
