use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{MonitorError, Result};
use crate::family::{MetricFamily, Value};

use super::{AtomicF64, Collect, Desc, Kind, LabelVec, Opts};

/// Bucket upper bounds (seconds) used when no explicit set is supplied.
pub const DEFAULT_DURATION_BUCKETS: [f64; 5] = [0.1, 0.3, 1.2, 5.0, 10.0];

#[derive(Debug)]
struct HistogramCore {
    upper_bounds: Arc<[f64]>,
    // Cumulative: bucket i counts every observation <= upper_bounds[i].
    buckets: Vec<AtomicU64>,
    count: AtomicU64,
    sum: AtomicF64,
}

/// Histogram for one label tuple.
#[derive(Debug, Clone)]
pub struct Histogram(Arc<HistogramCore>);

impl Histogram {
    fn new(upper_bounds: Arc<[f64]>) -> Self {
        let buckets = upper_bounds.iter().map(|_| AtomicU64::new(0)).collect();
        Self(Arc::new(HistogramCore {
            upper_bounds,
            buckets,
            count: AtomicU64::new(0),
            sum: AtomicF64::new(0.0),
        }))
    }

    pub fn observe(&self, v: f64) {
        let h = &self.0;
        h.count.fetch_add(1, Ordering::Relaxed);
        h.sum.add(v);
        for (i, &b) in h.upper_bounds.iter().enumerate() {
            if v <= b {
                h.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn count(&self) -> u64 {
        self.0.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> f64 {
        self.0.sum.get()
    }

    /// `(upper_bound, cumulative_count)` pairs, `+Inf` excluded.
    pub fn buckets(&self) -> Vec<(f64, u64)> {
        self.0
            .upper_bounds
            .iter()
            .zip(&self.0.buckets)
            .map(|(&b, c)| (b, c.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Histogram family keyed by label values.
#[derive(Clone)]
pub struct HistogramVec {
    inner: Arc<LabelVec<Histogram>>,
    upper_bounds: Arc<[f64]>,
}

impl HistogramVec {
    /// An empty `buckets` slice resolves to [`DEFAULT_DURATION_BUCKETS`].
    pub fn new(opts: Opts, buckets: &[f64]) -> Result<Self> {
        let desc = opts.into_desc(&["le"])?;
        let upper_bounds = resolve_buckets(&desc.name, buckets)?;
        Ok(Self {
            inner: Arc::new(LabelVec::new(desc)),
            upper_bounds: upper_bounds.into(),
        })
    }

    pub fn with_label_values(&self, values: &[&str]) -> Result<Histogram> {
        let bounds = Arc::clone(&self.upper_bounds);
        self.inner.child_with(values, move || Histogram::new(bounds))
    }

    /// Record `v` for `values`, logging and dropping cardinality errors.
    pub fn observe(&self, values: &[&str], v: f64) {
        match self.with_label_values(values) {
            Ok(h) => h.observe(v),
            Err(e) => tracing::warn!(error = %e, "histogram observation dropped"),
        }
    }

    pub fn get(&self, values: &[&str]) -> Option<Histogram> {
        self.inner.get(values)
    }

    pub fn upper_bounds(&self) -> &[f64] {
        &self.upper_bounds
    }

    pub fn desc(&self) -> &Desc {
        &self.inner.desc
    }
}

impl Collect for HistogramVec {
    fn describe(&self) -> Vec<Desc> {
        vec![self.inner.desc.clone()]
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let mut fam = self.inner.family(Kind::Histogram);
        for (labels, h) in self.inner.snapshot() {
            fam.push(
                labels,
                Value::Histogram {
                    buckets: h.buckets(),
                    sum: h.sum(),
                    count: h.count(),
                },
            );
        }
        vec![fam]
    }
}

fn resolve_buckets(name: &str, buckets: &[f64]) -> Result<Vec<f64>> {
    if buckets.is_empty() {
        return Ok(DEFAULT_DURATION_BUCKETS.to_vec());
    }
    // +Inf is implicit in the exposition format and never a configured bound.
    if buckets.iter().any(|b| !b.is_finite()) {
        return Err(MonitorError::invalid_metric(name, "histogram buckets must be finite"));
    }
    if buckets.windows(2).any(|w| w[0] >= w[1]) {
        return Err(MonitorError::invalid_metric(
            name,
            "histogram buckets must be strictly increasing",
        ));
    }
    Ok(buckets.to_vec())
}
