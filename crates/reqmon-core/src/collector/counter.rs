use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::Result;
use crate::family::{MetricFamily, Value};

use super::{Collect, Desc, Kind, LabelVec, Opts};

/// Monotonic counter for one label tuple.
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicU64>);

impl Counter {
    /// Increment by 1.
    pub fn inc(&self) {
        self.inc_by(1);
    }

    /// Increment by an arbitrary value.
    pub fn inc_by(&self, v: u64) {
        self.0.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Counter family keyed by label values.
#[derive(Clone)]
pub struct CounterVec {
    inner: Arc<LabelVec<Counter>>,
}

impl CounterVec {
    pub fn new(opts: Opts) -> Result<Self> {
        let desc = opts.into_desc(&[])?;
        Ok(Self {
            inner: Arc::new(LabelVec::new(desc)),
        })
    }

    /// Counter for the given label values, created on first use.
    pub fn with_label_values(&self, values: &[&str]) -> Result<Counter> {
        self.inner.child_with(values, Counter::default)
    }

    /// Increment the series for `values`.
    ///
    /// Cardinality errors are logged and dropped; this is the call used from
    /// request middlewares, where a bad label must not fail the request.
    pub fn inc(&self, values: &[&str]) {
        match self.with_label_values(values) {
            Ok(c) => c.inc(),
            Err(e) => tracing::warn!(error = %e, "counter increment dropped"),
        }
    }

    /// Current value of an existing series; `None` if it was never touched.
    pub fn get(&self, values: &[&str]) -> Option<u64> {
        self.inner.get(values).map(|c| c.get())
    }

    /// Number of live series.
    pub fn series_count(&self) -> usize {
        self.inner.len()
    }

    pub fn desc(&self) -> &Desc {
        &self.inner.desc
    }
}

impl Collect for CounterVec {
    fn describe(&self) -> Vec<Desc> {
        vec![self.inner.desc.clone()]
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let mut fam = self.inner.family(Kind::Counter);
        for (labels, c) in self.inner.snapshot() {
            fam.push(labels, Value::Counter(c.get()));
        }
        vec![fam]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn vec() -> CounterVec {
        match CounterVec::new(Opts::new("request_total", "requests").labels(&["uri", "method"])) {
            Ok(v) => v,
            Err(e) => unreachable!("valid opts: {e}"),
        }
    }

    #[test]
    fn inc_creates_and_accumulates_series() {
        let v = vec();
        assert_eq!(v.get(&["/a", "GET"]), None);
        v.inc(&["/a", "GET"]);
        v.inc(&["/a", "GET"]);
        v.inc(&["/b", "POST"]);
        assert_eq!(v.get(&["/a", "GET"]), Some(2));
        assert_eq!(v.get(&["/b", "POST"]), Some(1));
        assert_eq!(v.series_count(), 2);
    }

    #[test]
    fn wrong_arity_is_rejected_and_absorbed() {
        let v = vec();
        let err = v.with_label_values(&["/a"]).err();
        assert_eq!(err.map(|e| e.code()), Some(ErrorCode::LabelCardinality));

        v.inc(&["/a"]);
        assert_eq!(v.series_count(), 0);
    }

    #[test]
    fn collect_sorts_series_by_label_values() {
        let v = vec();
        v.inc(&["/z", "GET"]);
        v.inc(&["/a", "GET"]);
        let fams = v.collect();
        assert_eq!(fams.len(), 1);
        let uris: Vec<&str> = fams[0]
            .series
            .iter()
            .map(|s| s.labels[0].1.as_str())
            .collect();
        assert_eq!(uris, vec!["/a", "/z"]);
    }
}
