//! Snapshot data model produced by collectors at scrape time.

use crate::collector::Kind;

/// One metric family (all series sharing a name) at the time of collection.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    pub name: String,
    pub help: String,
    pub kind: Kind,
    pub series: Vec<Series>,
}

impl MetricFamily {
    pub fn new(name: impl Into<String>, help: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            kind,
            series: Vec::new(),
        }
    }

    /// Append a series; labels are `(name, value)` pairs in declaration order.
    pub fn push(&mut self, labels: Vec<(String, String)>, value: Value) {
        self.series.push(Series { labels, value });
    }

    /// Convenience for unlabelled gauges.
    pub fn gauge(name: impl Into<String>, help: impl Into<String>, value: f64) -> Self {
        let mut fam = Self::new(name, help, Kind::Gauge);
        fam.push(Vec::new(), Value::Gauge(value));
        fam
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub labels: Vec<(String, String)>,
    pub value: Value,
}

/// Sampled value of a single series.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Counter(u64),
    Gauge(f64),
    /// `buckets` holds `(upper_bound, cumulative_count)` without the `+Inf` bucket.
    Histogram {
        buckets: Vec<(f64, u64)>,
        sum: f64,
        count: u64,
    },
    Summary {
        sum: f64,
        count: u64,
    },
    Untyped(f64),
}
