//! Collector registry.
//!
//! Owns every registered collector and rejects a second registration of any
//! family name. Gathering produces families sorted by name; each vector sorts
//! its own series, so two gathers with no traffic in between render the same
//! bytes.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use crate::collector::{Collect, Collector};
use crate::encode::encode_text;
use crate::error::{MonitorError, Result};
use crate::family::MetricFamily;

#[derive(Default)]
struct Inner {
    names: HashSet<String>,
    collectors: Vec<Collector>,
}

#[derive(Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collector under every family name it describes.
    ///
    /// Fails without side effects if any of those names is already taken or
    /// repeated within the collector itself.
    pub fn register(&self, collector: Collector) -> Result<()> {
        let descs = collector.describe();
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let mut incoming: HashSet<&str> = HashSet::with_capacity(descs.len());
        for d in &descs {
            if inner.names.contains(&d.name) || !incoming.insert(d.name.as_str()) {
                return Err(MonitorError::AlreadyRegistered {
                    name: d.name.clone(),
                });
            }
        }

        for d in &descs {
            inner.names.insert(d.name.clone());
        }
        inner.collectors.push(collector);
        Ok(())
    }

    /// Number of registered collectors (not families).
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .collectors
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot every family, sorted by name.
    pub fn gather(&self) -> Vec<MetricFamily> {
        let collectors = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .collectors
            .clone();

        let mut families: Vec<MetricFamily> =
            collectors.iter().flat_map(|c| c.collect()).collect();
        families.sort_by(|a, b| a.name.cmp(&b.name));
        families
    }

    /// Gather and encode in the text exposition format.
    pub fn render(&self) -> String {
        encode_text(&self.gather())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{CounterVec, GaugeVec, Opts};
    use crate::error::ErrorCode;

    fn counter(name: &str) -> Collector {
        match CounterVec::new(Opts::new(name, "help").labels(&["uri"])) {
            Ok(v) => v.into(),
            Err(e) => unreachable!("valid opts: {e}"),
        }
    }

    #[test]
    fn duplicate_family_name_is_a_hard_error() {
        let reg = Registry::new();
        assert!(reg.register(counter("a_total")).is_ok());

        let err = reg.register(counter("a_total")).err();
        assert_eq!(err.map(|e| e.code()), Some(ErrorCode::AlreadyRegistered));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn same_name_different_kind_still_conflicts() {
        let reg = Registry::new();
        assert!(reg.register(counter("x")).is_ok());
        let gauge = match GaugeVec::new(Opts::new("x", "help")) {
            Ok(g) => g,
            Err(e) => unreachable!("valid opts: {e}"),
        };
        assert!(reg.register(gauge.into()).is_err());
    }

    #[test]
    fn gather_is_sorted_by_name() {
        let reg = Registry::new();
        assert!(reg.register(counter("zz_total")).is_ok());
        assert!(reg.register(counter("aa_total")).is_ok());
        let names: Vec<String> = reg.gather().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["aa_total", "zz_total"]);
    }
}
