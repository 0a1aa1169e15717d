//! Collector registry
//!
//! Holds the registered collectors, enforces descriptor uniqueness at
//! registration time and gathers one cycle from every collector.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::collector::Collector;
use crate::error::RegistryError;
use crate::metrics::{MetricDesc, Sample};

/// Set of collectors polled together on each scrape
#[derive(Default)]
pub struct Registry {
    collectors: Vec<Arc<dyn Collector>>,
    names: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collector
    ///
    /// # Errors
    /// Fails if the collector describes a family that is already registered
    /// or describes the same family twice.
    pub fn register(&mut self, collector: Arc<dyn Collector>) -> Result<(), RegistryError> {
        let mut own = HashSet::new();
        for desc in collector.describe() {
            if !own.insert(desc.name().to_string()) {
                return Err(RegistryError::InconsistentCollector {
                    collector: collector.subsystem().to_string(),
                    name: desc.name().to_string(),
                });
            }
            if self.names.contains(desc.name()) {
                return Err(RegistryError::DuplicateDescriptor(desc.name().to_string()));
            }
        }

        self.names.extend(own);
        self.collectors.push(collector);
        Ok(())
    }

    /// Number of registered collectors
    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    /// Descriptors of every registered collector
    pub fn describe(&self) -> Vec<Arc<MetricDesc>> {
        self.collectors.iter().flat_map(|c| c.describe()).collect()
    }

    /// Run one cycle of every collector concurrently
    ///
    /// Samples whose family was not described, or whose label values do not
    /// match the family's schema, are dropped.
    pub async fn gather(&self, cancel: &CancellationToken) -> Vec<Sample> {
        let cycles = self.collectors.iter().map(|c| c.collect(cancel));
        let results = join_all(cycles).await;

        results
            .into_iter()
            .flatten()
            .filter(|sample| self.is_consistent(sample))
            .collect()
    }

    fn is_consistent(&self, sample: &Sample) -> bool {
        let desc = &sample.desc;
        if !self.names.contains(desc.name()) {
            error!(metric = %desc.name(), "Collected metric was not described");
            return false;
        }
        if sample.label_values.len() != desc.label_names().len() {
            error!(
                metric = %desc.name(),
                expected = desc.label_names().len(),
                actual = sample.label_values.len(),
                "Label cardinality mismatch"
            );
            return false;
        }
        true
    }
}
