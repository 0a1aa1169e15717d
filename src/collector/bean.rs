//! Fixed-schema collectors
//!
//! A [`JmxBean`] record type names its query, subsystem and descriptor
//! table; [`BeanCollector`] runs the cycle for any such record.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::client::JmxClient;
use super::parser::{decode_bean, CollectResult};
use super::{Collector, HOST_ROLE_LABELS};
use crate::metrics::{MetricDesc, Sample, ScrapeStatus, ValueKind};

/// A bean decoded into a typed record
pub trait JmxBean: DeserializeOwned + Send + Sync + 'static {
    /// Metric subsystem (`hbase_<subsystem>_*`)
    const SUBSYSTEM: &'static str;
    /// Value of the `qry` parameter
    const QUERY: &'static str;

    /// `host` label value
    fn host(&self) -> &str;
    /// `role` label value, before lower-casing
    fn role(&self) -> &str;
    /// Descriptor table, evaluated once at construction
    fn metrics() -> Vec<FieldMetric<Self>>;
}

/// One family of a fixed-schema collector and how to read its value
pub struct FieldMetric<T> {
    pub desc: Arc<MetricDesc>,
    pub kind: ValueKind,
    pub value: fn(&T) -> f64,
}

impl<T: JmxBean> FieldMetric<T> {
    /// Gauge labelled `{host, role}` under `T::SUBSYSTEM`
    pub fn gauge(name: &str, help: &str, value: fn(&T) -> f64) -> Self {
        Self {
            desc: Arc::new(MetricDesc::hbase(T::SUBSYSTEM, name, help, HOST_ROLE_LABELS)),
            kind: ValueKind::Gauge,
            value,
        }
    }
}

/// Collector for a single fixed-schema bean
pub struct BeanCollector<T: JmxBean> {
    client: JmxClient,
    status: ScrapeStatus,
    metrics: Vec<FieldMetric<T>>,
    cycle: Mutex<()>,
}

impl<T: JmxBean> BeanCollector<T> {
    pub fn new(client: JmxClient) -> Self {
        Self {
            client,
            status: ScrapeStatus::new(T::SUBSYSTEM),
            metrics: T::metrics(),
            cycle: Mutex::new(()),
        }
    }

    /// Up indicator and counters of this collector
    pub fn status(&self) -> &ScrapeStatus {
        &self.status
    }

    async fn fetch_and_decode(&self, cancel: &CancellationToken) -> CollectResult<T> {
        let body = self.client.fetch(T::QUERY, cancel).await?;
        Ok(decode_bean(&body)?)
    }

    fn emit(&self, record: &T) -> Vec<Sample> {
        let labels = vec![record.host().to_string(), record.role().to_lowercase()];

        self.metrics
            .iter()
            .map(|metric| Sample {
                desc: Arc::clone(&metric.desc),
                value: (metric.value)(record),
                label_values: labels.clone(),
                kind: metric.kind,
            })
            .collect()
    }
}

#[async_trait]
impl<T: JmxBean> Collector for BeanCollector<T> {
    fn subsystem(&self) -> &'static str {
        T::SUBSYSTEM
    }

    fn describe(&self) -> Vec<Arc<MetricDesc>> {
        let mut descs: Vec<Arc<MetricDesc>> =
            self.metrics.iter().map(|m| Arc::clone(&m.desc)).collect();
        descs.extend(self.status.describe());
        descs
    }

    async fn collect(&self, cancel: &CancellationToken) -> Vec<Sample> {
        let _cycle = self.cycle.lock().await;
        self.status.begin_cycle();

        let mut samples = match self.fetch_and_decode(cancel).await {
            Ok(record) => {
                self.status.mark_up();
                self.emit(&record)
            }
            Err(e) => {
                self.status.mark_down(e.is_parse_failure());
                warn!(
                    subsystem = T::SUBSYSTEM,
                    endpoint = %self.client.endpoint(),
                    status = e.http_status(),
                    error = %e,
                    "Failed to fetch and decode JMX bean"
                );
                vec![]
            }
        };

        debug!(
            subsystem = T::SUBSYSTEM,
            samples = samples.len(),
            up = self.status.is_up(),
            "Scrape cycle complete"
        );

        samples.extend(self.status.samples());
        samples
    }
}
