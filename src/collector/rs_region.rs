//! Per-region metrics (`name=RegionServer,sub=Regions`)
//!
//! Attribute names are composite keys (see [`RegionKey`]). Each cycle
//! decomposes every candidate key into a buffer, then dispatches the
//! buffered entries through a lookup table keyed by the JMX metric name.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::client::JmxClient;
use super::parser::{numeric_value, select_bean, string_attribute, CollectResult};
use super::region_key::{RegionEntry, RegionKey};
use super::Collector;
use crate::metrics::{MetricDesc, Sample, ScrapeStatus};

/// Value of the `qry` parameter
pub const REGION_QUERY: &str = "Hadoop:service=HBase,name=RegionServer,sub=Regions";

/// Label schema of every per-region family
pub const REGION_LABELS: &[&str] = &["host", "role", "namespace", "htable", "hregion"];

const SUBSYSTEM: &str = "region";

/// Recognized metrics: (JMX metric name, family name, help)
const REGION_METRICS: &[(&str, &str, &str)] = &[
    ("storeCount", "store_count", "Number of stores in the region."),
    ("storeFileCount", "store_file_count", "Number of store files in the region."),
    ("memStoreSize", "mem_store_size", "Memstore size of the region in bytes."),
    ("storeFileSize", "store_file_size", "Store file size of the region in bytes."),
    (
        "compactionsCompletedCount",
        "compactions_completed_count",
        "Number of compactions completed on the region.",
    ),
    ("readRequestCount", "read_request_count", "Number of read requests served by the region."),
    ("writeRequestCount", "write_request_count", "Number of write requests served by the region."),
    (
        "numFilesCompactedCount",
        "num_files_compacted_count",
        "Number of files compacted on the region.",
    ),
    (
        "numBytesCompactedCount",
        "num_bytes_compacted_count",
        "Number of bytes compacted on the region.",
    ),
];

/// Host and role tags shared by every entry of a snapshot
struct SnapshotTags {
    host: String,
    role: String,
}

/// Collector for the per-region bean of one region server
pub struct RegionCollector {
    client: JmxClient,
    status: ScrapeStatus,
    descs: HashMap<&'static str, Arc<MetricDesc>>,
    /// Current-cycle buffer; its lock is the cycle lock
    entries: Mutex<Vec<RegionEntry>>,
}

impl RegionCollector {
    pub fn new(client: JmxClient) -> Self {
        let descs = REGION_METRICS
            .iter()
            .map(|(jmx_name, name, help)| {
                (*jmx_name, Arc::new(MetricDesc::hbase(SUBSYSTEM, name, *help, REGION_LABELS)))
            })
            .collect();

        Self {
            client,
            status: ScrapeStatus::new(SUBSYSTEM),
            descs,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Up indicator and counters of this collector
    pub fn status(&self) -> &ScrapeStatus {
        &self.status
    }

    async fn fetch_and_decode(
        &self,
        cancel: &CancellationToken,
        entries: &mut Vec<RegionEntry>,
    ) -> CollectResult<SnapshotTags> {
        let body = self.client.fetch(REGION_QUERY, cancel).await?;
        let bean = select_bean(&body)?;

        let tags = SnapshotTags {
            host: string_attribute(&bean, "tag.Hostname").to_string(),
            role: string_attribute(&bean, "tag.Context").to_lowercase(),
        };

        for (attribute, value) in &bean {
            if !RegionKey::is_candidate(attribute) {
                continue;
            }

            let key = match RegionKey::parse(attribute) {
                Ok(key) => key,
                Err(e) => {
                    warn!(error = %e, "Skipping malformed region attribute");
                    continue;
                }
            };

            match numeric_value(value) {
                Some(value) => entries.push(RegionEntry { key, value }),
                None => debug!(attribute = %attribute, "Skipping non-numeric region attribute"),
            }
        }

        Ok(tags)
    }

    fn dispatch(&self, tags: &SnapshotTags, entries: &mut Vec<RegionEntry>) -> Vec<Sample> {
        let mut samples = Vec::with_capacity(entries.len());
        let mut unrecognized = 0usize;

        for entry in entries.drain(..) {
            let Some(desc) = self.descs.get(entry.key.metric.as_str()) else {
                unrecognized += 1;
                continue;
            };

            samples.push(Sample::gauge(
                desc,
                entry.value,
                vec![
                    tags.host.clone(),
                    tags.role.clone(),
                    entry.key.namespace,
                    entry.key.table,
                    entry.key.region,
                ],
            ));
        }

        if unrecognized > 0 {
            debug!(count = unrecognized, "Dropped unrecognized region metrics");
        }

        samples
    }
}

#[async_trait]
impl Collector for RegionCollector {
    fn subsystem(&self) -> &'static str {
        SUBSYSTEM
    }

    fn describe(&self) -> Vec<Arc<MetricDesc>> {
        let mut descs: Vec<Arc<MetricDesc>> = REGION_METRICS
            .iter()
            .filter_map(|(jmx_name, _, _)| self.descs.get(jmx_name).cloned())
            .collect();
        descs.extend(self.status.describe());
        descs
    }

    async fn collect(&self, cancel: &CancellationToken) -> Vec<Sample> {
        let mut entries = self.entries.lock().await;
        entries.clear();
        self.status.begin_cycle();

        let mut samples = match self.fetch_and_decode(cancel, &mut entries).await {
            Ok(tags) => {
                self.status.mark_up();
                self.dispatch(&tags, &mut entries)
            }
            Err(e) => {
                entries.clear();
                self.status.mark_down(e.is_parse_failure());
                warn!(
                    subsystem = SUBSYSTEM,
                    endpoint = %self.client.endpoint(),
                    status = e.http_status(),
                    error = %e,
                    "Failed to fetch and decode region metrics"
                );
                vec![]
            }
        };

        debug!(
            subsystem = SUBSYSTEM,
            samples = samples.len(),
            up = self.status.is_up(),
            "Scrape cycle complete"
        );

        samples.extend(self.status.samples());
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector() -> RegionCollector {
        RegionCollector::new(JmxClient::new("http://localhost:60030/jmx", 1000).unwrap())
    }

    #[test]
    fn test_describe_covers_table_and_bookkeeping() {
        let names: Vec<String> = collector()
            .describe()
            .iter()
            .map(|d| d.name().to_string())
            .collect();

        assert_eq!(names.len(), REGION_METRICS.len() + 3);
        assert_eq!(names[0], "hbase_region_store_count");
        assert!(names.contains(&"hbase_region_num_bytes_compacted_count".to_string()));
        assert!(names.contains(&"hbase_region_up".to_string()));
    }

    #[test]
    fn test_dispatch_drops_unrecognized_metrics() {
        let collector = collector();
        let tags = SnapshotTags {
            host: "rs1".to_string(),
            role: "regionserver".to_string(),
        };
        let mut entries = vec![
            RegionEntry {
                key: RegionKey::parse("Namespace_default_table_t1_region_r1_metric_storeCount").unwrap(),
                value: 42.0,
            },
            RegionEntry {
                key: RegionKey::parse("Namespace_default_table_t1_region_r1_metric_maxStoreFileAge")
                    .unwrap(),
                value: 7.0,
            },
        ];

        let samples = collector.dispatch(&tags, &mut entries);

        assert!(entries.is_empty());
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].desc.name(), "hbase_region_store_count");
        assert_eq!(samples[0].value, 42.0);
        assert_eq!(samples[0].label("namespace"), Some("default"));
        assert_eq!(samples[0].label("htable"), Some("t1"));
        assert_eq!(samples[0].label("hregion"), Some("r1"));
        assert_eq!(samples[0].label("host"), Some("rs1"));
    }
}
