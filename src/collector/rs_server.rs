//! Region server metrics (`name=RegionServer,sub=Server`)

use serde::Deserialize;

use super::bean::{BeanCollector, FieldMetric, JmxBean};
use super::parser::lenient_f64;

/// Collector for the server-wide gauges of one region server
pub type RegionServerCollector = BeanCollector<RegionServerMetrics>;

/// `Hadoop:service=HBase,name=RegionServer,sub=Server`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegionServerMetrics {
    #[serde(rename = "tag.Hostname")]
    pub host: String,
    #[serde(rename = "tag.Context")]
    pub role: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub mem_store_size: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub region_count: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub store_count: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub store_file_count: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub store_file_size: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_request_count: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub split_queue_length: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub compaction_queue_length: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub flush_queue_length: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub block_count_hit_percent: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub slow_append_count: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub slow_delete_count: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub slow_get_count: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub slow_put_count: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub slow_increment_count: f64,
}

impl JmxBean for RegionServerMetrics {
    const SUBSYSTEM: &'static str = "server";
    const QUERY: &'static str = "Hadoop:service=HBase,name=RegionServer,sub=Server";

    fn host(&self) -> &str {
        &self.host
    }

    fn role(&self) -> &str {
        &self.role
    }

    fn metrics() -> Vec<FieldMetric<Self>> {
        let gauge = FieldMetric::<Self>::gauge;
        vec![
            gauge("mem_store_size", "Size of all memstores in bytes.", |m| m.mem_store_size),
            gauge("region_count", "Number of regions hosted.", |m| m.region_count),
            gauge("store_count", "Number of stores.", |m| m.store_count),
            gauge("store_file_count", "Number of store files.", |m| m.store_file_count),
            gauge("store_file_size", "Size of all store files in bytes.", |m| m.store_file_size),
            gauge("total_request_count", "Total number of requests served.", |m| {
                m.total_request_count
            }),
            gauge("split_queue_length", "Length of the split queue.", |m| m.split_queue_length),
            gauge("compaction_queue_length", "Length of the compaction queue.", |m| {
                m.compaction_queue_length
            }),
            gauge("flush_queue_length", "Length of the flush queue.", |m| m.flush_queue_length),
            gauge("block_count_hit_percent", "Block cache hit percentage.", |m| {
                m.block_count_hit_percent
            }),
            gauge("slow_append_count", "Number of slow append operations.", |m| {
                m.slow_append_count
            }),
            gauge("slow_delete_count", "Number of slow delete operations.", |m| {
                m.slow_delete_count
            }),
            gauge("slow_get_count", "Number of slow get operations.", |m| m.slow_get_count),
            gauge("slow_put_count", "Number of slow put operations.", |m| m.slow_put_count),
            gauge("slow_increment_count", "Number of slow increment operations.", |m| {
                m.slow_increment_count
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_attributes() {
        let body = br#"{"beans": [{
            "tag.Hostname": "rs1.example.com",
            "tag.Context": "regionserver",
            "memStoreSize": 1024,
            "blockCountHitPercent": 97.5,
            "slowGetCount": 2
        }]}"#;
        let record: RegionServerMetrics = crate::collector::decode_bean(body).unwrap();

        assert_eq!(record.host, "rs1.example.com");
        assert_eq!(record.mem_store_size, 1024.0);
        assert_eq!(record.block_count_hit_percent, 97.5);
        assert_eq!(record.slow_get_count, 2.0);
        assert_eq!(record.flush_queue_length, 0.0);
    }

    #[test]
    fn test_descriptor_table_names() {
        let names: Vec<String> = RegionServerMetrics::metrics()
            .iter()
            .map(|m| m.desc.name().to_string())
            .collect();
        assert_eq!(names.len(), 15);
        assert!(names.contains(&"hbase_server_mem_store_size".to_string()));
        assert!(names.contains(&"hbase_server_slow_increment_count".to_string()));
    }
}
