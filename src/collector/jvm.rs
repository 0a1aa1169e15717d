//! JVM metrics of an HBase process (`name=JvmMetrics`)

use serde::Deserialize;

use super::bean::{BeanCollector, FieldMetric, JmxBean};
use super::parser::lenient_f64;

/// JVM collector, valid against both master and region-server endpoints
pub type JvmCollector = BeanCollector<JvmMetrics>;

/// `Hadoop:service=HBase,name=JvmMetrics`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JvmMetrics {
    #[serde(rename = "tag.Hostname")]
    pub host: String,
    #[serde(rename = "tag.ProcessName")]
    pub role: String,
    #[serde(rename = "MemNonHeapUsedM", deserialize_with = "lenient_f64")]
    pub mem_non_heap_used_m: f64,
    #[serde(rename = "MemHeapUsedM", deserialize_with = "lenient_f64")]
    pub mem_heap_used_m: f64,
    #[serde(rename = "MemHeapMaxM", deserialize_with = "lenient_f64")]
    pub mem_heap_max_m: f64,
    #[serde(rename = "MemMaxM", deserialize_with = "lenient_f64")]
    pub mem_max_m: f64,
    #[serde(rename = "GcTimeMillis", deserialize_with = "lenient_f64")]
    pub gc_time_millis: f64,
    #[serde(rename = "GcCount", deserialize_with = "lenient_f64")]
    pub gc_count: f64,
    #[serde(rename = "ThreadsBlocked", deserialize_with = "lenient_f64")]
    pub threads_blocked: f64,
}

impl JmxBean for JvmMetrics {
    const SUBSYSTEM: &'static str = "jvm";
    const QUERY: &'static str = "Hadoop:service=HBase,name=JvmMetrics";

    fn host(&self) -> &str {
        &self.host
    }

    fn role(&self) -> &str {
        &self.role
    }

    fn metrics() -> Vec<FieldMetric<Self>> {
        let gauge = FieldMetric::<Self>::gauge;
        vec![
            gauge(
                "mem_non_heap_used_m",
                "Non-heap memory used in MB.",
                |m| m.mem_non_heap_used_m,
            ),
            gauge("mem_heap_used_m", "Heap memory used in MB.", |m| {
                m.mem_heap_used_m
            }),
            gauge("mem_heap_max_m", "Maximum heap memory in MB.", |m| {
                m.mem_heap_max_m
            }),
            gauge("mem_max_m", "Maximum memory the JVM may use in MB.", |m| {
                m.mem_max_m
            }),
            gauge(
                "gc_time_millis",
                "Total time spent in garbage collection in milliseconds.",
                |m| m.gc_time_millis,
            ),
            gauge("gc_count", "Total number of garbage collections.", |m| {
                m.gc_count
            }),
            gauge("thread_blocked", "Number of threads in BLOCKED state.", |m| {
                m.threads_blocked
            }),
        ]
    }
}
