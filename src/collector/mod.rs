//! HBase JMX 메트릭 수집 모듈
//!
//! Each collector polls one fixed JMX query and turns the snapshot into
//! metric samples.
//!
//! # Example
//!
//! ```ignore
//! use hbase_exporter::collector::{Collector, JmxClient, JvmCollector};
//! use tokio_util::sync::CancellationToken;
//!
//! let client = JmxClient::new("http://localhost:60030/jmx", 5000)?;
//! let jvm = JvmCollector::new(client);
//! let samples = jvm.collect(&CancellationToken::new()).await;
//! ```

mod bean;
mod build_info;
mod client;
mod jvm;
mod master;
mod parser;
mod region_key;
mod rs_region;
mod rs_server;

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::metrics::{MetricDesc, Sample};

pub use bean::{BeanCollector, FieldMetric, JmxBean};
pub use build_info::BuildInfoCollector;
pub use client::JmxClient;
pub use jvm::{JvmCollector, JvmMetrics};
pub use master::{MasterServerCollector, MasterServerMetrics};
pub use parser::{decode_bean, numeric_value, select_bean, Bean, CollectResult};
pub use region_key::{RegionEntry, RegionKey, NAMESPACE_PREFIX};
pub use rs_region::{RegionCollector, REGION_LABELS, REGION_QUERY};
pub use rs_server::{RegionServerCollector, RegionServerMetrics};

/// Label schema of every fixed-schema family
pub const HOST_ROLE_LABELS: &[&str] = &["host", "role"];

/// Two-phase collector contract
///
/// `describe` is static and available before any cycle runs; `collect`
/// performs one fetch/decode/emit cycle. Cycle failures never surface as
/// errors: they are logged and reported through `<subsystem>_up`.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Subsystem name used in metric names and logs
    fn subsystem(&self) -> &'static str;

    /// Every family this collector may emit
    fn describe(&self) -> Vec<Arc<MetricDesc>>;

    /// Run one scrape cycle
    async fn collect(&self, cancel: &CancellationToken) -> Vec<Sample>;
}
