//! Constant `hbase_exporter_build_info` family

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::Collector;
use crate::metrics::{MetricDesc, Sample};

/// Reports the exporter version as a constant gauge
pub struct BuildInfoCollector {
    desc: Arc<MetricDesc>,
}

impl BuildInfoCollector {
    pub fn new() -> Self {
        Self {
            desc: Arc::new(MetricDesc::new(
                "hbase_exporter_build_info",
                "A metric with a constant '1' value labeled by the version of hbase-exporter.",
                &["version"],
            )),
        }
    }
}

impl Default for BuildInfoCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Collector for BuildInfoCollector {
    fn subsystem(&self) -> &'static str {
        "exporter"
    }

    fn describe(&self) -> Vec<Arc<MetricDesc>> {
        vec![Arc::clone(&self.desc)]
    }

    async fn collect(&self, _cancel: &CancellationToken) -> Vec<Sample> {
        vec![Sample::gauge(
            &self.desc,
            1.0,
            vec![env!("CARGO_PKG_VERSION").to_string()],
        )]
    }
}
