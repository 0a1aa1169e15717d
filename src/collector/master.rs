//! Master server metrics (`name=Master,sub=Server`)

use serde::Deserialize;

use super::bean::{BeanCollector, FieldMetric, JmxBean};
use super::parser::lenient_f64;

/// Collector for the active or backup master
pub type MasterServerCollector = BeanCollector<MasterServerMetrics>;

/// `Hadoop:service=HBase,name=Master,sub=Server`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MasterServerMetrics {
    #[serde(rename = "tag.Hostname")]
    pub host: String,
    #[serde(rename = "tag.Context")]
    pub role: String,
    #[serde(rename = "numRegionServers", deserialize_with = "lenient_f64")]
    pub num_region_servers: f64,
    #[serde(rename = "numDeadRegionServers", deserialize_with = "lenient_f64")]
    pub num_dead_region_servers: f64,
    /// JMX renders this flag as the string "true" or "false"
    #[serde(rename = "tag.isActiveMaster")]
    pub is_active_master: String,
    #[serde(rename = "averageLoad", deserialize_with = "lenient_f64")]
    pub average_load: f64,
}

impl MasterServerMetrics {
    pub fn is_active(&self) -> bool {
        self.is_active_master.eq_ignore_ascii_case("true")
    }
}

impl JmxBean for MasterServerMetrics {
    const SUBSYSTEM: &'static str = "server";
    const QUERY: &'static str = "Hadoop:service=HBase,name=Master,sub=Server";

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
                "average_load",
                "Average number of regions per region server.",
                |m| m.average_load,
            ),
            gauge(
                "num_regionservers",
                "Number of live region servers.",
                |m| m.num_region_servers,
            ),
            gauge(
                "num_dead_regionserver",
                "Number of dead region servers.",
                |m| m.num_dead_region_servers,
            ),
            gauge(
                "is_active_master",
                "Whether this master is the active master (1) or a backup (0).",
                |m| if m.is_active() { 1.0 } else { 0.0 },
            ),
        ]
    }
}
