//! Composite per-region attribute names
//!
//! The region-server `sub=Regions` bean flattens namespace, table, region
//! and metric into one attribute name:
//!
//! ```text
//! Namespace_<ns>_table_<table>_region_<region>_metric_<metric>
//! ```
//!
//! Decomposition is left to right on the first occurrence of each
//! separator, so it is only unambiguous when no dimension value contains
//! `_table_`, `_region_` or `_metric_`.

use std::fmt;

use crate::error::MalformedKeyError;

/// Leading token of every composite region attribute
pub const NAMESPACE_PREFIX: &str = "Namespace_";
const TABLE_SEPARATOR: &str = "_table_";
const REGION_SEPARATOR: &str = "_region_";
const METRIC_SEPARATOR: &str = "_metric_";

/// A decomposed region attribute name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionKey {
    pub namespace: String,
    pub table: String,
    pub region: String,
    pub metric: String,
}

impl RegionKey {
    /// Whether `attribute` is a candidate composite key at all
    pub fn is_candidate(attribute: &str) -> bool {
        attribute.starts_with(NAMESPACE_PREFIX)
    }

    /// Decompose an attribute name
    ///
    /// # Errors
    /// Returns [`MalformedKeyError`] naming the first separator that is
    /// absent from the remaining substring.
    pub fn parse(attribute: &str) -> Result<Self, MalformedKeyError> {
        let missing = |separator: &'static str| MalformedKeyError {
            key: attribute.to_string(),
            separator,
        };

        let rest = attribute
            .strip_prefix(NAMESPACE_PREFIX)
            .ok_or_else(|| missing(NAMESPACE_PREFIX))?;
        let (namespace, rest) = rest
            .split_once(TABLE_SEPARATOR)
            .ok_or_else(|| missing(TABLE_SEPARATOR))?;
        let (table, rest) = rest
            .split_once(REGION_SEPARATOR)
            .ok_or_else(|| missing(REGION_SEPARATOR))?;
        let (region, metric) = rest
            .split_once(METRIC_SEPARATOR)
            .ok_or_else(|| missing(METRIC_SEPARATOR))?;

        Ok(Self {
            namespace: namespace.to_string(),
            table: table.to_string(),
            region: region.to_string(),
            metric: metric.to_string(),
        })
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}{}{}{}",
            NAMESPACE_PREFIX,
            self.namespace,
            TABLE_SEPARATOR,
            self.table,
            REGION_SEPARATOR,
            self.region,
            METRIC_SEPARATOR,
            self.metric
        )
    }
}

/// A decomposed key with its numeric value, buffered for one cycle
#[derive(Debug, Clone, PartialEq)]
pub struct RegionEntry {
    pub key: RegionKey,
    pub value: f64,
}
