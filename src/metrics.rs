//! Metric descriptors, samples and per-collector scrape bookkeeping
//!
//! A [`MetricDesc`] is created once when a collector is constructed and is
//! shared by every [`Sample`] emitted for that family afterwards.
//!
//! # Bookkeeping families
//!
//! Every collector owns a [`ScrapeStatus`] exposing:
//! - `hbase_<subsystem>_up` - Gauge, 1 if the last cycle succeeded
//! - `hbase_<subsystem>_total_scrapes` - Counter of started cycles
//! - `hbase_<subsystem>_json_parse_failures` - Counter of decode failures

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use regex::Regex;

/// Metric namespace shared by every family this exporter exposes
pub const NAMESPACE: &str = "hbase";

/// Join namespace, subsystem and name with underscores, skipping empty parts
pub fn build_fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

fn is_valid_metric_name(name: &str) -> bool {
    static METRIC_NAME_RE: OnceLock<Regex> = OnceLock::new();
    METRIC_NAME_RE
        .get_or_init(|| Regex::new(r"^[a-zA-Z_:][a-zA-Z0-9_:]*$").expect("invalid metric name regex"))
        .is_match(name)
}

fn is_valid_label_name(name: &str) -> bool {
    static LABEL_NAME_RE: OnceLock<Regex> = OnceLock::new();
    LABEL_NAME_RE
        .get_or_init(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("invalid label name regex"))
        .is_match(name)
}

/// Prometheus value type of a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    /// A value that can go up and down
    #[default]
    Gauge,
    /// A monotonically increasing value
    Counter,
}

impl ValueKind {
    /// Returns the Prometheus type string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Gauge => "gauge",
            ValueKind::Counter => "counter",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable metric family metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDesc {
    name: String,
    help: String,
    label_names: Vec<&'static str>,
}

impl MetricDesc {
    /// Create a descriptor.
    ///
    /// Descriptors are built from static tables, so an invalid metric or
    /// label name is a programming error and panics.
    pub fn new(name: impl Into<String>, help: impl Into<String>, label_names: &[&'static str]) -> Self {
        let name = name.into();
        assert!(is_valid_metric_name(&name), "invalid metric name '{}'", name);
        for label in label_names {
            assert!(is_valid_label_name(label), "invalid label name '{}'", label);
        }

        Self {
            name,
            help: help.into(),
            label_names: label_names.to_vec(),
        }
    }

    /// Shorthand for `MetricDesc::new(build_fq_name(NAMESPACE, subsystem, name), ..)`
    pub fn hbase(subsystem: &str, name: &str, help: impl Into<String>, label_names: &[&'static str]) -> Self {
        Self::new(build_fq_name(NAMESPACE, subsystem, name), help, label_names)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Ordered label-name schema
    pub fn label_names(&self) -> &[&'static str] {
        &self.label_names
    }
}

/// One observation produced during a scrape cycle
#[derive(Debug, Clone)]
pub struct Sample {
    /// Family this sample belongs to
    pub desc: Arc<MetricDesc>,
    /// Observed value
    pub value: f64,
    /// Label values, in the order of `desc.label_names()`
    pub label_values: Vec<String>,
    /// Value type
    pub kind: ValueKind,
}

impl Sample {
    /// Create a gauge sample
    pub fn gauge(desc: &Arc<MetricDesc>, value: f64, label_values: Vec<String>) -> Self {
        Self {
            desc: Arc::clone(desc),
            value,
            label_values,
            kind: ValueKind::Gauge,
        }
    }

    /// Create a counter sample
    pub fn counter(desc: &Arc<MetricDesc>, value: f64, label_values: Vec<String>) -> Self {
        Self {
            desc: Arc::clone(desc),
            value,
            label_values,
            kind: ValueKind::Counter,
        }
    }

    /// Look up a label value by name
    pub fn label(&self, name: &str) -> Option<&str> {
        self.desc
            .label_names()
            .iter()
            .position(|l| *l == name)
            .and_then(|i| self.label_values.get(i))
            .map(String::as_str)
    }
}

/// Thread-safe counter using atomic operations
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Create a new counter initialized to 0
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    /// Increment the counter by 1
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current value
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Thread-safe gauge using atomic operations
#[derive(Debug, Default)]
pub struct Gauge {
    /// Stored as bits of f64 for atomic operations
    value: AtomicU64,
}

impl Gauge {
    /// Create a new gauge initialized to 0
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0.0_f64.to_bits()),
        }
    }

    /// Set the gauge to a specific value
    pub fn set(&self, v: f64) {
        self.value.store(v.to_bits(), Ordering::Relaxed);
    }

    /// Get the current value
    pub fn get(&self) -> f64 {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }
}

/// Up indicator and scrape counters owned by one collector instance
#[derive(Debug)]
pub struct ScrapeStatus {
    up: Gauge,
    total_scrapes: Counter,
    parse_failures: Counter,
    up_desc: Arc<MetricDesc>,
    total_scrapes_desc: Arc<MetricDesc>,
    parse_failures_desc: Arc<MetricDesc>,
}

impl ScrapeStatus {
    /// Create bookkeeping for `hbase_<subsystem>_*`
    pub fn new(subsystem: &str) -> Self {
        Self {
            up: Gauge::new(),
            total_scrapes: Counter::new(),
            parse_failures: Counter::new(),
            up_desc: Arc::new(MetricDesc::hbase(
                subsystem,
                "up",
                format!("Was the last scrape of the HBase {} JMX endpoint successful.", subsystem),
                &[],
            )),
            total_scrapes_desc: Arc::new(MetricDesc::hbase(
                subsystem,
                "total_scrapes",
                format!("Current total HBase {} JMX scrapes.", subsystem),
                &[],
            )),
            parse_failures_desc: Arc::new(MetricDesc::hbase(
                subsystem,
                "json_parse_failures",
                "Number of errors while parsing JSON.",
                &[],
            )),
        }
    }

    /// Mark the start of a cycle
    pub fn begin_cycle(&self) {
        self.total_scrapes.inc();
    }

    /// Record a successful cycle
    pub fn mark_up(&self) {
        self.up.set(1.0);
    }

    /// Record a failed cycle
    pub fn mark_down(&self, parse_failure: bool) {
        if parse_failure {
            self.parse_failures.inc();
        }
        self.up.set(0.0);
    }

    pub fn is_up(&self) -> bool {
        self.up.get() == 1.0
    }

    pub fn total_scrapes(&self) -> u64 {
        self.total_scrapes.get()
    }

    pub fn parse_failures(&self) -> u64 {
        self.parse_failures.get()
    }

    /// The three bookkeeping descriptors
    pub fn describe(&self) -> Vec<Arc<MetricDesc>> {
        vec![
            Arc::clone(&self.up_desc),
            Arc::clone(&self.total_scrapes_desc),
            Arc::clone(&self.parse_failures_desc),
        ]
    }

    /// Current values of the three bookkeeping families
    pub fn samples(&self) -> Vec<Sample> {
        vec![
            Sample::gauge(&self.up_desc, self.up.get(), vec![]),
            Sample::counter(&self.total_scrapes_desc, self.total_scrapes.get() as f64, vec![]),
            Sample::counter(&self.parse_failures_desc, self.parse_failures.get() as f64, vec![]),
        ]
    }
}
