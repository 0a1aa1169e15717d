//! Prometheus Exposition Format output
//!
//! This module handles formatting of collected samples into the text
//! exposition format (version 0.0.4).
//!
//! # Format Specification
//!
//! ```text
//! # HELP <metric_name> <help_text>
//! # TYPE <metric_name> <type>
//! <metric_name>{<label1>="<value1>",<label2>="<value2>"} <value>
//! ```

use std::collections::HashMap;

use crate::metrics::Sample;

/// Content type of the rendered output
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Prometheus exposition format formatter
#[derive(Debug, Clone, Default)]
pub struct PrometheusFormatter;

impl PrometheusFormatter {
    /// Create a new formatter
    pub fn new() -> Self {
        Self
    }

    /// Format samples into Prometheus exposition format
    ///
    /// - HELP and TYPE lines are emitted once per family
    /// - Labels follow the family's label schema order
    /// - Families keep the order of their first sample
    pub fn format(&self, samples: &[Sample]) -> String {
        if samples.is_empty() {
            return String::new();
        }

        let mut output = String::with_capacity(samples.len() * 100);

        for (name, group) in Self::group_by_name(samples) {
            let first = group[0];
            output.push_str(&format!(
                "# HELP {} {}\n",
                name,
                Self::escape_help(first.desc.help())
            ));
            output.push_str(&format!("# TYPE {} {}\n", name, first.kind.as_str()));

            for sample in group {
                output.push_str(&Self::format_sample_line(sample));
                output.push('\n');
            }
        }

        output
    }

    /// Group samples by family name, preserving order of first occurrence
    fn group_by_name(samples: &[Sample]) -> Vec<(&str, Vec<&Sample>)> {
        let mut groups: HashMap<&str, Vec<&Sample>> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();

        for sample in samples {
            let name = sample.desc.name();
            if !groups.contains_key(name) {
                order.push(name);
            }
            groups.entry(name).or_default().push(sample);
        }

        order
            .into_iter()
            .filter_map(|name| groups.remove(name).map(|g| (name, g)))
            .collect()
    }

    fn format_sample_line(sample: &Sample) -> String {
        let mut line = sample.desc.name().to_string();

        if !sample.label_values.is_empty() {
            let label_pairs: Vec<String> = sample
                .desc
                .label_names()
                .iter()
                .zip(sample.label_values.iter())
                .map(|(k, v)| format!("{}=\"{}\"", k, Self::escape_label_value(v)))
                .collect();

            line.push('{');
            line.push_str(&label_pairs.join(","));
            line.push('}');
        }

        line.push(' ');
        line.push_str(&Self::format_value(sample.value));
        line
    }

    /// Format a numeric value for Prometheus
    ///
    /// - NaN → "NaN"
    /// - +Inf → "+Inf"
    /// - -Inf → "-Inf"
    /// - Integers are formatted without decimal point
    /// - Large/small floats use scientific notation
    fn format_value(value: f64) -> String {
        if value.is_nan() {
            "NaN".to_string()
        } else if value.is_infinite() {
            if value.is_sign_positive() {
                "+Inf".to_string()
            } else {
                "-Inf".to_string()
            }
        } else if value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{}", value as i64)
        } else if value.abs() >= 1e6 || (value.abs() < 1e-3 && value != 0.0) {
            format!("{:e}", value)
        } else {
            format!("{}", value)
        }
    }

    /// Escapes backslash and newline characters.
    fn escape_help(help: &str) -> String {
        help.replace('\\', "\\\\").replace('\n', "\\n")
    }

    /// Escapes backslash, double-quote, and newline characters.
    fn escape_label_value(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '\\' => escaped.push_str("\\\\"),
                '"' => escaped.push_str("\\\""),
                '\n' => escaped.push_str("\\n"),
                _ => escaped.push(c),
            }
        }
        escaped
    }
}
