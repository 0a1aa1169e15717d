//! CLI argument parsing for hbase-exporter
//!
//! This module provides the command-line interface using clap derive macros.
//!
//! # Options
//!
//! - `--config` / `-c`: Configuration file path (default: config.yaml, env: HBASE_EXPORTER_CONFIG)
//! - `--port` / `-p`: Server port (overrides config file, env: WEB_LISTEN_PORT)
//! - `--bind-address`: Server bind address (env: WEB_BIND_ADDRESS)
//! - `--metrics-path`: Metrics endpoint path (env: WEB_TELEMETRY_PATH)
//! - `--master-url`: JMX servlet URL of the master (env: HBASE_MASTER_URL)
//! - `--regionserver-url`: JMX servlet URL of the region server (env: HBASE_REGIONSERVER_URL)
//! - `--master`: Export master metrics instead of region server metrics (env: HBASE_IS_MASTER)
//! - `--timeout`: JMX request timeout in milliseconds (env: HBASE_JMX_TIMEOUT)
//! - `--validate`: Validate configuration, print it and exit
//! - `--log-level` / `-l`: Log level (trace/debug/info/warn/error, env: LOG_LEVEL)
//! - `--log-format`: Log output format (text/json, env: LOG_FMT)
//! - `--log-output`: Log stream (stdout/stderr, env: LOG_OUTPUT)
//!
//! # Precedence
//!
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// hbase-exporter - Prometheus exporter for HBase JMX metrics
///
/// Polls the JMX JSON servlet of an HBase master or region server on every
/// scrape and exposes the values in Prometheus format.
#[derive(Parser, Debug)]
#[command(name = "hbase-exporter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.yaml",
        env = "HBASE_EXPORTER_CONFIG"
    )]
    pub config: PathBuf,

    /// Server port (overrides config file)
    #[arg(short, long, value_name = "PORT", env = "WEB_LISTEN_PORT")]
    pub port: Option<u16>,

    /// Server bind address (overrides config file)
    /// Supported values: IP addresses (0.0.0.0, 127.0.0.1, ::1) or "localhost"
    #[arg(long, value_name = "ADDRESS", env = "WEB_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Metrics endpoint path (overrides config file)
    #[arg(long, value_name = "PATH", env = "WEB_TELEMETRY_PATH")]
    pub metrics_path: Option<String>,

    /// JMX servlet URL of the HBase master
    #[arg(long, value_name = "URL", env = "HBASE_MASTER_URL")]
    pub master_url: Option<String>,

    /// JMX servlet URL of the HBase region server
    #[arg(long, value_name = "URL", env = "HBASE_REGIONSERVER_URL")]
    pub regionserver_url: Option<String>,

    /// Export master metrics (true) or region server metrics (false)
    #[arg(long, value_name = "BOOL", env = "HBASE_IS_MASTER")]
    pub master: Option<bool>,

    /// JMX request timeout in milliseconds (overrides config file)
    #[arg(long, value_name = "MS", env = "HBASE_JMX_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Validate configuration, print the effective values and exit
    #[arg(long)]
    pub validate: bool,

    /// Log level
    #[arg(short, long, value_enum, default_value = "info", env = "LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", env = "LOG_FMT")]
    pub log_format: LogFormat,

    /// Stream log lines are written to
    #[arg(long, value_enum, default_value = "stdout", env = "LOG_OUTPUT")]
    pub log_output: LogOutput,
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level - default
    Info,
    /// Warn level
    Warn,
    /// Error level - least verbose
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Log output formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[value(alias = "logfmt")]
    Text,
    /// One JSON object per line
    Json,
}

/// Log output streams
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogOutput {
    Stdout,
    Stderr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Trace.to_string(), "trace");
        assert_eq!(LogLevel::Info.to_string(), "info");
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(tracing::Level::from(LogLevel::Trace), tracing::Level::TRACE);
        assert_eq!(tracing::Level::from(LogLevel::Debug), tracing::Level::DEBUG);
        assert_eq!(tracing::Level::from(LogLevel::Info), tracing::Level::INFO);
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(tracing::Level::from(LogLevel::Error), tracing::Level::ERROR);
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["hbase-exporter"]);
        assert_eq!(cli.config, PathBuf::from("config.yaml"));
        assert_eq!(cli.port, None);
        assert_eq!(cli.bind_address, None);
        assert_eq!(cli.metrics_path, None);
        assert_eq!(cli.master_url, None);
        assert_eq!(cli.regionserver_url, None);
        assert_eq!(cli.master, None);
        assert_eq!(cli.timeout, None);
        assert!(!cli.validate);
        assert_eq!(cli.log_level, LogLevel::Info);
        assert_eq!(cli.log_format, LogFormat::Text);
        assert_eq!(cli.log_output, LogOutput::Stdout);
    }

    #[test]
    fn test_cli_with_options() {
        let cli = Cli::parse_from([
            "hbase-exporter",
            "-c",
            "custom.yaml",
            "-p",
            "8080",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--validate",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.yaml"));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.validate);
    }

    #[test]
    fn test_cli_hbase_options() {
        let cli = Cli::parse_from([
            "hbase-exporter",
            "--master",
            "false",
            "--regionserver-url",
            "http://rs1:16030/jmx",
            "--timeout",
            "750",
        ]);
        assert_eq!(cli.master, Some(false));
        assert_eq!(cli.regionserver_url, Some("http://rs1:16030/jmx".to_string()));
        assert_eq!(cli.timeout, Some(750));
    }

    #[test]
    fn test_log_output_stderr() {
        let cli = Cli::parse_from(["hbase-exporter", "--log-output", "stderr"]);
        assert_eq!(cli.log_output, LogOutput::Stderr);
    }

    #[test]
    fn test_log_format_logfmt_alias() {
        let cli = Cli::parse_from(["hbase-exporter", "--log-format", "logfmt"]);
        assert_eq!(cli.log_format, LogFormat::Text);
    }
}
