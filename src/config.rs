//! Configuration management for hbase-exporter
//!
//! Handles loading and validating configuration from YAML files, and
//! layering CLI/environment overrides on top.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use url::Url;

use crate::cli::Cli;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HBase JMX endpoint configuration
    #[serde(default)]
    pub hbase: HBaseConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Which HBase process this exporter sits next to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// JVM + master server collectors
    Master,
    /// JVM + region server + per-region collectors
    #[default]
    RegionServer,
}

/// HBase JMX endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HBaseConfig {
    /// JMX servlet of the master
    #[serde(default = "default_master_url")]
    pub master_url: String,

    /// JMX servlet of the region server
    #[serde(default = "default_regionserver_url")]
    pub regionserver_url: String,

    /// Process role
    #[serde(default)]
    pub role: Role,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Metrics endpoint path
    #[serde(default = "default_metrics_path")]
    pub path: String,

    /// Server bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

// Default value functions
fn default_master_url() -> String {
    "http://localhost:60010/jmx".to_string()
}

fn default_regionserver_url() -> String {
    "http://localhost:60030/jmx".to_string()
}

fn default_timeout() -> u64 {
    5000
}

fn default_port() -> u16 {
    9115
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

impl Default for HBaseConfig {
    fn default() -> Self {
        Self {
            master_url: default_master_url(),
            regionserver_url: default_regionserver_url(),
            role: Role::default(),
            timeout_ms: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            path: default_metrics_path(),
            bind_address: default_bind_address(),
        }
    }
}

impl HBaseConfig {
    /// JMX URL of the configured role
    pub fn target_url(&self) -> &str {
        match self.role {
            Role::Master => &self.master_url,
            Role::RegionServer => &self.regionserver_url,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// Values are not validated here; CLI/env overrides are applied first
    /// and [`Config::validate`] runs on the merged result.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a YAML file, falling back to defaults if not found
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Apply CLI arguments (and their environment fallbacks) over file values
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(ref bind_address) = cli.bind_address {
            self.server.bind_address = bind_address.clone();
        }
        if let Some(ref path) = cli.metrics_path {
            self.server.path = path.clone();
        }
        if let Some(ref url) = cli.master_url {
            self.hbase.master_url = url.clone();
        }
        if let Some(ref url) = cli.regionserver_url {
            self.hbase.regionserver_url = url.clone();
        }
        if let Some(is_master) = cli.master {
            self.hbase.role = if is_master {
                Role::Master
            } else {
                Role::RegionServer
            };
        }
        if let Some(timeout) = cli.timeout {
            self.hbase.timeout_ms = timeout;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if !self.server.path.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "Metrics path must start with '/'".to_string(),
            ));
        }

        if self.server.path == "/" || self.server.path == "/health" {
            return Err(ConfigError::ValidationError(format!(
                "Metrics path '{}' conflicts with a built-in route",
                self.server.path
            )));
        }

        if self.hbase.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "JMX timeout must be greater than 0".to_string(),
            ));
        }

        for (name, value) in [
            ("master_url", &self.hbase.master_url),
            ("regionserver_url", &self.hbase.regionserver_url),
        ] {
            let url = Url::parse(value).map_err(|e| {
                ConfigError::ValidationError(format!("Invalid {} '{}': {}", name, value, e))
            })?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ConfigError::ValidationError(format!(
                    "{} must use http or https, got '{}'",
                    name,
                    url.scheme()
                )));
            }
        }

        Ok(())
    }
}
