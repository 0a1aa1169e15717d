//! Error types for hbase-exporter
//!
//! This module defines the error types used throughout the application.

use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Collector construction error
    #[error("Collector error: {0}")]
    Collector(#[from] CollectorError),

    /// Collector registration error
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while fetching or decoding one JMX snapshot
#[derive(Error, Debug)]
pub enum CollectorError {
    /// HTTP client could not be built
    #[error("Failed to initialize HTTP client: {0}")]
    HttpClientInit(#[source] reqwest::Error),

    /// Endpoint URL could not be parsed
    #[error("Invalid endpoint URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Connection, DNS or body transfer failure
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-200 response
    #[error("HTTP error status: {0}")]
    HttpStatus(u16),

    /// The value is the configured timeout in milliseconds, if known.
    #[error("Request timed out{}", .0.map(|ms| format!(" after {}ms", ms)).unwrap_or_default())]
    Timeout(Option<u64>),

    /// The cycle was cancelled before the fetch completed
    #[error("Request cancelled")]
    Cancelled,

    /// Snapshot body could not be decoded
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

impl CollectorError {
    /// Whether this error counts towards `<subsystem>_json_parse_failures`
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, CollectorError::Parse(_))
    }

    /// HTTP 상태 코드 추출
    pub fn http_status(&self) -> Option<u16> {
        match self {
            CollectorError::HttpStatus(code) => Some(*code),
            _ => None,
        }
    }

    /// Create a Timeout error with known duration
    pub fn timeout_with_duration(ms: u64) -> Self {
        CollectorError::Timeout(Some(ms))
    }
}

impl From<reqwest::Error> for CollectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest doesn't expose the configured timeout; the client
            // uses timeout_with_duration() where it is known.
            CollectorError::Timeout(None)
        } else {
            CollectorError::Transport(err)
        }
    }
}

/// Bean envelope decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Body is not JSON of the expected shape
    #[error("Malformed JMX response: {0}")]
    Malformed(String),

    /// `beans` array was present but empty
    #[error("JMX response contained an empty beans array")]
    EmptyBeanArray,
}

/// A composite region attribute name lacked an expected separator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed region attribute '{key}': missing '{separator}'")]
pub struct MalformedKeyError {
    /// The offending attribute name
    pub key: String,
    /// The separator that could not be found
    pub separator: &'static str,
}

/// Collector registration errors
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Two collectors describe the same metric family
    #[error("Descriptor '{0}' is already registered")]
    DuplicateDescriptor(String),

    /// A collector described the same family twice
    #[error("Collector '{collector}' describes '{name}' more than once")]
    InconsistentCollector { collector: String, name: String },
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;
