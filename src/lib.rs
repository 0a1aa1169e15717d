//! hbase-exporter library
//!
//! Collects HBase master and region server metrics from the JMX JSON
//! servlet and exports them in Prometheus format.

pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod exposition;
pub mod metrics;
pub mod registry;
pub mod server;

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{LogFormat, LogOutput};

/// Initialize the logging subsystem
///
/// # Arguments
/// * `level` - Default level; `RUST_LOG` takes precedence when set
/// * `format` - Text or JSON lines
/// * `output` - Stream the log lines are written to
///
/// # Errors
/// Returns an error if the logging system fails to initialize
pub fn init_logging(level: tracing::Level, format: LogFormat, output: LogOutput) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let writer = match output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
