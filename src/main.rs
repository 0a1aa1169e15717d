//! hbase-exporter - Prometheus exporter for HBase
//!
//! This binary serves a Prometheus-compatible metrics endpoint backed by
//! the JMX JSON servlet of an HBase master or region server.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use hbase_exporter::{cli::Cli, config::Config, server};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    hbase_exporter::init_logging(cli.log_level.into(), cli.log_format, cli.log_output)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %cli.log_level,
        "Starting hbase-exporter"
    );

    // File values first, then CLI/env overrides
    let mut config = Config::load_or_default(&cli.config)?;
    config.apply_cli(&cli);
    config.validate()?;

    if cli.validate {
        println!("Configuration is valid");
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    server::run(config).await?;

    Ok(())
}
