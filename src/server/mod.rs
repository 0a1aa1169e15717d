//! HTTP server module
//!
//! Provides the Axum-based HTTP server for serving metrics.

pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::collector::{
    BuildInfoCollector, JmxClient, JvmCollector, MasterServerCollector, RegionCollector,
    RegionServerCollector,
};
use crate::config::{Config, Role};
use crate::error::{AppError, AppResult};
use crate::exposition::PrometheusFormatter;
use crate::registry::Registry;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Registered collectors
    pub registry: Arc<Registry>,
    /// Exposition formatter
    pub formatter: PrometheusFormatter,
    /// Cancelled on shutdown; every scrape runs under a child token
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Build the state for `config`, registering the collectors of its role
    pub fn new(config: Config) -> AppResult<Self> {
        let registry = build_registry(&config)?;
        Ok(Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            formatter: PrometheusFormatter::new(),
            shutdown: CancellationToken::new(),
        })
    }
}

/// Register the collectors for the configured role
///
/// - master: build info, JVM, master server
/// - regionserver: build info, JVM, region server, per-region
pub fn build_registry(config: &Config) -> AppResult<Registry> {
    let client = JmxClient::new(config.hbase.target_url(), config.hbase.timeout_ms)?;
    let mut registry = Registry::new();

    registry.register(Arc::new(BuildInfoCollector::new()))?;
    registry.register(Arc::new(JvmCollector::new(client.clone())))?;

    match config.hbase.role {
        Role::Master => {
            registry.register(Arc::new(MasterServerCollector::new(client)))?;
        }
        Role::RegionServer => {
            registry.register(Arc::new(RegionServerCollector::new(client.clone())))?;
            registry.register(Arc::new(RegionCollector::new(client)))?;
        }
    }

    info!(
        role = ?config.hbase.role,
        endpoint = %config.hbase.target_url(),
        collectors = registry.len(),
        "Collectors registered"
    );

    Ok(registry)
}

/// Build the router: `/`, `/health` and the configured metrics path
pub fn router(state: AppState) -> Router {
    let metrics_path = state.config.server.path.clone();

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(&metrics_path, get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server
///
/// # Errors
/// Returns an error if collectors cannot be registered or the server fails
/// to start
pub async fn run(config: Config) -> Result<()> {
    let bind_address = config.server.bind_address.clone();
    let port = config.server.port;
    let metrics_path = config.server.path.clone();

    let state = AppState::new(config)?;
    let shutdown = state.shutdown.clone();
    let app = router(state);

    // "localhost" is accepted in addition to IP literals
    let bind_addr: std::net::IpAddr = if bind_address == "localhost" {
        std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST)
    } else {
        bind_address.parse().map_err(|e| {
            AppError::Internal(format!(
                "Invalid bind_address '{}': {}. Use an IP address (e.g., '0.0.0.0', '127.0.0.1') or 'localhost'.",
                bind_address, e
            ))
        })?
    };
    let addr = SocketAddr::from((bind_addr, port));
    info!(address = %addr, metrics_path = %metrics_path, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal, then cancel in-flight scrapes
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }

    shutdown.cancel();
}
