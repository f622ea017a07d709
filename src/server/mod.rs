//! HTTP surface for title lookups
//!
//! This module exposes the orchestrator over HTTP:
//! - `GET /I/want/title?address=...` renders an HTML list of titles
//! - every other route answers 404

mod render;
mod routes;

pub use render::{render_titles, INTERNAL_ERROR_PAGE, NOT_FOUND_BODY, NO_ADDRESSES_PAGE};
pub use routes::{collect_addresses, router, ADDRESS_PARAM, TITLE_ROUTE};

use crate::config::{Config, ServerConfig};
use crate::fetch::Orchestrator;
use crate::{ConfigError, ScoutError};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;

/// State shared by request handlers
#[derive(Debug, Clone)]
pub struct AppState {
    orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Builds the state, including the outbound HTTP client, from configuration
    pub fn from_config(config: &Config) -> Result<Self, ScoutError> {
        Ok(Self::new(Orchestrator::from_settings(&config.fetcher)?))
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }
}

/// Binds the listener described by the `[server]` section
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ScoutError> {
    let ip: IpAddr = config.bind_address.parse().map_err(|_| {
        ConfigError::Validation(format!(
            "bind_address must be an IP address, got '{}'",
            config.bind_address
        ))
    })?;
    Ok(TcpListener::bind(SocketAddr::new(ip, config.port)).await?)
}

/// Serves requests until Ctrl-C is received
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), ScoutError> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
