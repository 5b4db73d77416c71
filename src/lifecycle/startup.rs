//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Compile the first matcher list
//! - Bind the listener last (traffic only when ready)
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Nothing is served from a partially valid configuration

use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError, ServerConfig};
use crate::http::HttpServer;
use crate::routing::CompileError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("pattern error: {0}")]
    Compile(#[from] CompileError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Load `path` and build a server from it.
pub fn prepare(path: &Path) -> Result<HttpServer, StartupError> {
    let config = load_config(path)?;
    build(config)
}

/// Build a server from an already loaded configuration.
pub fn build(config: ServerConfig) -> Result<HttpServer, StartupError> {
    let server = HttpServer::new(config)?;
    tracing::info!(
        bind_address = %server.config().listener.bind_address,
        entries = server.config().gopkg.len(),
        request_timeout_secs = server.config().timeouts.request_secs,
        "Configuration loaded"
    );
    Ok(server)
}

/// Bind the configured listener address.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, StartupError> {
    let address = config.listener.bind_address.clone();
    TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}
