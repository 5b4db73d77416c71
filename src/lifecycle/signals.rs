//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT/SIGTERM and let the server drain
//! - Turn SIGHUP into a configuration reload
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP triggers config reload, not shutdown

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;

/// Resolves when Ctrl+C (or SIGTERM on Unix) is received.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("Shutdown signal received");
}

/// Reload `path` into `tx` every time the process receives SIGHUP.
#[cfg(unix)]
pub fn spawn_reload_on_hangup(
    path: PathBuf,
    tx: mpsc::UnboundedSender<ServerConfig>,
) -> JoinHandle<()> {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGHUP handler");
                return;
            }
        };
        while hangup.recv().await.is_some() {
            tracing::info!(path = %path.display(), "SIGHUP received, reloading configuration");
            crate::config::watcher::reload_into(&path, &tx);
        }
    })
}

/// SIGHUP does not exist here; the task ends immediately.
#[cfg(not(unix))]
pub fn spawn_reload_on_hangup(
    _path: PathBuf,
    _tx: mpsc::UnboundedSender<ServerConfig>,
) -> JoinHandle<()> {
    tokio::spawn(async {})
}
