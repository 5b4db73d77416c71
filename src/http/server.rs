//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the vanity layer and fallback
//! - Wire up middleware (tracing, timeout, request ID)
//! - Apply configuration updates by publishing new matcher lists
//! - Serve until the shutdown broadcast fires

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::request::MakeRequestUuid;
use crate::http::vanity;
use crate::observability::metrics;
use crate::routing::{CompileError, MatcherList, RouteTable};

/// HTTP server for the vanity redirector.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    table: Arc<RouteTable>,
}

impl HttpServer {
    /// Compile the configured entries and build the router.
    pub fn new(config: ServerConfig) -> Result<Self, CompileError> {
        let matchers = MatcherList::compile(&config.gopkg)?;
        Ok(Self::with_matchers(config, matchers))
    }

    /// Build the server around an already compiled list.
    pub fn with_matchers(config: ServerConfig, matchers: MatcherList) -> Self {
        metrics::set_matcher_count(matchers.len());
        let table = Arc::new(RouteTable::new(matchers));
        let router = Self::build_router(&config, table.clone());
        Self {
            router,
            config,
            table,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, table: Arc<RouteTable>) -> Router {
        vanity::router(table, config.fallback.clone())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for in-process testing or embedding.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// The table requests resolve against.
    pub fn table(&self) -> Arc<RouteTable> {
        self.table.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Every `ServerConfig` received on `config_updates` replaces the matcher
    /// list. Other settings (listener, timeouts, fallback) apply on restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServerConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            entries = self.table.snapshot().len(),
            "HTTP server starting"
        );

        let table = self.table.clone();
        let reloader = tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                apply_update(&table, &new_config);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown requested, draining connections");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Compile the entries of `config` and publish them; keep the current list on error.
pub fn apply_update(table: &RouteTable, config: &ServerConfig) {
    match MatcherList::compile(&config.gopkg) {
        Ok(matchers) => {
            metrics::set_matcher_count(matchers.len());
            metrics::record_reload(true);
            table.publish(matchers);
        }
        Err(e) => {
            metrics::record_reload(false);
            tracing::error!(error = %e, "Rejected configuration update. Keeping current matchers.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(entries: &[&[&str]]) -> ServerConfig {
        ServerConfig {
            gopkg: entries
                .iter()
                .map(|args| args.iter().map(|a| a.to_string()).collect())
                .collect(),
            ..ServerConfig::default()
        }
    }

    #[test]
    fn test_new_rejects_bad_entry() {
        assert!(HttpServer::new(config(&[&["/only"]])).is_err());
    }

    #[test]
    fn test_apply_update() {
        let server = HttpServer::new(config(&[&["/old", "https://example.org/old"]])).unwrap();
        let table = server.table();

        apply_update(&table, &config(&[&["/$2", "https://example.org/$2"]]));
        assert!(table.resolve("h", "/old").is_ok(), "bad update must not replace the list");

        apply_update(&table, &config(&[&["/new", "https://example.org/new"]]));
        assert!(table.resolve("h", "/old").is_err());
        assert_eq!(table.resolve("h", "/new").unwrap().uri, "https://example.org/new");
    }
}
