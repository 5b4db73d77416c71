//! Vanity import path redirector.
//!
//! Answers `go get` for import paths on a custom host by pointing them at
//! the repository that really holds the code.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request (host, path, ?go-get=1)
//!         │
//!         ▼
//!   ┌─────────────┐    ┌──────────────┐    ┌────────────────────┐
//!   │ http server │───▶│ vanity layer │───▶│ routing::RouteTable │
//!   │  (axum)     │    │              │◀───│  (ArcSwap snapshot) │
//!   └─────────────┘    └──────┬───────┘    └─────────▲──────────┘
//!                             │                      │ publish
//!              ┌──────────────┼─────────────┐        │
//!              ▼              ▼             ▼   ┌────┴─────┐
//!          307 redirect   200 go-import   next  │  config  │◀── file watcher
//!                         metadata page  handler│  loader  │◀── SIGHUP
//!                                               └──────────┘
//! ```

use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use vanity_import::cli;
use vanity_import::config::load_config;
use vanity_import::config::watcher::ConfigWatcher;
use vanity_import::lifecycle::{signals, startup, Shutdown};
use vanity_import::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "vanity-import")]
#[command(about = "Vanity import path redirector for go get", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve redirects and import metadata
    Serve {
        /// TOML config, or a file of `gopkg` directives
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration and list its entries
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Resolve one request path and print the result as JSON
    Resolve {
        #[arg(short, long)]
        config: PathBuf,

        /// Request host
        #[arg(long, default_value = "localhost")]
        host: String,

        /// Request path, e.g. /github/user/repo/subpkg
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(config).await,
        Commands::Check { config } => check(config),
        Commands::Resolve { config, host, path } => resolve(config, &host, &path),
    }
}

async fn serve(path: PathBuf) -> Result<(), Box<dyn Error>> {
    let config = load_config(&path)?;
    logging::init(&config.observability)?;

    tracing::info!("vanity-import v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let server = startup::build(config)?;
    let listener = startup::bind(server.config()).await?;

    // Keep the watcher alive for the whole run.
    let (watcher, config_updates) = ConfigWatcher::new(&path);
    let _hangup = signals::spawn_reload_on_hangup(path.clone(), watcher.sender());
    let _watch_handle = if server.config().reload.watch {
        Some(watcher.run()?)
    } else {
        None
    };

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn check(path: PathBuf) -> Result<(), Box<dyn Error>> {
    print!("{}", cli::check_report(&path)?);
    Ok(())
}

fn resolve(path: PathBuf, host: &str, request_path: &str) -> Result<(), Box<dyn Error>> {
    println!("{}", cli::resolve_json(&path, host, request_path)?);
    Ok(())
}
