//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every `gopkg` entry: argument count and pattern compilation
//! - Validate value ranges (timeouts > 0, addresses well formed)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::routing::{CompileError, CompiledMatcher};

#[derive(Debug, Error)]
pub enum ValidationError {
    /// A `gopkg` entry (1-based) is malformed or does not compile.
    #[error("gopkg entry {entry}: {source}")]
    Entry {
        entry: usize,
        #[source]
        source: CompileError,
    },

    #[error("invalid bind address `{0}`")]
    BindAddress(String),

    #[error("invalid metrics address `{0}`")]
    MetricsAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("fallback status {0} is not a valid HTTP status")]
    FallbackStatus(u16),
}

pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (index, args) in config.gopkg.iter().enumerate() {
        if let Err(source) = CompiledMatcher::from_args(args.as_slice()) {
            errors.push(ValidationError::Entry {
                entry: index + 1,
                source,
            });
        }
    }

    if !is_host_port(&config.listener.bind_address) {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if !(100..=599).contains(&config.fallback.status) {
        errors.push(ValidationError::FallbackStatus(config.fallback.status));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `host:port` with a numeric port; the host is resolved at bind time.
fn is_host_port(address: &str) -> bool {
    if address.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match address.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => false,
    }
}
