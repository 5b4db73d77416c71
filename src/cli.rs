//! Offline commands behind the `check` and `resolve` subcommands.
//!
//! Each command returns the text the binary prints, so it can be tested
//! without spawning a process.

use std::fmt::Write as _;
use std::path::Path;

use thiserror::Error;

use crate::config::{load_config, ConfigError, ServerConfig};
use crate::routing::{CompileError, MatcherList, NoMatch};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    NoMatch(#[from] NoMatch),

    #[error("failed to encode result: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to format report: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Load and compile `path`, listing every entry with its derived regex.
pub fn check_report(path: &Path) -> Result<String, CliError> {
    let config = load_config(path)?;
    let matchers = MatcherList::compile(&config.gopkg)?;

    let mut out = String::new();
    writeln!(out, "{}: {} gopkg entries", path.display(), matchers.len())?;
    for (i, m) in matchers.iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. {} -> {} ({})  regex: {}",
            i + 1,
            m.path_template(),
            m.uri_template(),
            m.vcs(),
            m.as_regex().as_str()
        )?;
    }
    write_settings(&mut out, &config)?;
    Ok(out)
}

fn write_settings(out: &mut String, config: &ServerConfig) -> std::fmt::Result {
    writeln!(out, "  listen: {}", config.listener.bind_address)?;
    writeln!(out, "  watch:  {}", config.reload.watch)
}

/// Resolve one request against the entries in `path` and encode the result as JSON.
pub fn resolve_json(path: &Path, host: &str, request_path: &str) -> Result<String, CliError> {
    let config = load_config(path)?;
    let matchers = MatcherList::compile(&config.gopkg)?;

    let vars = matchers.resolve(host, request_path)?;
    Ok(serde_json::to_string_pretty(&vars)?)
}
