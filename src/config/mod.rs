//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML or gopkg directives)
//!     → loader.rs (parse & deserialize)
//!     → directive.rs (tokenize directive lines)
//!     → validation.rs (argument counts, pattern compilation, ranges)
//!     → ServerConfig (validated, immutable)
//!
//! On reload signal:
//!     watcher.rs detects change (or SIGHUP)
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → HttpServer compiles a new MatcherList
//!     → atomic swap in routing::RouteTable
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - A load with any error installs nothing

pub mod directive;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError, ConfigFormat};
pub use schema::{
    FallbackConfig, ListenerConfig, LogFormat, ObservabilityConfig, ReloadConfig, ServerConfig,
    TimeoutConfig,
};
pub use validation::ValidationError;
