//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at config load):
//!     gopkg argument lists
//!     → matcher.rs (templates → anchored regex)
//!     → router.rs (ordered MatcherList)
//!     → table.rs (published as an immutable snapshot)
//!
//! Incoming Request (host, path)
//!     → table.rs (load current snapshot)
//!     → router.rs (first matching entry)
//!     → Return: ResolvedVars or NoMatch
//! ```
//!
//! # Design Decisions
//! - Lists compiled once, immutable at runtime
//! - First match wins, in configured order
//! - Linear scan: entries are operator-written and few
//! - Explicit NoMatch rather than an empty record

use thiserror::Error;

pub mod matcher;
pub mod router;
pub mod table;

pub use matcher::{CompiledMatcher, RouteEntry, Template, DEFAULT_VCS};
pub use router::{MatcherList, ResolvedVars};
pub use table::RouteTable;

/// Errors raised while turning configuration entries into matchers.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The directive did not carry `<path> <uri>` or `<path> <vcs> <uri>`.
    #[error("expected 2 or 3 arguments (`<path> [vcs] <uri>`), got {0}")]
    ArgumentCount(usize),

    #[error("path template is empty")]
    EmptyPath,

    /// Path placeholders must read `$1`, `$2`, ... from left to right.
    #[error("path template `{template}`: expected placeholder ${expected}, found ${found}")]
    PlaceholderOrder {
        template: String,
        expected: usize,
        found: usize,
    },

    /// The URI template refers to a segment the path never captures.
    #[error("uri template `{template}` references ${index}, but the path captures {available} segment(s)")]
    UnknownPlaceholder {
        template: String,
        index: usize,
        available: usize,
    },

    #[error("path template `{template}` does not compile: {source}")]
    Regex {
        template: String,
        #[source]
        source: regex::Error,
    },
}

impl CompileError {
    /// True when the entry itself was malformed, as opposed to its templates.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, CompileError::ArgumentCount(_))
    }
}

/// No configured entry matched the request path.
///
/// Recoverable: the caller hands the request to the next handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no matching config for `{path}`")]
pub struct NoMatch {
    pub path: String,
}
