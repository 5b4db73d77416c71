//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled matchers in configured order
//! - Return the first entry whose pattern matches the request path
//! - Return an explicit no-match otherwise
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan; order is the only tie-break, specific patterns go first
//! - Explicit NoMatch rather than a zero-valued record

use serde::{Deserialize, Serialize};

use crate::routing::matcher::CompiledMatcher;
use crate::routing::{CompileError, NoMatch};

/// Variables handed to the response renderer for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVars {
    /// Request host, verbatim.
    pub host: String,
    /// Canonical module path, built from the matched prefix only.
    pub path: String,
    pub vcs: String,
    pub uri: String,
}

impl ResolvedVars {
    /// `host` + module path, the import path tooling asks for.
    pub fn import_path(&self) -> String {
        format!("{}{}", self.host, self.path)
    }
}

/// Ordered list of compiled matchers. First match wins.
#[derive(Debug, Clone, Default)]
pub struct MatcherList {
    matchers: Vec<CompiledMatcher>,
}

impl MatcherList {
    pub fn new(matchers: Vec<CompiledMatcher>) -> Self {
        Self { matchers }
    }

    /// Compile raw directive argument lists, stopping at the first failure.
    pub fn compile<I, A>(entries: I) -> Result<Self, CompileError>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<[String]>,
    {
        let matchers = entries
            .into_iter()
            .map(|args| CompiledMatcher::from_args(args.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { matchers })
    }

    /// Resolve a request against the list.
    pub fn resolve(&self, host: &str, path: &str) -> Result<ResolvedVars, NoMatch> {
        self.matchers
            .iter()
            .find_map(|m| m.resolve(host, path))
            .ok_or_else(|| NoMatch {
                path: path.to_string(),
            })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompiledMatcher> {
        self.matchers.iter()
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl<'a> IntoIterator for &'a MatcherList {
    type Item = &'a CompiledMatcher;
    type IntoIter = std::slice::Iter<'a, CompiledMatcher>;

    fn into_iter(self) -> Self::IntoIter {
        self.matchers.iter()
    }
}
