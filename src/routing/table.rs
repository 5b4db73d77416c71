//! Published matcher snapshot.
//!
//! Requests load the current `MatcherList` without locking; a reload builds a
//! complete new list and publishes it with a single pointer swap. A request
//! that already loaded the old list finishes against it.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::routing::router::{MatcherList, ResolvedVars};
use crate::routing::NoMatch;

#[derive(Debug)]
pub struct RouteTable {
    current: ArcSwap<MatcherList>,
}

impl RouteTable {
    pub fn new(matchers: MatcherList) -> Self {
        Self {
            current: ArcSwap::from_pointee(matchers),
        }
    }

    /// The list currently published.
    pub fn snapshot(&self) -> Arc<MatcherList> {
        self.current.load_full()
    }

    /// Replace the published list, returning the previous one.
    pub fn publish(&self, matchers: MatcherList) -> Arc<MatcherList> {
        let previous = self.current.swap(Arc::new(matchers));
        tracing::info!(
            previous = previous.len(),
            current = self.current.load().len(),
            "Published new matcher list"
        );
        previous
    }

    pub fn resolve(&self, host: &str, path: &str) -> Result<ResolvedVars, NoMatch> {
        self.current.load().resolve(host, path)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(MatcherList::default())
    }
}
