//! Search & Navigation: substring matching over node ids plus a wrapping
//! match cursor.
//!
//! `search` matches every node id containing the query as a substring, in
//! the graph's node iteration order, and resets the cursor. `advance`
//! cycles through the matches; its first call after a fresh search lands
//! on match 0, so the caller can always focus the returned node without
//! special-casing the initial jump. All matches highlight simultaneously —
//! edge highlighting is a separate, click-driven concern (see `view`).

use crate::graph::LineageGraph;

/// Search behavior options.
///
/// Case sensitivity is configurable: the default is a plain case-sensitive
/// substring match; `case_sensitive = false` uppercase-normalizes both
/// sides before comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Match query and ids byte-for-byte when true.
    pub case_sensitive: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            case_sensitive: true,
        }
    }
}

/// The search state of one interactive session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    config: SearchConfig,
    query: String,
    matches: Vec<String>,
    cursor: usize,
    /// True until the first `advance` after a search, which must land on
    /// match 0 rather than step past it.
    fresh: bool,
}

impl SearchState {
    /// Create an empty search state with the given options.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Run a search, replacing the match list and resetting the cursor.
    /// Returns the match count; zero matches is not an error, it just
    /// makes `advance` a no-op.
    pub fn search(&mut self, graph: &LineageGraph, query: &str) -> usize {
        self.query = query.to_owned();
        self.matches = if self.config.case_sensitive {
            graph
                .nodes()
                .iter()
                .filter(|node| node.id.contains(query))
                .map(|node| node.id.clone())
                .collect()
        } else {
            let needle = query.to_uppercase();
            graph
                .nodes()
                .iter()
                .filter(|node| node.id.to_uppercase().contains(&needle))
                .map(|node| node.id.clone())
                .collect()
        };
        self.cursor = 0;
        self.fresh = true;
        self.matches.len()
    }

    /// Step the cursor to the next match and return it, wrapping around.
    /// Returns `None` when there are no matches.
    pub fn advance(&mut self) -> Option<&str> {
        if self.matches.is_empty() {
            return None;
        }
        if self.fresh {
            self.fresh = false;
        } else {
            self.cursor = (self.cursor + 1) % self.matches.len();
        }
        self.matches.get(self.cursor).map(String::as_str)
    }

    /// The current query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Matched node ids in node iteration order. All of these are
    /// highlighted at once.
    pub fn matches(&self) -> &[String] {
        &self.matches
    }

    /// Whether a node id is among the current matches.
    pub fn is_match(&self, node_id: &str) -> bool {
        self.matches.iter().any(|id| id == node_id)
    }

    /// Drop the query, matches, and cursor.
    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.cursor = 0;
        self.fresh = false;
    }
}
